pub mod pricing_service;
pub mod rate_periods;
pub mod rate_service;
