use std::env;

use crate::services::rate_service::DEFAULT_MAX_RANGE_DAYS;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE: &str = "BackOffice";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Without a URI the service runs on the in-memory store.
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
    pub quote_markup_percent: f64,
    /// Longest date range accepted by calendar, copy and quote requests.
    pub max_range_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            mongodb_uri: None,
            mongodb_database: DATABASE.to_string(),
            quote_markup_percent: 0.0,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
        }
    }
}

impl AppConfig {
    /// Create config from environment variables or use defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            mongodb_uri: lookup("MONGODB_URI").filter(|uri| !uri.trim().is_empty()),
            mongodb_database: lookup("MONGODB_DATABASE").unwrap_or(defaults.mongodb_database),
            quote_markup_percent: lookup("QUOTE_MARKUP_PERCENT")
                .and_then(|s| s.parse().ok())
                .filter(|p: &f64| p.is_finite() && *p >= 0.0)
                .unwrap_or(defaults.quote_markup_percent),
            max_range_days: lookup("MAX_RANGE_DAYS")
                .and_then(|s| s.parse().ok())
                .filter(|days: &u32| *days > 0)
                .unwrap_or(defaults.max_range_days),
        }
    }
}
