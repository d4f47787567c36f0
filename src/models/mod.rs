pub mod hotel;
pub mod quotation;
pub mod rate;
