use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::store::{HotelStore, RateStore};
use crate::services::pricing_service::PricingService;
use crate::services::rate_service::RateService;

/// Everything request handlers need, built once at startup and shared
/// through `web::Data`.
pub struct AppState {
    pub hotels: Arc<dyn HotelStore>,
    pub rates: RateService,
    pub pricing: PricingService,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, config: &AppConfig) -> Self
    where
        S: HotelStore + RateStore + 'static,
    {
        let hotels: Arc<dyn HotelStore> = store.clone();
        Self {
            pricing: PricingService::new(hotels.clone(), config.quote_markup_percent),
            rates: RateService::new(store).with_max_range_days(config.max_range_days),
            hotels,
        }
    }
}
