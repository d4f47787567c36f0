#![allow(dead_code)]

use actix_web::{web, App};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use tourdesk_api::config::AppConfig;
use tourdesk_api::db::store::{HotelStore, InMemoryStore};
use tourdesk_api::models::hotel::Hotel;
use tourdesk_api::routes;
use tourdesk_api::state::AppState;

pub struct TestApp {
    pub state: web::Data<AppState>,
}

impl TestApp {
    /// Every test app gets its own empty in-memory store.
    pub fn new() -> Self {
        Self::with_markup(0.0)
    }

    pub fn with_markup(markup_percent: f64) -> Self {
        Self::with_config(AppConfig {
            quote_markup_percent: markup_percent,
            ..AppConfig::default()
        })
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            state: web::Data::new(AppState::new(store, &config)),
        }
    }

    pub fn create_app(&self) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .configure(routes::config)
    }

    pub async fn seed_hotel(&self, body: serde_json::Value) -> ObjectId {
        let hotel: Hotel = serde_json::from_value(body).expect("valid hotel fixture");
        self.state
            .hotels
            .insert_hotel(hotel)
            .await
            .expect("insert hotel")
            .id
            .expect("hotel id")
    }
}

/// Hotel with `double_room = 500` and `single_room = 350`.
pub fn test_hotel() -> serde_json::Value {
    serde_json::json!({
        "name": "Harbour View",
        "city": "Muscat",
        "base_rates": {
            "single_room": 350.0,
            "double_room": 500.0
        }
    })
}

pub fn oid(body: &serde_json::Value) -> String {
    body["_id"]["$oid"]
        .as_str()
        .expect("object id in body")
        .to_string()
}
