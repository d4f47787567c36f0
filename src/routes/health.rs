use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let storage_result = check_storage(&data).await;
    health
        .services
        .insert("storage".to_string(), storage_result.clone());

    if storage_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_storage(data: &web::Data<AppState>) -> ServiceStatus {
    match data.hotels.ping().await {
        Ok(_) => ServiceStatus {
            status: "ok".to_string(),
            details: Some("Store reachable".to_string()),
        },
        Err(e) => {
            log::error!("Storage health check failed: {}", e);

            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to reach store: {}", e)),
            }
        }
    }
}
