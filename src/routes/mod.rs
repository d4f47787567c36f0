use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::services::rate_service::RateError;

pub mod health;
pub mod hotel;
pub mod quotation;
pub mod rates;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/hotels")
                        .route("", web::get().to(hotel::get_hotels))
                        .route("", web::post().to(hotel::create_hotel))
                        .route("/{id}", web::get().to(hotel::get_by_id))
                        .route("/{id}", web::put().to(hotel::update_hotel))
                        .route("/{id}", web::delete().to(hotel::delete_hotel))
                        .route("/{id}/rates", web::get().to(rates::get_rate))
                        .route("/{id}/rates", web::put().to(rates::set_rate))
                        .route("/{id}/rates/bulk", web::post().to(rates::bulk_set_rates))
                        .route("/{id}/rates/copy", web::post().to(rates::copy_rate_to_all))
                        .route("/{id}/rates/calendar", web::get().to(rates::get_rates_for_period))
                        .route("/{id}/rate-periods", web::get().to(rates::list_rate_periods))
                        .route(
                            "/{id}/rate-periods/{period_id}",
                            web::delete().to(rates::delete_rate_period),
                        ),
                )
                .route("/quotations/stay", web::post().to(quotation::quote_stay)),
        );
}

/// Maps core errors to status codes. Storage failures are logged and hidden
/// behind a generic message.
pub fn error_response(err: &RateError) -> HttpResponse {
    match err {
        RateError::NotFound(_) => HttpResponse::NotFound().json(json!({ "error": err.to_string() })),
        RateError::InvalidRange { .. }
        | RateError::InvalidPrice(_)
        | RateError::UnknownRoomType(_)
        | RateError::InvalidDate(_)
        | RateError::InvalidId(_) => {
            HttpResponse::BadRequest().json(json!({ "error": err.to_string() }))
        }
        RateError::Storage(_) => {
            log::error!("{}", err);
            HttpResponse::InternalServerError().json(json!({ "error": "Storage failure" }))
        }
    }
}
