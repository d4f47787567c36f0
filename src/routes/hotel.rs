use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::models::hotel::Hotel;
use crate::routes::error_response;
use crate::services::rate_service::{parse_object_id, RateError};
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct QueryParams {
    limit: Option<u16>,
    search: Option<String>,
}

fn validate(hotel: &Hotel) -> Result<(), RateError> {
    match hotel.base_rates.invalid_field() {
        Some(field) => Err(RateError::InvalidPrice(format!(
            "base rate {} must be a non-negative number",
            field
        ))),
        None => Ok(()),
    }
}

/*
    GET /api/hotels?search=&limit=
*/
pub async fn get_hotels(
    data: web::Data<AppState>,
    params: web::Query<QueryParams>,
) -> impl Responder {
    let search = params.search.as_deref().filter(|s| !s.is_empty());

    match data.hotels.list_hotels(search, params.limit).await {
        Ok(hotels) => HttpResponse::Ok().json(hotels),
        Err(err) => error_response(&RateError::from(err)),
    }
}

/*
    GET /api/hotels/{id}
*/
pub async fn get_by_id(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match parse_object_id(&path.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };

    match data.hotels.get_hotel(&id).await {
        Ok(Some(hotel)) => HttpResponse::Ok().json(hotel),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "Hotel not found" })),
        Err(err) => error_response(&RateError::from(err)),
    }
}

pub async fn create_hotel(data: web::Data<AppState>, input: web::Json<Hotel>) -> impl Responder {
    let mut hotel = input.into_inner();
    if let Err(err) = validate(&hotel) {
        return error_response(&err);
    }

    let now = Utc::now();
    hotel.id = None;
    hotel.created_at = Some(now);
    hotel.updated_at = Some(now);

    match data.hotels.insert_hotel(hotel).await {
        Ok(created) => {
            log::info!("Created hotel {:?} ({})", created.id, created.name);
            HttpResponse::Created().json(created)
        }
        Err(err) => error_response(&RateError::from(err)),
    }
}

pub async fn update_hotel(
    data: web::Data<AppState>,
    path: web::Path<String>,
    input: web::Json<Hotel>,
) -> impl Responder {
    let id = match parse_object_id(&path.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    let mut hotel = input.into_inner();
    if let Err(err) = validate(&hotel) {
        return error_response(&err);
    }

    let existing = match data.hotels.get_hotel(&id).await {
        Ok(Some(existing)) => existing,
        Ok(None) => return HttpResponse::NotFound().json(json!({ "error": "Hotel not found" })),
        Err(err) => return error_response(&RateError::from(err)),
    };
    hotel.created_at = existing.created_at;
    hotel.updated_at = Some(Utc::now());

    match data.hotels.update_hotel(&id, hotel.clone()).await {
        Ok(true) => {
            hotel.id = Some(id);
            HttpResponse::Ok().json(hotel)
        }
        Ok(false) => HttpResponse::NotFound().json(json!({ "error": "Hotel not found" })),
        Err(err) => error_response(&RateError::from(err)),
    }
}

pub async fn delete_hotel(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match parse_object_id(&path.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };

    match data.rates.remove_hotel(data.hotels.as_ref(), &id).await {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => HttpResponse::NotFound().json(json!({ "error": "Hotel not found" })),
        Err(err) => error_response(&err),
    }
}
