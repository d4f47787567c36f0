use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::models::rate::deserialize_lenient_price;
use crate::routes::error_response;
use crate::services::rate_service::{
    parse_date, parse_object_id, validate_price, BulkRateEntry, RateError,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RateQuery {
    room_type: String,
    meal_plan: String,
    date: String,
}

#[derive(Deserialize)]
pub struct SetRateInput {
    room_type: String,
    meal_plan: String,
    date: String,
    #[serde(deserialize_with = "deserialize_lenient_price", default)]
    price: Option<f64>,
}

#[derive(Deserialize)]
pub struct BulkEntryInput {
    date: String,
    room_type: String,
    #[serde(deserialize_with = "deserialize_lenient_price", default)]
    price: Option<f64>,
}

#[derive(Deserialize)]
pub struct BulkSetInput {
    meal_plan: String,
    entries: Vec<BulkEntryInput>,
}

#[derive(Deserialize)]
pub struct CopyInput {
    source_date: String,
    room_type: String,
    meal_plan: String,
    target_start: String,
    target_end: String,
}

#[derive(Deserialize)]
pub struct CalendarQuery {
    start: String,
    end: String,
    meal_plan: String,
}

#[derive(Deserialize)]
pub struct PeriodFilter {
    room_type: Option<String>,
    meal_plan: Option<String>,
}

fn required_price(price: Option<f64>) -> Result<f64, RateError> {
    price
        .ok_or_else(|| RateError::InvalidPrice("price must be a number".to_string()))
        .and_then(validate_price)
}

/*
    GET /api/hotels/{id}/rates?room_type=DBL&meal_plan=BB&date=2025-06-01
*/
pub async fn get_rate(
    data: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<RateQuery>,
) -> impl Responder {
    let lookup = async {
        let hotel_id = parse_object_id(&path)?;
        let day = parse_date(&query.date)?;
        data.rates
            .get_rate(&hotel_id, &query.room_type, &query.meal_plan, day)
            .await
    };

    match lookup.await {
        Ok(Some(price)) => HttpResponse::Ok().json(json!({
            "room_type": query.room_type,
            "meal_plan": query.meal_plan,
            "date": query.date,
            "price": price,
        })),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "No rate found" })),
        Err(err) => error_response(&err),
    }
}

pub async fn set_rate(
    data: web::Data<AppState>,
    path: web::Path<String>,
    input: web::Json<SetRateInput>,
) -> impl Responder {
    let write = async {
        let hotel_id = parse_object_id(&path)?;
        let day = parse_date(&input.date)?;
        let price = required_price(input.price)?;
        data.rates
            .set_rate(&hotel_id, &input.room_type, &input.meal_plan, day, price)
            .await
    };

    match write.await {
        Ok(period) => HttpResponse::Ok().json(period),
        Err(err) => error_response(&err),
    }
}

pub async fn bulk_set_rates(
    data: web::Data<AppState>,
    path: web::Path<String>,
    input: web::Json<BulkSetInput>,
) -> impl Responder {
    let write = async {
        let hotel_id = parse_object_id(&path)?;
        let entries = input
            .entries
            .iter()
            .map(|entry| -> Result<BulkRateEntry, RateError> {
                Ok(BulkRateEntry {
                    date: parse_date(&entry.date)?,
                    room_type: entry.room_type.clone(),
                    price: required_price(entry.price)?,
                })
            })
            .collect::<Result<Vec<_>, RateError>>()?;
        data.rates
            .bulk_set_rates(&hotel_id, &input.meal_plan, &entries)
            .await
    };

    match write.await {
        Ok(written) => HttpResponse::Ok().json(json!({ "written": written })),
        Err(err) => error_response(&err),
    }
}

pub async fn copy_rate_to_all(
    data: web::Data<AppState>,
    path: web::Path<String>,
    input: web::Json<CopyInput>,
) -> impl Responder {
    let write = async {
        let hotel_id = parse_object_id(&path)?;
        let source_date = parse_date(&input.source_date)?;
        let target_start = parse_date(&input.target_start)?;
        let target_end = parse_date(&input.target_end)?;
        data.rates
            .copy_rate_to_all(
                &hotel_id,
                source_date,
                &input.room_type,
                &input.meal_plan,
                target_start,
                target_end,
            )
            .await
    };

    match write.await {
        Ok(written) => HttpResponse::Ok().json(json!({ "written": written })),
        Err(err) => error_response(&err),
    }
}

/*
    GET /api/hotels/{id}/rates/calendar?start=2025-06-01&end=2025-06-30&meal_plan=BB
*/
pub async fn get_rates_for_period(
    data: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<CalendarQuery>,
) -> impl Responder {
    let lookup = async {
        let hotel_id = parse_object_id(&path)?;
        let start = parse_date(&query.start)?;
        let end = parse_date(&query.end)?;
        data.rates
            .get_rates_for_period(&hotel_id, start, end, &query.meal_plan)
            .await
    };

    match lookup.await {
        Ok(grid) => HttpResponse::Ok().json(grid),
        Err(err) => error_response(&err),
    }
}

pub async fn list_rate_periods(
    data: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PeriodFilter>,
) -> impl Responder {
    let lookup = async {
        let hotel_id = parse_object_id(&path)?;
        data.rates
            .list_rate_periods(
                &hotel_id,
                query.room_type.as_deref(),
                query.meal_plan.as_deref(),
            )
            .await
    };

    match lookup.await {
        Ok(periods) => HttpResponse::Ok().json(periods),
        Err(err) => error_response(&err),
    }
}

pub async fn delete_rate_period(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (hotel_id, period_id) = path.into_inner();
    let delete = async {
        let hotel_id = parse_object_id(&hotel_id)?;
        let period_id = parse_object_id(&period_id)?;
        data.rates.delete_rate_period(&hotel_id, &period_id).await
    };

    match delete.await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    }
}
