use actix_web::{web, HttpResponse, Responder};

use crate::models::quotation::StayQuoteRequest;
use crate::routes::error_response;
use crate::state::AppState;

/*
    POST /api/quotations/stay
*/
pub async fn quote_stay(
    data: web::Data<AppState>,
    input: web::Json<StayQuoteRequest>,
) -> impl Responder {
    match data.pricing.quote_stay(&data.rates, &input).await {
        Ok(quote) => HttpResponse::Ok().json(quote),
        Err(err) => error_response(&err),
    }
}
