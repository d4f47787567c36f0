use std::sync::Arc;

use chrono::NaiveDate;

use crate::db::store::HotelStore;
use crate::models::quotation::{NightLine, RoomLine, StayQuote, StayQuoteRequest};
use crate::models::rate::RoomType;
use crate::services::rate_service::{parse_date, parse_object_id, RateError, RateService};

/// Prices hotel stays for quotations, night by night, from one rate sheet
/// loaded per quote.
pub struct PricingService {
    hotels: Arc<dyn HotelStore>,
    default_markup_percent: f64,
}

impl PricingService {
    pub fn new(hotels: Arc<dyn HotelStore>, default_markup_percent: f64) -> Self {
        Self {
            hotels,
            default_markup_percent,
        }
    }

    /// Markup on top of the net hotel cost
    pub fn calculate_markup(subtotal: f64, markup_percent: f64) -> f64 {
        round_cents(subtotal * markup_percent / 100.0)
    }

    pub fn calculate_subtotal(lines: &[NightLine]) -> f64 {
        round_cents(lines.iter().map(|line| line.line_total).sum())
    }

    pub async fn quote_stay(
        &self,
        rates: &RateService,
        request: &StayQuoteRequest,
    ) -> Result<StayQuote, RateError> {
        let hotel_id = parse_object_id(&request.hotel_id)?;
        let check_in = parse_date(&request.check_in)?;
        let check_out = parse_date(&request.check_out)?;
        let invalid_stay = RateError::InvalidRange {
            start: check_in,
            end: check_out,
        };
        let last_night = check_out
            .pred_opt()
            .ok_or_else(|| invalid_stay.clone())?;
        rates
            .check_range(check_in, last_night)
            .map_err(|_| invalid_stay)?;

        let markup_percent = request
            .markup_percent
            .unwrap_or(self.default_markup_percent);
        if !markup_percent.is_finite() || markup_percent < 0.0 {
            return Err(RateError::InvalidPrice(format!(
                "markup {}% is not allowed",
                markup_percent
            )));
        }

        let rooms = parse_room_lines(&request.rooms)?;

        let hotel = self
            .hotels
            .get_hotel(&hotel_id)
            .await?
            .ok_or_else(|| RateError::NotFound(format!("Hotel {}", hotel_id)))?;
        let meal_plan = request
            .meal_plan
            .clone()
            .unwrap_or(hotel.default_meal_plan);

        let sheet = rates
            .rate_sheet(&hotel_id, &meal_plan, check_in, last_night)
            .await?;
        let nights: Vec<NaiveDate> = check_in
            .iter_days()
            .take_while(|night| *night <= last_night)
            .collect();

        let mut lines = Vec::with_capacity(nights.len() * rooms.len());
        for night in &nights {
            for (room_type, quantity) in &rooms {
                let unit_price = sheet
                    .resolve(*room_type, *night)
                    .ok_or_else(|| {
                        RateError::NotFound(format!(
                            "{} {} rate on {} for hotel {}",
                            room_type, meal_plan, night, hotel_id
                        ))
                    })?;
                lines.push(NightLine {
                    date: *night,
                    room_type: *room_type,
                    quantity: *quantity,
                    unit_price,
                    line_total: round_cents(unit_price * f64::from(*quantity)),
                });
            }
        }

        let subtotal = Self::calculate_subtotal(&lines);
        let markup = Self::calculate_markup(subtotal, markup_percent);

        Ok(StayQuote {
            hotel_id,
            meal_plan,
            nights: nights.len() as u32,
            lines,
            subtotal,
            markup_percent,
            markup,
            total: round_cents(subtotal + markup),
        })
    }
}

fn parse_room_lines(rooms: &[RoomLine]) -> Result<Vec<(RoomType, u32)>, RateError> {
    rooms
        .iter()
        .filter(|line| line.quantity > 0)
        .map(|line| -> Result<(RoomType, u32), RateError> {
            Ok((line.room_type.parse::<RoomType>()?, line.quantity))
        })
        .collect()
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
