use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::rate::RoomType;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RoomLine {
    pub room_type: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StayQuoteRequest {
    pub hotel_id: String,
    pub meal_plan: Option<String>,
    pub check_in: String,
    pub check_out: String,
    pub rooms: Vec<RoomLine>,
    pub markup_percent: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NightLine {
    pub date: NaiveDate,
    pub room_type: RoomType,
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StayQuote {
    pub hotel_id: ObjectId,
    pub meal_plan: String,
    pub nights: u32,
    pub lines: Vec<NightLine>,
    pub subtotal: f64,
    pub markup_percent: f64,
    pub markup: f64,
    pub total: f64,
}
