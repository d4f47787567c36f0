use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};

/// Priceable occupancy category. The serialized form is the short code used
/// by the back office (`SGL`, `CNB_3_5`, ...).
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoomType {
    #[serde(rename = "SGL")]
    Single,
    #[serde(rename = "DBL")]
    Double,
    #[serde(rename = "TPL")]
    Triple,
    #[serde(rename = "QUAD")]
    Quad,
    #[serde(rename = "SIX")]
    Six,
    #[serde(rename = "EX_BED_11")]
    ExtraBed,
    #[serde(rename = "CWB_3_11")]
    ChildWithBed,
    #[serde(rename = "CNB_3_5")]
    ChildNoBed3To5,
    #[serde(rename = "CNB_5_11")]
    ChildNoBed5To11,
}

impl RoomType {
    pub const ALL: [RoomType; 9] = [
        RoomType::Single,
        RoomType::Double,
        RoomType::Triple,
        RoomType::Quad,
        RoomType::Six,
        RoomType::ExtraBed,
        RoomType::ChildWithBed,
        RoomType::ChildNoBed3To5,
        RoomType::ChildNoBed5To11,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            RoomType::Single => "SGL",
            RoomType::Double => "DBL",
            RoomType::Triple => "TPL",
            RoomType::Quad => "QUAD",
            RoomType::Six => "SIX",
            RoomType::ExtraBed => "EX_BED_11",
            RoomType::ChildWithBed => "CWB_3_11",
            RoomType::ChildNoBed3To5 => "CNB_3_5",
            RoomType::ChildNoBed5To11 => "CNB_5_11",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRoomType(pub String);

impl FromStr for RoomType {
    type Err = UnknownRoomType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomType::ALL
            .into_iter()
            .find(|room| room.code() == s)
            .ok_or_else(|| UnknownRoomType(s.to_string()))
    }
}

/// A dated price override for one (room type, meal plan) key of a hotel.
/// Both bounds are inclusive calendar days.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RatePeriod {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub room_type: RoomType,
    pub meal_plan: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: f64,
}

impl RatePeriod {
    pub fn new(
        room_type: RoomType,
        meal_plan: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        price: f64,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            room_type,
            meal_plan: meal_plan.to_string(),
            start_date,
            end_date,
            price,
        }
    }

    pub fn single_day(room_type: RoomType, meal_plan: &str, day: NaiveDate, price: f64) -> Self {
        Self::new(room_type, meal_plan, day, day, price)
    }

    pub fn matches(&self, room_type: RoomType, meal_plan: &str) -> bool {
        self.room_type == room_type && self.meal_plan == meal_plan
    }

    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    pub fn overlaps(&self, other: &RatePeriod) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }
}

/// Normalizes a client supplied date to its calendar day. Accepts plain ISO
/// dates, naive datetimes and RFC 3339 timestamps (the day in the timestamp's
/// own offset is kept).
pub fn parse_day(input: &str) -> Option<NaiveDate> {
    let input = input.trim();

    if let Ok(day) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(day);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Some(timestamp.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|datetime| datetime.date())
}

// Prices arrive from spreadsheets and forms, so numeric strings are accepted.
// Anything else becomes None and is rejected by the caller.
pub fn deserialize_lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64()),
        Some(serde_json::Value::String(s)) => Ok(s.trim().parse::<f64>().ok()),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_room_type_codes_parse_back() {
        for room in RoomType::ALL {
            assert_eq!(room.code().parse::<RoomType>(), Ok(room));
        }
        assert_eq!(
            "PENTHOUSE".parse::<RoomType>(),
            Err(UnknownRoomType("PENTHOUSE".to_string()))
        );
    }

    #[test]
    fn test_room_type_serializes_as_code() {
        let json = serde_json::to_string(&RoomType::ChildNoBed3To5).unwrap();
        assert_eq!(json, "\"CNB_3_5\"");
    }

    #[test]
    fn test_parse_day_strips_time_of_day() {
        assert_eq!(parse_day("2025-06-01"), Some(day("2025-06-01")));
        assert_eq!(parse_day("2025-06-01T23:59:59"), Some(day("2025-06-01")));
        assert_eq!(parse_day("2025-06-01 08:30:00"), Some(day("2025-06-01")));
        assert_eq!(parse_day("2025-06-01T23:30:00+04:00"), Some(day("2025-06-01")));
        assert_eq!(parse_day("2025-06-01T00:00:00.000Z"), Some(day("2025-06-01")));
        assert_eq!(parse_day("June 1st"), None);
    }

    #[test]
    fn test_period_bounds_are_inclusive() {
        let period = RatePeriod::new(RoomType::Double, "BB", day("2025-07-01"), day("2025-07-10"), 400.0);

        assert!(period.covers(day("2025-07-01")));
        assert!(period.covers(day("2025-07-10")));
        assert!(!period.covers(day("2025-06-30")));
        assert!(!period.covers(day("2025-07-11")));
        assert!(period.matches(RoomType::Double, "BB"));
        assert!(!period.matches(RoomType::Double, "HB"));
    }

    #[test]
    fn test_lenient_price() {
        #[derive(Deserialize)]
        struct Body {
            #[serde(deserialize_with = "deserialize_lenient_price", default)]
            price: Option<f64>,
        }

        let parse = |v: serde_json::Value| serde_json::from_value::<Body>(v).unwrap().price;
        assert_eq!(parse(serde_json::json!({ "price": 650 })), Some(650.0));
        assert_eq!(parse(serde_json::json!({ "price": "12.5" })), Some(12.5));
        assert_eq!(parse(serde_json::json!({ "price": "abc" })), None);
        assert_eq!(parse(serde_json::json!({})), None);
    }
}
