use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::rate::RoomType;

fn default_meal_plan() -> String {
    "BB".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum HotelStatus {
    #[default]
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "inactive")]
    Inactive,
}

/// Static per-hotel prices, used whenever no dated rate period applies.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct BaseRates {
    pub single_room: Option<f64>,
    pub double_room: Option<f64>,
    pub triple_room: Option<f64>,
    pub quad_room: Option<f64>,
    pub six_room: Option<f64>,
    pub extra_bed: Option<f64>,
    pub child_with_bed: Option<f64>,
    pub child_without_bed_3_to_5: Option<f64>,
    pub child_without_bed_5_to_11: Option<f64>,
    // Infants have no room type code, so they never resolve through rate lookups.
    pub infant: Option<f64>,
}

impl BaseRates {
    pub fn price_for(&self, room_type: RoomType) -> Option<f64> {
        match room_type {
            RoomType::Single => self.single_room,
            RoomType::Double => self.double_room,
            RoomType::Triple => self.triple_room,
            RoomType::Quad => self.quad_room,
            RoomType::Six => self.six_room,
            RoomType::ExtraBed => self.extra_bed,
            RoomType::ChildWithBed => self.child_with_bed,
            RoomType::ChildNoBed3To5 => self.child_without_bed_3_to_5,
            RoomType::ChildNoBed5To11 => self.child_without_bed_5_to_11,
        }
    }

    /// Returns the name of the first field holding a negative or non-finite price.
    pub fn invalid_field(&self) -> Option<&'static str> {
        let fields = [
            ("single_room", self.single_room),
            ("double_room", self.double_room),
            ("triple_room", self.triple_room),
            ("quad_room", self.quad_room),
            ("six_room", self.six_room),
            ("extra_bed", self.extra_bed),
            ("child_with_bed", self.child_with_bed),
            ("child_without_bed_3_to_5", self.child_without_bed_3_to_5),
            ("child_without_bed_5_to_11", self.child_without_bed_5_to_11),
            ("infant", self.infant),
        ];

        fields
            .into_iter()
            .find(|(_, value)| matches!(value, Some(v) if !v.is_finite() || *v < 0.0))
            .map(|(name, _)| name)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Hotel {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub city: String,
    #[serde(default)]
    pub star_rating: Option<u8>,
    #[serde(default)]
    pub base_rates: BaseRates,
    #[serde(default = "default_meal_plan")]
    pub default_meal_plan: String,
    #[serde(default)]
    pub status: HotelStatus,
    // Set by the server, clients may omit them
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
