use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::models::hotel::{BaseRates, Hotel};
use crate::models::rate::RatePeriod;

#[derive(Debug)]
pub enum StoreError {
    Database(String),
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(err) => write!(f, "Database error: {}", err),
            StoreError::Unavailable(err) => write!(f, "Store unavailable: {}", err),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Hotel catalogue persistence.
#[async_trait]
pub trait HotelStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
    async fn list_hotels(
        &self,
        name_prefix: Option<&str>,
        limit: Option<u16>,
    ) -> Result<Vec<Hotel>, StoreError>;
    async fn get_hotel(&self, id: &ObjectId) -> Result<Option<Hotel>, StoreError>;
    async fn insert_hotel(&self, hotel: Hotel) -> Result<Hotel, StoreError>;
    /// Returns false when no hotel has that id.
    async fn update_hotel(&self, id: &ObjectId, hotel: Hotel) -> Result<bool, StoreError>;
    /// Deletes the hotel together with all of its rate periods.
    async fn delete_hotel(&self, id: &ObjectId) -> Result<bool, StoreError>;
}

/// The persistence boundary of the rate resolver. A hotel's periods are
/// always read and written back as one list.
#[async_trait]
pub trait RateStore: Send + Sync {
    async fn load_base_rates(&self, hotel_id: &ObjectId) -> Result<Option<BaseRates>, StoreError>;
    async fn load_periods(&self, hotel_id: &ObjectId) -> Result<Vec<RatePeriod>, StoreError>;
    async fn replace_periods(
        &self,
        hotel_id: &ObjectId,
        periods: Vec<RatePeriod>,
    ) -> Result<(), StoreError>;
}

#[derive(Default)]
struct MemoryTables {
    hotels: HashMap<ObjectId, Hotel>,
    periods: HashMap<ObjectId, Vec<RatePeriod>>,
}

/// Process-local store. Each instance is isolated, which is what the tests
/// and the no-database mode rely on.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<MemoryTables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HotelStore for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_hotels(
        &self,
        name_prefix: Option<&str>,
        limit: Option<u16>,
    ) -> Result<Vec<Hotel>, StoreError> {
        let tables = self.tables.read().await;
        let prefix = name_prefix.map(|p| p.to_lowercase());

        let mut hotels: Vec<Hotel> = tables
            .hotels
            .values()
            .filter(|hotel| match &prefix {
                Some(p) => hotel.name.to_lowercase().starts_with(p.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        hotels.sort_by(|a, b| a.name.cmp(&b.name));

        if let Some(limit) = limit {
            hotels.truncate(limit.into());
        }
        Ok(hotels)
    }

    async fn get_hotel(&self, id: &ObjectId) -> Result<Option<Hotel>, StoreError> {
        Ok(self.tables.read().await.hotels.get(id).cloned())
    }

    async fn insert_hotel(&self, mut hotel: Hotel) -> Result<Hotel, StoreError> {
        let id = *hotel.id.get_or_insert_with(ObjectId::new);
        self.tables.write().await.hotels.insert(id, hotel.clone());
        Ok(hotel)
    }

    async fn update_hotel(&self, id: &ObjectId, mut hotel: Hotel) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.hotels.get_mut(id) {
            Some(existing) => {
                hotel.id = Some(*id);
                *existing = hotel;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_hotel(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        tables.periods.remove(id);
        Ok(tables.hotels.remove(id).is_some())
    }
}

#[async_trait]
impl RateStore for InMemoryStore {
    async fn load_base_rates(&self, hotel_id: &ObjectId) -> Result<Option<BaseRates>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.hotels.get(hotel_id).map(|hotel| hotel.base_rates.clone()))
    }

    async fn load_periods(&self, hotel_id: &ObjectId) -> Result<Vec<RatePeriod>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.periods.get(hotel_id).cloned().unwrap_or_default())
    }

    async fn replace_periods(
        &self,
        hotel_id: &ObjectId,
        periods: Vec<RatePeriod>,
    ) -> Result<(), StoreError> {
        self.tables.write().await.periods.insert(*hotel_id, periods);
        Ok(())
    }
}
