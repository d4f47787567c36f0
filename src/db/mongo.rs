use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{ClientOptions, FindOptions, ReplaceOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::db::store::{HotelStore, RateStore, StoreError};
use crate::models::hotel::{BaseRates, Hotel};
use crate::models::rate::RatePeriod;

const HOTEL_COLLECTION: &str = "Hotel";
const RATE_PERIOD_COLLECTION: &str = "RatePeriods";

pub async fn create_mongo_client(uri: &str) -> Result<Arc<Client>, StoreError> {
    log::info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    // Set the server API if using MongoDB 5.0+
    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match client.database("admin").run_command(doc! {"ping": 1}).await {
        Ok(_) => log::info!("Successfully connected to MongoDB and verified with ping command"),
        Err(e) => {
            log::warn!("Connected to MongoDB but ping test failed: {}", e);
            log::warn!("The API may still work, but some functionality might be impaired");
        }
    }

    Ok(Arc::new(client))
}

/// All periods of one hotel live in a single document, so a write replaces
/// the whole list atomically.
#[derive(Debug, Serialize, Deserialize)]
struct HotelRatePeriods {
    #[serde(rename = "_id")]
    hotel_id: ObjectId,
    periods: Vec<RatePeriod>,
}

#[derive(Debug, Deserialize)]
struct BaseRatesProjection {
    #[serde(default)]
    base_rates: BaseRates,
}

pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            database: client.database(database),
        }
    }

    fn hotels(&self) -> Collection<Hotel> {
        self.database.collection(HOTEL_COLLECTION)
    }

    fn rate_periods(&self) -> Collection<HotelRatePeriods> {
        self.database.collection(RATE_PERIOD_COLLECTION)
    }
}

#[async_trait]
impl HotelStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! {"ping": 1})
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn list_hotels(
        &self,
        name_prefix: Option<&str>,
        limit: Option<u16>,
    ) -> Result<Vec<Hotel>, StoreError> {
        let mut options = FindOptions::default();
        options.sort = Some(doc! { "name": 1 });
        if let Some(limit) = limit {
            options.limit = Some(limit.into());
        }

        let filter = match name_prefix {
            Some(search_text) if !search_text.is_empty() => doc! {
                "name": {
                    "$regex": format!("^{}", regex::escape(search_text)),
                    "$options": "i"
                }
            },
            _ => doc! {},
        };

        let cursor = self.hotels().find(filter).with_options(options).await?;
        Ok(cursor.try_collect::<Vec<Hotel>>().await?)
    }

    async fn get_hotel(&self, id: &ObjectId) -> Result<Option<Hotel>, StoreError> {
        Ok(self.hotels().find_one(doc! { "_id": id }).await?)
    }

    async fn insert_hotel(&self, mut hotel: Hotel) -> Result<Hotel, StoreError> {
        let result = self.hotels().insert_one(&hotel).await?;
        hotel.id = result.inserted_id.as_object_id();
        Ok(hotel)
    }

    async fn update_hotel(&self, id: &ObjectId, mut hotel: Hotel) -> Result<bool, StoreError> {
        hotel.id = Some(*id);
        let result = self
            .hotels()
            .replace_one(doc! { "_id": id }, &hotel)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_hotel(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let result = self.hotels().delete_one(doc! { "_id": id }).await?;
        self.rate_periods().delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl RateStore for MongoStore {
    async fn load_base_rates(&self, hotel_id: &ObjectId) -> Result<Option<BaseRates>, StoreError> {
        let collection: Collection<Document> = self.database.collection(HOTEL_COLLECTION);
        let found = collection
            .find_one(doc! { "_id": hotel_id })
            .projection(doc! { "base_rates": 1 })
            .await?;

        match found {
            Some(document) => {
                let projection: BaseRatesProjection = mongodb::bson::from_document(document)
                    .map_err(|e| StoreError::Database(e.to_string()))?;
                Ok(Some(projection.base_rates))
            }
            None => Ok(None),
        }
    }

    async fn load_periods(&self, hotel_id: &ObjectId) -> Result<Vec<RatePeriod>, StoreError> {
        Ok(self
            .rate_periods()
            .find_one(doc! { "_id": hotel_id })
            .await?
            .map(|entry| entry.periods)
            .unwrap_or_default())
    }

    async fn replace_periods(
        &self,
        hotel_id: &ObjectId,
        periods: Vec<RatePeriod>,
    ) -> Result<(), StoreError> {
        let entry = HotelRatePeriods {
            hotel_id: *hotel_id,
            periods,
        };
        self.rate_periods()
            .replace_one(doc! { "_id": hotel_id }, &entry)
            .with_options(ReplaceOptions::builder().upsert(true).build())
            .await?;
        Ok(())
    }
}
