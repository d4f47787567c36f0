use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;

use crate::db::store::{HotelStore, RateStore, StoreError};
use crate::models::hotel::BaseRates;
use crate::models::rate::{self, RatePeriod, RoomType, UnknownRoomType};
use crate::services::rate_periods::{self, BulkBatch};

/// Longest date range, in days, a single rate request may cover.
pub const DEFAULT_MAX_RANGE_DAYS: u32 = 1096;

#[derive(Debug, Clone, PartialEq)]
pub enum RateError {
    NotFound(String),
    InvalidRange { start: NaiveDate, end: NaiveDate },
    InvalidPrice(String),
    UnknownRoomType(String),
    InvalidDate(String),
    InvalidId(String),
    Storage(String),
}

impl std::fmt::Display for RateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateError::NotFound(what) => write!(f, "{} not found", what),
            RateError::InvalidRange { start, end } => {
                write!(f, "Invalid date range: {} to {}", start, end)
            }
            RateError::InvalidPrice(err) => write!(f, "Invalid price: {}", err),
            RateError::UnknownRoomType(code) => write!(f, "Unknown room type: {}", code),
            RateError::InvalidDate(input) => write!(f, "Invalid date: {}", input),
            RateError::InvalidId(input) => write!(f, "Invalid ID: {}", input),
            RateError::Storage(err) => write!(f, "Storage error: {}", err),
        }
    }
}

impl std::error::Error for RateError {}

impl From<StoreError> for RateError {
    fn from(err: StoreError) -> Self {
        RateError::Storage(err.to_string())
    }
}

impl From<UnknownRoomType> for RateError {
    fn from(err: UnknownRoomType) -> Self {
        RateError::UnknownRoomType(err.0)
    }
}

pub fn parse_object_id(input: &str) -> Result<ObjectId, RateError> {
    ObjectId::parse_str(input).map_err(|_| RateError::InvalidId(input.to_string()))
}

pub fn parse_date(input: &str) -> Result<NaiveDate, RateError> {
    rate::parse_day(input).ok_or_else(|| RateError::InvalidDate(input.to_string()))
}

pub fn validate_price(price: f64) -> Result<f64, RateError> {
    if !price.is_finite() {
        return Err(RateError::InvalidPrice(format!("{} is not a number", price)));
    }
    if price < 0.0 {
        return Err(RateError::InvalidPrice(format!("{} is negative", price)));
    }
    Ok(price)
}

#[derive(Debug, Clone)]
pub struct BulkRateEntry {
    pub date: NaiveDate,
    pub room_type: String,
    pub price: f64,
}

/// A hotel's base rates plus the periods of one meal plan that touch a date
/// range, loaded once for pricing many cells.
#[derive(Debug, Clone)]
pub struct RateSheet {
    base_rates: BaseRates,
    periods: Vec<RatePeriod>,
    meal_plan: String,
}

impl RateSheet {
    pub fn resolve(&self, room_type: RoomType, day: NaiveDate) -> Option<f64> {
        rate_periods::resolve(&self.periods, &self.base_rates, room_type, &self.meal_plan, day)
    }

    pub fn period_count(&self) -> usize {
        self.periods.len()
    }
}

type WriterTable = HashMap<ObjectId, Arc<tokio::sync::Mutex<()>>>;

/// Resolves and edits hotel rates. Writes read the hotel's whole period list,
/// compute the new list and store it back in one replacement; writers to the
/// same hotel are serialized within this process.
pub struct RateService {
    store: Arc<dyn RateStore>,
    writers: Mutex<WriterTable>,
    max_range_days: u32,
}

impl RateService {
    pub fn new(store: Arc<dyn RateStore>) -> Self {
        Self {
            store,
            writers: Mutex::new(HashMap::new()),
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
        }
    }

    pub fn with_max_range_days(mut self, max_range_days: u32) -> Self {
        self.max_range_days = max_range_days.max(1);
        self
    }

    /// Accepts `start..=end` when it is ordered and no longer than the
    /// configured number of days.
    pub fn check_range(&self, start: NaiveDate, end: NaiveDate) -> Result<(), RateError> {
        let days = (end - start).num_days() + 1;
        if days < 1 || days > i64::from(self.max_range_days) {
            return Err(RateError::InvalidRange { start, end });
        }
        Ok(())
    }

    fn writer_table(&self) -> MutexGuard<'_, WriterTable> {
        self.writers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn writer_lock(&self, hotel_id: &ObjectId) -> Arc<tokio::sync::Mutex<()>> {
        self.writer_table().entry(*hotel_id).or_default().clone()
    }

    #[cfg(test)]
    fn tracked_writers(&self) -> usize {
        self.writer_table().len()
    }

    async fn base_rates(&self, hotel_id: &ObjectId) -> Result<BaseRates, RateError> {
        self.store
            .load_base_rates(hotel_id)
            .await?
            .ok_or_else(|| RateError::NotFound(format!("Hotel {}", hotel_id)))
    }

    /// Existence check made under the writer lock. A missing hotel gives its
    /// lock entry back so unknown ids do not accumulate.
    async fn require_hotel(&self, hotel_id: &ObjectId) -> Result<(), RateError> {
        match self.base_rates(hotel_id).await {
            Err(RateError::NotFound(what)) => {
                self.writer_table().remove(hotel_id);
                Err(RateError::NotFound(what))
            }
            other => other.map(|_| ()),
        }
    }

    async fn store_periods(
        &self,
        hotel_id: &ObjectId,
        periods: Vec<RatePeriod>,
    ) -> Result<(), RateError> {
        debug_assert!(
            !rate_periods::has_overlap(&periods),
            "overlapping rate periods for hotel {}",
            hotel_id
        );
        self.store.replace_periods(hotel_id, periods).await?;
        Ok(())
    }

    /// Loads base rates and the `meal_plan` periods touching `start..=end`.
    pub async fn rate_sheet(
        &self,
        hotel_id: &ObjectId,
        meal_plan: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateSheet, RateError> {
        let base_rates = self.base_rates(hotel_id).await?;
        let periods = self
            .store
            .load_periods(hotel_id)
            .await?
            .into_iter()
            .filter(|period| period.meal_plan == meal_plan)
            .filter(|period| period.end_date >= start && period.start_date <= end)
            .collect();

        Ok(RateSheet {
            base_rates,
            periods,
            meal_plan: meal_plan.to_string(),
        })
    }

    /// Effective price for one day. `Ok(None)` means there is no rate: the
    /// room code is unknown or neither a period nor a base price applies.
    pub async fn get_rate(
        &self,
        hotel_id: &ObjectId,
        room_type: &str,
        meal_plan: &str,
        day: NaiveDate,
    ) -> Result<Option<f64>, RateError> {
        let sheet = self.rate_sheet(hotel_id, meal_plan, day, day).await?;
        match room_type.parse::<RoomType>() {
            Ok(room_type) => Ok(sheet.resolve(room_type, day)),
            Err(_) => Ok(None),
        }
    }

    pub async fn set_rate(
        &self,
        hotel_id: &ObjectId,
        room_type: &str,
        meal_plan: &str,
        day: NaiveDate,
        price: f64,
    ) -> Result<RatePeriod, RateError> {
        let room_type: RoomType = room_type.parse()?;
        let price = validate_price(price)?;

        let lock = self.writer_lock(hotel_id);
        let _guard = lock.lock().await;
        self.require_hotel(hotel_id).await?;

        let mut periods = self.store.load_periods(hotel_id).await?;
        let written =
            rate_periods::write_single_day(&mut periods, room_type, meal_plan, day, price);
        self.store_periods(hotel_id, periods).await?;

        log::info!(
            "Set {} {} rate for hotel {} on {} to {}",
            room_type,
            meal_plan,
            hotel_id,
            day,
            price
        );
        Ok(written)
    }

    /// Returns the number of single-day periods written. For a date repeated
    /// within one room type, the last entry wins.
    pub async fn bulk_set_rates(
        &self,
        hotel_id: &ObjectId,
        meal_plan: &str,
        entries: &[BulkRateEntry],
    ) -> Result<usize, RateError> {
        let mut batch = BulkBatch::new();
        for entry in entries {
            let room_type: RoomType = entry.room_type.parse()?;
            let price = validate_price(entry.price)?;
            batch.entry(room_type).or_default().insert(entry.date, price);
        }

        let lock = self.writer_lock(hotel_id);
        let _guard = lock.lock().await;
        self.require_hotel(hotel_id).await?;

        if batch.is_empty() {
            return Ok(0);
        }

        let mut periods = self.store.load_periods(hotel_id).await?;
        let written = rate_periods::write_bulk(&mut periods, meal_plan, &batch);
        self.store_periods(hotel_id, periods).await?;

        log::info!(
            "Bulk wrote {} {} rates for hotel {} ({} entries received)",
            written,
            meal_plan,
            hotel_id,
            entries.len()
        );
        Ok(written)
    }

    /// Copies the override in effect on `source_date` onto every day of the
    /// target range. The source must be a dated period, base rates do not count.
    pub async fn copy_rate_to_all(
        &self,
        hotel_id: &ObjectId,
        source_date: NaiveDate,
        room_type: &str,
        meal_plan: &str,
        target_start: NaiveDate,
        target_end: NaiveDate,
    ) -> Result<usize, RateError> {
        self.check_range(target_start, target_end)?;
        let room_type: RoomType = room_type.parse()?;

        let lock = self.writer_lock(hotel_id);
        let _guard = lock.lock().await;
        self.require_hotel(hotel_id).await?;

        let mut periods = self.store.load_periods(hotel_id).await?;
        let price = rate_periods::find_covering(&periods, room_type, meal_plan, source_date)
            .map(|period| period.price)
            .ok_or_else(|| {
                RateError::NotFound(format!(
                    "{} {} rate on {} for hotel {}",
                    room_type, meal_plan, source_date, hotel_id
                ))
            })?;

        let written = rate_periods::write_range(
            &mut periods,
            room_type,
            meal_plan,
            target_start,
            target_end,
            price,
        );
        self.store_periods(hotel_id, periods).await?;

        log::info!(
            "Copied {} {} rate {} from {} onto {}..={} for hotel {}",
            room_type,
            meal_plan,
            price,
            source_date,
            target_start,
            target_end,
            hotel_id
        );
        Ok(written)
    }

    /// Calendar grid: ISO date → room type code → price, with 0 where nothing applies.
    pub async fn get_rates_for_period(
        &self,
        hotel_id: &ObjectId,
        start: NaiveDate,
        end: NaiveDate,
        meal_plan: &str,
    ) -> Result<BTreeMap<String, BTreeMap<String, f64>>, RateError> {
        self.check_range(start, end)?;
        let sheet = self.rate_sheet(hotel_id, meal_plan, start, end).await?;

        let grid = start
            .iter_days()
            .take_while(|day| *day <= end)
            .map(|day| {
                let row: BTreeMap<String, f64> = RoomType::ALL
                    .iter()
                    .map(|room_type| {
                        let price = sheet.resolve(*room_type, day).unwrap_or(0.0);
                        (room_type.code().to_string(), price)
                    })
                    .collect();
                (day.format("%Y-%m-%d").to_string(), row)
            })
            .collect();

        Ok(grid)
    }

    pub async fn list_rate_periods(
        &self,
        hotel_id: &ObjectId,
        room_type: Option<&str>,
        meal_plan: Option<&str>,
    ) -> Result<Vec<RatePeriod>, RateError> {
        let room_type = room_type.map(str::parse::<RoomType>).transpose()?;
        self.base_rates(hotel_id).await?;

        let mut periods: Vec<RatePeriod> = self
            .store
            .load_periods(hotel_id)
            .await?
            .into_iter()
            .filter(|period| room_type.map_or(true, |r| period.room_type == r))
            .filter(|period| meal_plan.map_or(true, |m| period.meal_plan == m))
            .collect();

        periods.sort_by(|a, b| {
            (a.room_type, &a.meal_plan, a.start_date).cmp(&(b.room_type, &b.meal_plan, b.start_date))
        });
        Ok(periods)
    }

    pub async fn delete_rate_period(
        &self,
        hotel_id: &ObjectId,
        period_id: &ObjectId,
    ) -> Result<RatePeriod, RateError> {
        let lock = self.writer_lock(hotel_id);
        let _guard = lock.lock().await;
        self.require_hotel(hotel_id).await?;

        let mut periods = self.store.load_periods(hotel_id).await?;
        let index = periods
            .iter()
            .position(|period| period.id == *period_id)
            .ok_or_else(|| RateError::NotFound(format!("Rate period {}", period_id)))?;
        let removed = periods.remove(index);
        self.store_periods(hotel_id, periods).await?;

        log::info!("Deleted rate period {} of hotel {}", period_id, hotel_id);
        Ok(removed)
    }

    /// Deletes a hotel and its periods while holding the hotel's writer lock,
    /// so no rate write can land after the delete. Returns false when the
    /// hotel did not exist.
    pub async fn remove_hotel(
        &self,
        hotels: &dyn HotelStore,
        hotel_id: &ObjectId,
    ) -> Result<bool, RateError> {
        let lock = self.writer_lock(hotel_id);
        let _guard = lock.lock().await;

        let deleted = hotels.delete_hotel(hotel_id).await?;
        self.writer_table().remove(hotel_id);

        if deleted {
            log::info!("Deleted hotel {} and its rate periods", hotel_id);
        }
        Ok(deleted)
    }
}
