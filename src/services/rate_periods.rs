//! Date-range bookkeeping for a single hotel's rate periods.
//!
//! Every function here works on the full period list of one hotel and leaves
//! it with no two periods of the same (room type, meal plan) key overlapping,
//! provided the list satisfied that on entry.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::hotel::BaseRates;
use crate::models::rate::{RatePeriod, RoomType};

/// Per room type, the days to write and the price for each day.
pub type BulkBatch = BTreeMap<RoomType, BTreeMap<NaiveDate, f64>>;

pub fn find_covering<'a>(
    periods: &'a [RatePeriod],
    room_type: RoomType,
    meal_plan: &str,
    day: NaiveDate,
) -> Option<&'a RatePeriod> {
    periods
        .iter()
        .find(|period| period.matches(room_type, meal_plan) && period.covers(day))
}

/// Dated override first, then the hotel's base price for the room type.
pub fn resolve(
    periods: &[RatePeriod],
    base_rates: &BaseRates,
    room_type: RoomType,
    meal_plan: &str,
    day: NaiveDate,
) -> Option<f64> {
    find_covering(periods, room_type, meal_plan, day)
        .map(|period| period.price)
        .or_else(|| base_rates.price_for(room_type))
}

/// Writes `price` for exactly one day, splitting a covering multi-day period
/// into left remainder, the new day and right remainder.
pub fn write_single_day(
    periods: &mut Vec<RatePeriod>,
    room_type: RoomType,
    meal_plan: &str,
    day: NaiveDate,
    price: f64,
) -> RatePeriod {
    let position = periods
        .iter()
        .position(|period| period.matches(room_type, meal_plan) && period.covers(day));

    match position {
        None => {
            let written = RatePeriod::single_day(room_type, meal_plan, day, price);
            periods.push(written.clone());
            written
        }
        Some(index) if periods[index].start_date == day && periods[index].end_date == day => {
            periods[index].price = price;
            periods[index].clone()
        }
        Some(index) => {
            let original = periods[index].clone();
            let written = RatePeriod::single_day(room_type, meal_plan, day, price);

            let mut parts = Vec::with_capacity(3);
            if let Some(prev) = day.pred_opt().filter(|prev| original.start_date <= *prev) {
                parts.push(RatePeriod::new(
                    room_type,
                    meal_plan,
                    original.start_date,
                    prev,
                    original.price,
                ));
            }
            parts.push(written.clone());
            if let Some(next) = day.succ_opt().filter(|next| *next <= original.end_date) {
                parts.push(RatePeriod::new(
                    room_type,
                    meal_plan,
                    next,
                    original.end_date,
                    original.price,
                ));
            }

            periods.splice(index..=index, parts);
            written
        }
    }
}

/// Drops every period of the batch's keys that touches any batch day (whole
/// period, no splitting) and inserts one single-day period per batch day.
pub fn write_bulk(periods: &mut Vec<RatePeriod>, meal_plan: &str, batch: &BulkBatch) -> usize {
    periods.retain(|period| {
        if period.meal_plan != meal_plan {
            return true;
        }
        match batch.get(&period.room_type) {
            Some(days) if period.start_date <= period.end_date => days
                .range(period.start_date..=period.end_date)
                .next()
                .is_none(),
            _ => true,
        }
    });

    let mut written = 0;
    for (room_type, days) in batch {
        for (day, price) in days {
            periods.push(RatePeriod::single_day(*room_type, meal_plan, *day, *price));
            written += 1;
        }
    }
    written
}

/// Fills `[start, end]` with single-day periods at `price`.
///
/// Periods fully inside the range are removed. Periods that stick out of the
/// range keep only their days outside it.
pub fn write_range(
    periods: &mut Vec<RatePeriod>,
    room_type: RoomType,
    meal_plan: &str,
    start: NaiveDate,
    end: NaiveDate,
    price: f64,
) -> usize {
    let mut kept = Vec::with_capacity(periods.len());

    for period in periods.drain(..) {
        let disjoint = period.end_date < start || period.start_date > end;
        if !period.matches(room_type, meal_plan) || disjoint {
            kept.push(period);
            continue;
        }
        if start <= period.start_date && period.end_date <= end {
            continue;
        }

        if let Some(prev) = start.pred_opt().filter(|prev| period.start_date <= *prev) {
            kept.push(RatePeriod::new(
                room_type,
                meal_plan,
                period.start_date,
                prev,
                period.price,
            ));
        }
        if let Some(next) = end.succ_opt().filter(|next| *next <= period.end_date) {
            kept.push(RatePeriod::new(
                room_type,
                meal_plan,
                next,
                period.end_date,
                period.price,
            ));
        }
    }

    let mut written = 0;
    for day in start.iter_days().take_while(|day| *day <= end) {
        kept.push(RatePeriod::single_day(room_type, meal_plan, day, price));
        written += 1;
    }

    *periods = kept;
    written
}

/// True when some key has two periods sharing a day.
pub(crate) fn has_overlap(periods: &[RatePeriod]) -> bool {
    periods.iter().enumerate().any(|(i, a)| {
        periods[i + 1..]
            .iter()
            .any(|b| a.room_type == b.room_type && a.meal_plan == b.meal_plan && a.overlaps(b))
    })
}
