/// Reconciliation of validated readings into one ordered series
use std::collections::HashMap;
use time::OffsetDateTime;

use crate::models::{PartialReading, SensorReading, SensorSeries, SENTINEL_MISSING};
use crate::utils::parse_instant;

/// Order a combined stream by timestamp
///
/// Identity on content; the sort is stable so records sharing a timestamp
/// keep their arrival order.
pub fn reconcile_combined(mut readings: Vec<SensorReading>) -> SensorSeries {
    readings.sort_by_cached_key(|r| chronological_key(&r.timestamp));
    SensorSeries::from_ordered(readings)
}

/// Merge a temperature-only and a humidity-only stream keyed by date
///
/// Each distinct date appears once in the output. A metric with no record for
/// a date is filled with [`SENTINEL_MISSING`]. Within one stream a later
/// record for the same date overwrites an earlier one.
pub fn merge_partial(temperatures: &[PartialReading], humidities: &[PartialReading]) -> SensorSeries {
    let mut merged = HashMap::new();
    apply_temperatures(&mut merged, temperatures);
    apply_humidities(&mut merged, humidities);
    into_series(merged)
}

fn apply_temperatures(merged: &mut HashMap<String, SensorReading>, records: &[PartialReading]) {
    for record in records {
        merged
            .entry(record.date.clone())
            .or_insert_with(|| empty_reading(&record.date))
            .temperature = record.value;
    }
}

fn apply_humidities(merged: &mut HashMap<String, SensorReading>, records: &[PartialReading]) {
    for record in records {
        merged
            .entry(record.date.clone())
            .or_insert_with(|| empty_reading(&record.date))
            .humidity = record.value;
    }
}

fn empty_reading(date: &str) -> SensorReading {
    SensorReading {
        timestamp: date.to_string(),
        temperature: SENTINEL_MISSING,
        humidity: SENTINEL_MISSING,
    }
}

fn into_series(merged: HashMap<String, SensorReading>) -> SensorSeries {
    let mut readings: Vec<SensorReading> = merged.into_values().collect();
    readings.sort_by_cached_key(|r| chronological_key(&r.timestamp));
    SensorSeries::from_ordered(readings)
}

/// Sort key: parsed instant first, raw text as tie-breaker.
///
/// Keys that do not parse sort before all parseable ones, among themselves
/// lexicographically.
fn chronological_key(timestamp: &str) -> (Option<OffsetDateTime>, String) {
    (parse_instant(timestamp), timestamp.to_string())
}
