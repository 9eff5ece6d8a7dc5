/// Record-level validation of raw API payloads
use log::{debug, warn};
use serde_json::Value;

use crate::models::{Metric, PartialReading, SensorReading};
use crate::utils::{epoch_millis_to_iso, parse_instant, to_iso_string};

/// Filter a combined-stream payload down to well-formed readings
///
/// A record survives only if `timestamp` is a finite epoch-milliseconds number
/// or a parseable ISO-8601 instant, and both `temperature` and `humidity` are
/// finite numbers. Timestamps are normalised to the canonical ISO-8601 form.
/// Anything else is dropped without error. A payload that is not an array
/// yields an empty result. Input order is preserved.
pub fn validate(payload: &Value) -> Vec<SensorReading> {
    let Some(records) = records_of(payload) else {
        return Vec::new();
    };

    let readings: Vec<SensorReading> = records.iter().filter_map(validate_record).collect();

    let dropped = records.len() - readings.len();
    if dropped > 0 {
        debug!("Dropped {} of {} invalid records", dropped, records.len());
    }
    readings
}

/// Filter a single-metric payload (`{date, <metric>}` records)
///
/// `date` must be a non-empty string and is kept verbatim as the merge key.
pub fn validate_partial(payload: &Value, metric: Metric) -> Vec<PartialReading> {
    let Some(records) = records_of(payload) else {
        return Vec::new();
    };

    let readings: Vec<PartialReading> = records
        .iter()
        .filter_map(|record| {
            let date = record.get("date")?.as_str()?;
            if date.is_empty() {
                return None;
            }
            Some(PartialReading {
                date: date.to_string(),
                value: finite_number(record, metric.field())?,
            })
        })
        .collect();

    let dropped = records.len() - readings.len();
    if dropped > 0 {
        debug!(
            "Dropped {} of {} invalid {} records",
            dropped,
            records.len(),
            metric.field()
        );
    }
    readings
}

fn records_of(payload: &Value) -> Option<&Vec<Value>> {
    match payload.as_array() {
        Some(records) => Some(records),
        None => {
            warn!("Unexpected payload shape, treating as empty");
            None
        }
    }
}

fn validate_record(record: &Value) -> Option<SensorReading> {
    Some(SensorReading {
        timestamp: canonical_timestamp(record.get("timestamp")?)?,
        temperature: finite_number(record, "temperature")?,
        humidity: finite_number(record, "humidity")?,
    })
}

fn canonical_timestamp(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => epoch_millis_to_iso(n.as_f64()?),
        Value::String(s) => to_iso_string(parse_instant(s)?),
        _ => None,
    }
}

fn finite_number(record: &Value, field: &str) -> Option<f64> {
    record
        .get(field)?
        .as_f64()
        .filter(|value| value.is_finite())
}
