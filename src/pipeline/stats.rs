/// Summary statistics over a reconciled series
use crate::models::{DashboardStats, Metric, MetricSummary, SensorReading, SENTINEL_MISSING};

/// Derive the stat-card values from a series
///
/// Each metric is summarised over its own valid subset, the entries whose
/// value is not the missing sentinel. `last_updated` comes from the last entry
/// of the whole series regardless of validity. Returns None for an empty
/// series.
pub fn aggregate(series: &[SensorReading]) -> Option<DashboardStats> {
    let last = series.last()?;

    Some(DashboardStats {
        temperature: summarize(series, Metric::Temperature),
        humidity: summarize(series, Metric::Humidity),
        last_updated: last.timestamp.clone(),
    })
}

/// Current/min/max of one metric, None when no entry carries a valid value.
pub fn summarize(series: &[SensorReading], metric: Metric) -> Option<MetricSummary> {
    let mut valid = series
        .iter()
        .map(|reading| metric.value(reading))
        .filter(|&value| value != SENTINEL_MISSING);

    let first = valid.next()?;
    let init = MetricSummary {
        current: first,
        min: first,
        max: first,
    };

    Some(valid.fold(init, |acc, value| MetricSummary {
        current: value,
        min: acc.min.min(value),
        max: acc.max.max(value),
    }))
}
