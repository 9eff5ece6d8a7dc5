use serde::Serialize;
use std::ops::Deref;

/// Value standing in for "no reading for this metric at this timestamp".
///
/// Partial-stream merging and backends with unreported fields both produce it,
/// so a genuine reading of exactly zero is indistinguishable from a gap.
pub const SENTINEL_MISSING: f64 = 0.0;

/// One timestamped temperature and humidity observation.
///
/// `timestamp` is the canonical ISO-8601 string (see
/// [`crate::utils::to_iso_string`]) or, for partial streams, the date key
/// exactly as the backend sent it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    pub timestamp: String,
    pub temperature: f64,
    pub humidity: f64,
}

/// A single-metric record from one of the split endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialReading {
    pub date: String,
    pub value: f64,
}

/// Chronologically ordered readings produced by one pipeline run.
///
/// Read-only once built; consumers derive new sequences from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorSeries(Vec<SensorReading>);

impl SensorSeries {
    /// Wraps readings that are already in ascending timestamp order.
    pub(crate) fn from_ordered(readings: Vec<SensorReading>) -> Self {
        SensorSeries(readings)
    }

    pub fn into_inner(self) -> Vec<SensorReading> {
        self.0
    }
}

impl Deref for SensorSeries {
    type Target = [SensorReading];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The two metrics every reading carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Humidity,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Temperature, Metric::Humidity];

    /// Field name used by the backend payloads.
    pub fn field(self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
        }
    }

    pub fn value(self, reading: &SensorReading) -> f64 {
        match self {
            Metric::Temperature => reading.temperature,
            Metric::Humidity => reading.humidity,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "%",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
        }
    }
}

/// Current, minimum and maximum of one metric over its valid subset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    pub current: f64,
    pub min: f64,
    pub max: f64,
}

/// Summary values shown on the stat cards.
///
/// A metric whose valid subset is empty is `None`, never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub temperature: Option<MetricSummary>,
    pub humidity: Option<MetricSummary>,
    pub last_updated: String,
}

impl DashboardStats {
    pub fn metric(&self, metric: Metric) -> Option<MetricSummary> {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
        }
    }

    pub fn current_temp(&self) -> Option<f64> {
        self.temperature.map(|s| s.current)
    }

    pub fn min_temp(&self) -> Option<f64> {
        self.temperature.map(|s| s.min)
    }

    pub fn max_temp(&self) -> Option<f64> {
        self.temperature.map(|s| s.max)
    }

    pub fn current_humidity(&self) -> Option<f64> {
        self.humidity.map(|s| s.current)
    }

    pub fn min_humidity(&self) -> Option<f64> {
        self.humidity.map(|s| s.min)
    }

    pub fn max_humidity(&self) -> Option<f64> {
        self.humidity.map(|s| s.max)
    }

    /// Flat view with one field per stat card value.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            current_temp: self.current_temp(),
            min_temp: self.min_temp(),
            max_temp: self.max_temp(),
            current_humidity: self.current_humidity(),
            min_humidity: self.min_humidity(),
            max_humidity: self.max_humidity(),
            last_updated: self.last_updated.clone(),
        }
    }
}

/// Stats as handed to external renderers; absent values serialize as null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub current_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub current_humidity: Option<f64>,
    pub min_humidity: Option<f64>,
    pub max_humidity: Option<f64>,
    pub last_updated: String,
}

/// What the rendering layer receives at the end of a cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineStatus {
    Loading,
    Ready(SensorSeries),
    Error(String),
}
