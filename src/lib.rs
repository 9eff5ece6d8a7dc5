//! Telemetry reconciliation for a temperature/humidity dashboard
//!
//! Raw API payloads are validated, reconciled into one ordered series, then
//! reduced for charting and summarised for the stat cards.
pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod scheduler;
pub mod timescale;
pub mod utils;

pub use error::{PipelineError, Result};
pub use models::{DashboardStats, Metric, PipelineStatus, SensorReading, SensorSeries};
pub use timescale::{ScaleSet, TimeScale};
