pub mod client;

pub use client::{decode_body, SensorSource, TelemetryClient};
