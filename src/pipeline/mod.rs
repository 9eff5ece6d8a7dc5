//! Validation, reconciliation and reduction of fetched telemetry
pub mod downsample;
pub mod reconciler;
pub mod stats;
pub mod validator;

use serde_json::Value;

use crate::error::{PipelineError, Result};
use crate::models::{Metric, SensorSeries};

pub use downsample::{
    chart_window, label_indices, present_points, reduce_points, ChartOptions, ChartView,
};
pub use reconciler::{merge_partial, reconcile_combined};
pub use stats::aggregate;
pub use validator::{validate, validate_partial};

/// Build the series from a combined-stream payload.
pub fn process_combined(payload: &Value) -> Result<SensorSeries> {
    non_empty(reconcile_combined(validate(payload)))
}

/// Build the series from the temperature and humidity payloads.
pub fn process_split(temperature: &Value, humidity: &Value) -> Result<SensorSeries> {
    let temperatures = validate_partial(temperature, Metric::Temperature);
    let humidities = validate_partial(humidity, Metric::Humidity);
    non_empty(merge_partial(&temperatures, &humidities))
}

fn non_empty(series: SensorSeries) -> Result<SensorSeries> {
    if series.is_empty() {
        Err(PipelineError::EmptyResult)
    } else {
        Ok(series)
    }
}
