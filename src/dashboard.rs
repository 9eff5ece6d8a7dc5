/// Terminal rendering of the pipeline status
use log::{error, info};
use serde::Serialize;
use std::borrow::Cow;
use std::str::FromStr;

use crate::models::{DashboardStats, Metric, PipelineStatus, SensorReading, StatsSnapshot};
use crate::pipeline::{aggregate, chart_window, present_points, reduce_points, ChartOptions, ChartView};
use crate::utils::{format_range, format_time_label, format_timestamp, format_value};

const LOADING_MESSAGE: &str = "Loading sensor data...";
const NOT_ENOUGH_DATA: &str = "Not enough data points to display chart";

/// How each status update is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable stat cards and chart listings through the logger
    Text,
    /// One JSON document per status on stdout
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format '{}'", other)),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum StatusView<'a> {
    Loading,
    Ready {
        series: &'a [SensorReading],
        stats: Option<StatsSnapshot>,
    },
    Error {
        message: &'a str,
    },
}

/// JSON document for a status: the point-reduced series plus the stats of
/// the full series.
pub fn status_json(status: &PipelineStatus, options: &ChartOptions) -> serde_json::Result<String> {
    let view = match status {
        PipelineStatus::Loading => StatusView::Loading,
        PipelineStatus::Error(message) => StatusView::Error { message },
        PipelineStatus::Ready(series) => StatusView::Ready {
            series: reduce_points(&series[..], options.max_data_points),
            stats: aggregate(series).map(|stats| stats.snapshot()),
        },
    };
    serde_json::to_string(&view)
}

/// Title/value pairs for the stat cards.
pub fn stat_cards(stats: &DashboardStats) -> Vec<(&'static str, String)> {
    vec![
        (
            "Current Temperature",
            format_value(stats.current_temp(), Metric::Temperature.unit()),
        ),
        (
            "Current Humidity",
            format_value(stats.current_humidity(), Metric::Humidity.unit()),
        ),
        (
            "Temperature Range",
            format_range(stats.temperature, Metric::Temperature.unit()),
        ),
        (
            "Humidity Range",
            format_range(stats.humidity, Metric::Humidity.unit()),
        ),
        ("Last updated", format_timestamp(&stats.last_updated)),
    ]
}

/// One line per plotted point, `HH:MM` label only at labelled indices.
///
/// With `exclude_missing`, entries holding the sentinel for `metric` are left
/// out first.
pub fn chart_lines(series: &[SensorReading], metric: Metric, options: &ChartOptions) -> Vec<String> {
    let series: Cow<'_, [SensorReading]> = if options.exclude_missing {
        let present = present_points(series, metric);
        if present.is_empty() {
            return vec![format!(
                "No {} data available",
                metric.label().to_ascii_lowercase()
            )];
        }
        Cow::Owned(present)
    } else {
        Cow::Borrowed(series)
    };

    match chart_window(&series, options) {
        ChartView::InsufficientData => vec![NOT_ENOUGH_DATA.to_string()],
        ChartView::Ready { points, labels } => points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let label = if labels.binary_search(&i).is_ok() {
                    format_time_label(&point.timestamp)
                } else {
                    String::new()
                };
                format!("{:>5} | {:.1}{}", label, metric.value(point), metric.unit())
            })
            .collect(),
    }
}

/// Emit the current status in the configured format.
pub fn render(status: &PipelineStatus, options: &ChartOptions, output: OutputFormat) {
    match output {
        OutputFormat::Text => render_text(status, options),
        OutputFormat::Json => match status_json(status, options) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize status: {}", e),
        },
    }
}

/// Log the current status as the dashboard view.
pub fn render_text(status: &PipelineStatus, options: &ChartOptions) {
    match status {
        PipelineStatus::Loading => info!("{}", LOADING_MESSAGE),
        PipelineStatus::Error(message) => error!("{}", message),
        PipelineStatus::Ready(series) => {
            if let Some(stats) = aggregate(series) {
                for (title, value) in stat_cards(&stats) {
                    info!("{}: {}", title, value);
                }
            }
            for metric in Metric::ALL {
                info!("{} ({}) over time:", metric.label(), metric.unit());
                for line in chart_lines(series, metric, options) {
                    info!("  {}", line);
                }
            }
        }
    }
}
