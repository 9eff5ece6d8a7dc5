use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use tokio::time::Duration;

use crate::dashboard::OutputFormat;
use crate::pipeline::downsample::{ChartOptions, DEFAULT_MAX_DATA_POINTS, DEFAULT_MAX_LABEL_COUNT};
use crate::timescale::{ScaleSet, TimeScale};

const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_TIME_SCALE: &str = "24h";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Which backend contract the dashboard reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// One endpoint returning full readings, parameterised by time scale
    Combined { path: String },
    /// Separate temperature and humidity endpoints, no time scale
    Split {
        temperature_path: String,
        humidity_path: String,
    },
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub backend_url: String,
    pub source: DataSource,
    pub scale_set: ScaleSet,
    pub time_scale: TimeScale,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub chart: ChartOptions,
    pub discard_stale_cycles: bool,
    pub output: OutputFormat,
}

impl DashboardConfig {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        let vars: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup("BACKEND_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or("BACKEND_URL environment variable not set")?;

        let source = match lookup("DATA_SOURCE")
            .unwrap_or_else(|| "combined".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "combined" => DataSource::Combined {
                path: lookup("DATA_PATH").unwrap_or_else(|| "/v1/data".to_string()),
            },
            "split" => DataSource::Split {
                temperature_path: lookup("TEMPERATURE_PATH")
                    .unwrap_or_else(|| "/v1/temperature".to_string()),
                humidity_path: lookup("HUMIDITY_PATH")
                    .unwrap_or_else(|| "/v1/humidity".to_string()),
            },
            other => {
                return Err(format!(
                    "Unknown DATA_SOURCE '{}', expected 'combined' or 'split'",
                    other
                )
                .into())
            }
        };

        let scale_set = match lookup("TIME_SCALE_SET") {
            Some(value) => ScaleSet::from_str(&value)?,
            None => ScaleSet::Windowed,
        };

        let token = lookup("TIME_SCALE").unwrap_or_else(|| DEFAULT_TIME_SCALE.to_string());
        let time_scale = scale_set.resolve(&token)?;

        let poll_secs: u64 = parse_or(&lookup, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        if poll_secs == 0 {
            return Err("POLL_INTERVAL_SECS must be at least 1".into());
        }

        let max_data_points = parse_or(&lookup, "MAX_DATA_POINTS", DEFAULT_MAX_DATA_POINTS)?;
        if max_data_points == 0 {
            return Err("MAX_DATA_POINTS must be at least 1".into());
        }

        let max_label_count = parse_or(&lookup, "MAX_LABEL_COUNT", DEFAULT_MAX_LABEL_COUNT)?;
        if max_label_count < 2 {
            return Err("MAX_LABEL_COUNT must be at least 2".into());
        }

        let timeout_secs: u64 =
            parse_or(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err("REQUEST_TIMEOUT_SECS must be at least 1".into());
        }

        let discard_stale_cycles = parse_or(&lookup, "DISCARD_STALE_CYCLES", false)?;
        let output = parse_or(&lookup, "OUTPUT_FORMAT", OutputFormat::Text)?;

        // Partial streams fill gaps with the sentinel, so charts skip those points
        let exclude_missing = matches!(source, DataSource::Split { .. });

        Ok(DashboardConfig {
            backend_url,
            source,
            scale_set,
            time_scale,
            poll_interval: Duration::from_secs(poll_secs),
            request_timeout: Duration::from_secs(timeout_secs),
            chart: ChartOptions {
                max_data_points,
                max_label_count,
                exclude_missing,
            },
            discard_stale_cycles,
            output,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("Invalid value for {}: '{}'", key, raw).into()),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<DashboardConfig, Box<dyn std::error::Error>> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashboardConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("BACKEND_URL", "https://sensors.example.com")]).unwrap();

        assert_eq!(config.backend_url, "https://sensors.example.com");
        assert_eq!(
            config.source,
            DataSource::Combined {
                path: "/v1/data".into()
            }
        );
        assert_eq!(config.scale_set, ScaleSet::Windowed);
        assert_eq!(config.time_scale, TimeScale::Hours24);
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.chart, ChartOptions::default());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.output, OutputFormat::Text);
        assert!(!config.discard_stale_cycles);
    }

    #[test]
    fn test_missing_backend_url() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("BACKEND_URL"));
    }

    #[test]
    fn test_split_source_and_granular_scales() {
        let config = config_from(&[
            ("BACKEND_URL", "http://localhost:8080"),
            ("DATA_SOURCE", "split"),
            ("HUMIDITY_PATH", "/api/hum"),
            ("TIME_SCALE_SET", "granular"),
            ("TIME_SCALE", "5m"),
            ("DISCARD_STALE_CYCLES", "true"),
            ("OUTPUT_FORMAT", "json"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(
            config.source,
            DataSource::Split {
                temperature_path: "/v1/temperature".into(),
                humidity_path: "/api/hum".into(),
            }
        );
        assert_eq!(config.time_scale, TimeScale::Minutes5);
        assert!(config.discard_stale_cycles);
        assert!(config.chart.exclude_missing);
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let base = ("BACKEND_URL", "http://localhost");
        assert!(config_from(&[base, ("DATA_SOURCE", "stream")]).is_err());
        assert!(config_from(&[base, ("TIME_SCALE", "raw")]).is_err());
        assert!(config_from(&[base, ("POLL_INTERVAL_SECS", "0")]).is_err());
        assert!(config_from(&[base, ("POLL_INTERVAL_SECS", "soon")]).is_err());
        assert!(config_from(&[base, ("MAX_DATA_POINTS", "0")]).is_err());
        assert!(config_from(&[base, ("MAX_LABEL_COUNT", "1")]).is_err());
        assert!(config_from(&[base, ("DISCARD_STALE_CYCLES", "yes")]).is_err());
        assert!(config_from(&[base, ("REQUEST_TIMEOUT_SECS", "0")]).is_err());
        assert!(config_from(&[base, ("OUTPUT_FORMAT", "xml")]).is_err());
    }
}
