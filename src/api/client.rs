/// HTTP access to the remote telemetry API
use async_trait::async_trait;
use futures_util::future::try_join;
use log::{debug, warn};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::DataSource;
use crate::error::{PipelineError, Result};
use crate::models::SensorSeries;
use crate::pipeline;
use crate::timescale::TimeScale;

/// Anything that can produce a reconciled series for a time scale.
#[async_trait]
pub trait SensorSource: Send + Sync {
    async fn fetch_series(&self, scale: TimeScale) -> Result<SensorSeries>;
}

#[derive(Debug, Clone)]
enum Endpoints {
    Combined(Url),
    Split { temperature: Url, humidity: Url },
}

/// Client for the telemetry backend
///
/// Non-2xx responses and network failures are transport errors. A body that
/// is not JSON is decoded as an empty payload. Every request is bounded by
/// the configured timeout. No retries are attempted; the next poll cycle is
/// the retry.
#[derive(Debug, Clone)]
pub struct TelemetryClient {
    endpoints: Endpoints,
    http: reqwest::Client,
}

impl TelemetryClient {
    pub fn new(
        backend_url: &str,
        source: &DataSource,
        timeout: Duration,
    ) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let endpoints = match source {
            DataSource::Combined { path } => Endpoints::Combined(endpoint(backend_url, path)?),
            DataSource::Split {
                temperature_path,
                humidity_path,
            } => Endpoints::Split {
                temperature: endpoint(backend_url, temperature_path)?,
                humidity: endpoint(backend_url, humidity_path)?,
            },
        };

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(TelemetryClient { endpoints, http })
    }

    /// URL requested for the combined endpoint at `scale`.
    pub fn combined_url(&self, scale: TimeScale) -> Option<Url> {
        match &self.endpoints {
            Endpoints::Combined(base) => {
                let mut url = base.clone();
                url.query_pairs_mut()
                    .append_pair("timeScale", scale.query_param());
                Some(url)
            }
            Endpoints::Split { .. } => None,
        }
    }

    async fn fetch_json(&self, url: Url) -> Result<Value> {
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(decode_body(&body))
    }
}

#[async_trait]
impl SensorSource for TelemetryClient {
    async fn fetch_series(&self, scale: TimeScale) -> Result<SensorSeries> {
        match &self.endpoints {
            Endpoints::Combined(_) => {
                let url = self
                    .combined_url(scale)
                    .ok_or_else(|| PipelineError::Transport("no combined endpoint".into()))?;
                let payload = self.fetch_json(url).await?;
                pipeline::process_combined(&payload)
            }
            Endpoints::Split {
                temperature,
                humidity,
            } => {
                debug!("Split endpoints take no time scale, ignoring {}", scale);
                // Both requests must succeed; the first failure aborts the merge.
                let (temperature, humidity) = try_join(
                    self.fetch_json(temperature.clone()),
                    self.fetch_json(humidity.clone()),
                )
                .await?;
                pipeline::process_split(&temperature, &humidity)
            }
        }
    }
}

/// Resolve `path` below the backend URL, keeping any base path prefix.
fn endpoint(backend_url: &str, path: &str) -> std::result::Result<Url, url::ParseError> {
    let mut base = Url::parse(backend_url)?;
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    base.join(path.trim_start_matches('/'))
}

/// Decode a response body, degrading to `Null` when it is not JSON.
pub fn decode_body(body: &str) -> Value {
    match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            warn!("Response body is not valid JSON ({}), treating as empty", e);
            Value::Null
        }
    }
}
