/// Fetch-cycle scheduling and status tracking
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::api::SensorSource;
use crate::dashboard::{self, OutputFormat};
use crate::error::Result;
use crate::models::{PipelineStatus, SensorSeries};
use crate::pipeline::ChartOptions;
use crate::timescale::{ScaleSet, TimeScale};

/// Result of one fetch cycle, tagged with the generation that issued it.
#[derive(Debug)]
pub struct CycleOutcome {
    pub generation: u64,
    pub scale: TimeScale,
    pub result: Result<SensorSeries>,
}

/// Monotonic generation counter for overlapping cycles
///
/// Cycles are never cancelled, so a slow one may finish after a newer one.
/// With `discard_stale` set, only results newer than the last applied
/// generation are accepted; otherwise every result is applied in arrival
/// order.
#[derive(Debug, Clone)]
pub struct CycleGuard {
    issued: u64,
    applied: Option<u64>,
    discard_stale: bool,
}

impl CycleGuard {
    pub fn new(discard_stale: bool) -> Self {
        CycleGuard {
            issued: 0,
            applied: None,
            discard_stale,
        }
    }

    /// Generation for a newly started cycle.
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Whether the result of `generation` should replace the current status.
    pub fn accept(&mut self, generation: u64) -> bool {
        if self.discard_stale && self.applied.is_some_and(|applied| generation <= applied) {
            return false;
        }
        self.applied = Some(generation);
        true
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }
}

/// Map a cycle result onto the tri-state status.
pub fn status_from(result: Result<SensorSeries>) -> PipelineStatus {
    match result {
        Ok(series) => PipelineStatus::Ready(series),
        Err(e) => {
            if e.is_transport() {
                error!("Failed to fetch sensor data: {}", e);
            } else {
                warn!("Fetch cycle produced no data: {}", e);
            }
            PipelineStatus::Error(e.user_message())
        }
    }
}

/// Drives fetch cycles on a fixed interval and on time-scale changes.
pub struct Scheduler {
    source: Arc<dyn SensorSource>,
    scale_set: ScaleSet,
    scale: TimeScale,
    poll_interval: Duration,
    chart: ChartOptions,
    output: OutputFormat,
    guard: CycleGuard,
    status: PipelineStatus,
}

impl Scheduler {
    pub fn new(
        source: Arc<dyn SensorSource>,
        scale_set: ScaleSet,
        scale: TimeScale,
        poll_interval: Duration,
        chart: ChartOptions,
        output: OutputFormat,
        discard_stale: bool,
    ) -> Self {
        Scheduler {
            source,
            scale_set,
            scale,
            poll_interval,
            chart,
            output,
            guard: CycleGuard::new(discard_stale),
            status: PipelineStatus::Loading,
        }
    }

    pub fn status(&self) -> &PipelineStatus {
        &self.status
    }

    pub fn scale(&self) -> TimeScale {
        self.scale
    }

    /// Spawn a fetch cycle for the current scale and mark the status loading.
    pub fn start_cycle(&mut self, outcomes: &mpsc::UnboundedSender<CycleOutcome>) -> u64 {
        let generation = self.guard.begin();
        let scale = self.scale;
        let source = Arc::clone(&self.source);
        let outcomes = outcomes.clone();

        debug!("Starting fetch cycle {} ({})", generation, scale);
        self.status = PipelineStatus::Loading;

        tokio::spawn(async move {
            let result = source.fetch_series(scale).await;
            let _ = outcomes.send(CycleOutcome {
                generation,
                scale,
                result,
            });
        });

        generation
    }

    /// Apply a finished cycle. Returns false when the guard discarded it.
    pub fn apply(&mut self, outcome: CycleOutcome) -> bool {
        if !self.guard.accept(outcome.generation) {
            debug!(
                "Discarding stale cycle {} (latest issued {})",
                outcome.generation,
                self.guard.issued()
            );
            return false;
        }
        self.status = status_from(outcome.result);
        true
    }

    /// Switch to a new time scale if `token` resolves in the configured set.
    pub fn change_scale(&mut self, token: &str) -> bool {
        match self.scale_set.resolve(token) {
            Ok(scale) => {
                info!("Time scale set to {}", scale);
                self.scale = scale;
                true
            }
            Err(e) => {
                warn!("{} (accepted: {})", e, self.scale_set.tokens().join(", "));
                false
            }
        }
    }

    /// Run until the scale-request channel and the process are torn down.
    ///
    /// A scale change restarts the poll interval, whose first tick fires
    /// immediately.
    pub async fn run(mut self, mut scale_requests: mpsc::Receiver<String>) {
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
        let mut ticker = new_ticker(self.poll_interval);
        let mut requests_open = true;

        info!(
            "Polling every {}s at scale {}",
            self.poll_interval.as_secs(),
            self.scale
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.start_cycle(&outcome_tx);
                    dashboard::render(&self.status, &self.chart, self.output);
                }
                request = scale_requests.recv(), if requests_open => match request {
                    Some(token) => {
                        if self.change_scale(&token) {
                            ticker = new_ticker(self.poll_interval);
                        }
                    }
                    None => requests_open = false,
                },
                Some(outcome) = outcome_rx.recv() => {
                    if self.apply(outcome) {
                        dashboard::render(&self.status, &self.chart, self.output);
                    }
                }
            }
        }
    }
}

fn new_ticker(period: Duration) -> tokio::time::Interval {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}
