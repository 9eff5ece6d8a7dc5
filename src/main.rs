use log::{error, info, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use sensor_dashboard::api::TelemetryClient;
use sensor_dashboard::config::DashboardConfig;
use sensor_dashboard::scheduler::Scheduler;

/// Forward time-scale tokens typed on stdin to the scheduler.
async fn read_scale_requests(tx: mpsc::Sender<String>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let token = line.trim().to_string();
                if token.is_empty() {
                    continue;
                }
                if tx.send(token).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read time scale from stdin: {}", e);
                break;
            }
        }
    }
}

async fn main_loop(config: DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting sensor dashboard against {}", config.backend_url);
    info!(
        "Type a time scale to switch ({})",
        config.scale_set.tokens().join(", ")
    );

    let client =
        TelemetryClient::new(&config.backend_url, &config.source, config.request_timeout)?;

    let (tx, rx) = mpsc::channel(8);
    tokio::spawn(read_scale_requests(tx));

    Scheduler::new(
        Arc::new(client),
        config.scale_set,
        config.time_scale,
        config.poll_interval,
        config.chart,
        config.output,
        config.discard_stale_cycles,
    )
    .run(rx)
    .await;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match DashboardConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        let _ = tx.send(());
    });

    // Run main loop or wait for shutdown signal
    tokio::select! {
        result = main_loop(config) => {
            match result {
                Ok(_) => info!("Dashboard stopped"),
                Err(e) => error!("Fatal error: {}", e),
            }
        }
        _ = &mut rx => {
            info!("Program terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}
