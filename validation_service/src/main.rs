use std::sync::Arc;

use anyhow::{Context, Result};
use futures::try_join;
use tracing::{error, info};
use validation_service::{
    api::{self, AppState},
    config::LocalConfig,
    snapshot::MarketSnapshot,
    snapshot_refresher::{shared_snapshot, SnapshotRefresher},
    utils,
};

fn format_error_chain(e: &anyhow::Error) -> String {
    e.chain()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Main entry point for the lending validation service
///
/// This function performs the following steps:
/// 1. Initializes the pre-run environment
/// 2. Loads the initial market snapshot
/// 3. Starts the snapshot refresher and the HTTP API
/// 4. Handles if any of the services fails or panics
#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    init_pre_run()?;

    info!("Starting the lending validation service");

    let local_config = Arc::new(LocalConfig::load_from_env()?);

    let snapshot = shared_snapshot(
        MarketSnapshot::load(&local_config.snapshot_path)
            .await
            .context("Failed to load the initial snapshot")?,
    );

    let snapshot_refresher =
        SnapshotRefresher::start_snapshot_refresher(&snapshot, &local_config).await?;

    let state = AppState {
        snapshot,
        validator_config: local_config.validator_config(),
        max_cap_on_health_factor: local_config.max_cap_on_health_factor,
    };
    let api_server = tokio::spawn(api::start_api_server(state, local_config.port));

    match try_join!(snapshot_refresher, api_server) {
        Ok((refresher_result, api_result)) => {
            if let Err(e) = refresher_result {
                let error_message = format_error_chain(&e);
                error!("Snapshot refresher failed with error: {}", error_message);
                return Err(anyhow::anyhow!("Snapshot refresher failed: {}", error_message));
            }

            if let Err(e) = api_result {
                let error_message = format_error_chain(&e);
                error!("API server failed with error: {}", error_message);
                return Err(anyhow::anyhow!("API server failed: {}", error_message));
            }

            info!("All services stopped");
            Ok(())
        }
        Err(e) => {
            error!("Service task panicked: {}", e);
            Err(anyhow::anyhow!("Service task panicked: {}", e))
        }
    }
}

/// Loads the `.env` file when present and sets up the logger
fn init_pre_run() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        // variables may come from the process environment instead
        if !e.not_found() {
            return Err(e).context("Failed to load environment variables");
        }
    }
    utils::logger::setup_logger().context("Failed to setup logger")?;
    Ok(())
}
