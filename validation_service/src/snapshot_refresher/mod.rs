use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Result;
use tokio::{sync::RwLock, task::JoinHandle};
use tracing::{error, info, instrument, warn};

use crate::{config::LocalConfig, snapshot::MarketSnapshot};

/// Current market snapshot. Readers clone the inner `Arc` and release the lock,
/// so one request always sees a single consistent snapshot.
pub type SharedSnapshot = Arc<RwLock<Arc<MarketSnapshot>>>;

pub fn shared_snapshot(snapshot: MarketSnapshot) -> SharedSnapshot {
    Arc::new(RwLock::new(Arc::new(snapshot)))
}

/// Outcome of a refresh attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Replaced { block_number: u64 },
    /// The file on disk is older than the snapshot in use
    Stale { current: u64, found: u64 },
}

pub struct SnapshotRefresher;

impl SnapshotRefresher {
    #[instrument("SNAPSHOT_REFRESHER", skip(snapshot, local_config))]
    pub async fn start_snapshot_refresher(
        snapshot: &SharedSnapshot,
        local_config: &Arc<LocalConfig>,
    ) -> Result<JoinHandle<Result<()>>> {
        let snapshot = snapshot.clone();
        let local_config = local_config.clone();

        let handle = tokio::spawn(Self::run(snapshot, local_config));
        Ok(handle)
    }

    async fn run(snapshot: SharedSnapshot, local_config: Arc<LocalConfig>) -> Result<()> {
        info!(
            "Starting snapshot refresher, reloading {} every {}s",
            local_config.snapshot_path.display(),
            local_config.snapshot_refresh_interval
        );

        loop {
            tokio::time::sleep(Duration::from_secs(
                local_config.snapshot_refresh_interval,
            ))
            .await;

            match Self::refresh_snapshot(&snapshot, &local_config.snapshot_path).await {
                Ok(RefreshOutcome::Replaced { block_number }) => {
                    info!("Snapshot refreshed to block {}", block_number)
                }
                Ok(RefreshOutcome::Stale { current, found }) => warn!(
                    "Ignoring snapshot at block {}, already serving block {}",
                    found, current
                ),
                // keep serving the previous snapshot
                Err(e) => error!("Error refreshing snapshot: {:#}", e),
            }
        }
    }

    /// Loads the snapshot at `path` and swaps it in unless it is older than
    /// the one currently served
    pub async fn refresh_snapshot(snapshot: &SharedSnapshot, path: &Path) -> Result<RefreshOutcome> {
        let fresh = MarketSnapshot::load(path).await?;

        let mut current = snapshot.write().await;
        if fresh.block_number < current.block_number {
            return Ok(RefreshOutcome::Stale {
                current: current.block_number,
                found: fresh.block_number,
            });
        }

        let block_number = fresh.block_number;
        *current = Arc::new(fresh);
        Ok(RefreshOutcome::Replaced { block_number })
    }
}
