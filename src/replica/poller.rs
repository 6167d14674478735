//! Background poll loop.
//!
//! ```text
//!            interval elapsed              changes = true
//!  Idle-Wait ────────────────► check ───────────────────► Syncing
//!     ▲                          │ false / error             │ ok / error
//!     └──────────────────────────┴───────────────────────────┘
//! ```
//!
//! The wait starts only after the previous cycle finished, so cycles never overlap.
//! Shutdown is observed while waiting; a cycle in progress always runs to completion.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::replica::agent::{PollOutcome, ReplicationAgent};

/// Handle to a running poll loop.
pub struct ReplicationTask {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ReplicationTask {
    /// Spawns the loop on the current tokio runtime.
    pub fn spawn(agent: Arc<ReplicationAgent>, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run(agent, interval, shutdown_rx));
        ReplicationTask {
            shutdown_tx,
            handle,
        }
    }

    /// Signals the loop to stop and waits for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Replication task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Runs poll cycles every `interval` until `shutdown_rx` turns true or its sender drops.
pub async fn run(
    agent: Arc<ReplicationAgent>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!(interval_ms = interval.as_millis() as u64, "Starting replication loop");

    loop {
        // A stop requested before this task first ran, or during the last cycle.
        if *shutdown_rx.borrow_and_update() {
            break;
        }

        tokio::select! {
            biased;

            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    break;
                }
                continue;
            }

            _ = tokio::time::sleep(interval) => {}
        }

        match agent.poll_once().await {
            Ok(PollOutcome::Synced(records)) => info!(records, "Replication cycle synced"),
            Ok(PollOutcome::Unchanged) => {}
            Err(e) => warn!(error = %e, "Replication cycle failed"),
        }
    }

    info!("Replication loop stopped");
}
