//! Replication agent: the two poll phases and the mirror they feed.
//!
//! A poll cycle is a short poll (cheap dirty-flag check) followed, only when the
//! principal reports changes, by a long poll (full fetch and wholesale mirror swap).

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};

use crate::config::ReplicaConfig;
use crate::error::Result;
use crate::replica::client::PrincipalClient;
use crate::replica::mirror::{Mirror, Snapshot};
use crate::store::ChangeCheck;

/// What a single poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The principal reported no changes; nothing was fetched.
    Unchanged,
    /// The principal reported changes and the mirror was replaced with this many records.
    Synced(usize),
}

/// Counters describing the agent's activity since startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplicationStatus {
    pub checks: u64,
    pub changes_detected: u64,
    pub syncs: u64,
    pub failures: u64,
    pub mirror_len: usize,
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// Mirrors one principal.
///
/// The mirror lock is only taken for the final swap. Syncs are serialized by a separate
/// async lock which may be held across the fetch, so readers of the mirror never wait
/// on the network.
pub struct ReplicationAgent {
    client: PrincipalClient,
    mirror: Mirror,
    sync_lock: AsyncMutex<()>,
    status: Mutex<ReplicationStatus>,
}

impl ReplicationAgent {
    pub fn new(config: &ReplicaConfig) -> Result<Self> {
        Ok(Self::with_client(PrincipalClient::new(config)?))
    }

    pub fn with_client(client: PrincipalClient) -> Self {
        ReplicationAgent {
            client,
            mirror: Mirror::new(),
            sync_lock: AsyncMutex::new(()),
            status: Mutex::new(ReplicationStatus::default()),
        }
    }

    /// Performs exactly one dirty-flag check and returns the raw result.
    ///
    /// The principal clears its flag when answering, so a `true` seen here is gone for
    /// the background loop as well.
    pub async fn short_poll(&self) -> Result<ChangeCheck> {
        let result = self.client.check_new().await;

        let mut status = self.status.lock();
        match &result {
            Ok(check) => {
                status.checks += 1;
                if check.new_changes {
                    status.changes_detected += 1;
                }
            }
            Err(_) => status.failures += 1,
        }
        result
    }

    /// Fetches the full record set and swaps it into the mirror.
    ///
    /// On any failure the mirror is left exactly as it was. Concurrent calls run one
    /// after another; the last one to finish wins.
    pub async fn long_poll(&self) -> Result<Snapshot> {
        let _guard = self.sync_lock.lock().await;

        let records = match self.client.fetch_users().await {
            Ok(records) => records,
            Err(e) => {
                self.status.lock().failures += 1;
                return Err(e);
            }
        };

        let snapshot = self.mirror.replace(records);

        let mut status = self.status.lock();
        status.syncs += 1;
        status.last_synced_at = Some(Utc::now());
        drop(status);

        info!(records = snapshot.len(), "Data successfully synchronized");
        Ok(snapshot)
    }

    /// One short poll, followed by a long poll if the principal reported changes.
    pub async fn poll_once(&self) -> Result<PollOutcome> {
        let check = self.short_poll().await?;
        if !check.new_changes {
            debug!("No changes detected");
            return Ok(PollOutcome::Unchanged);
        }

        info!("Changes detected, executing long poll");
        let snapshot = self.long_poll().await?;
        Ok(PollOutcome::Synced(snapshot.len()))
    }

    /// Current mirror contents. Never touches the network.
    pub fn data(&self) -> Snapshot {
        self.mirror.snapshot()
    }

    /// Activity counters. Never touches the network.
    pub fn status(&self) -> ReplicationStatus {
        let mut status = self.status.lock().clone();
        status.mirror_len = self.mirror.len();
        status
    }
}
