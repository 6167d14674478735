//! Route handlers for the replication service.
//!
//! These expose the poll loop's two phases for manual triggering, plus read-only views
//! of the mirror and the agent's counters.

use axum::{Router, extract::State, response::Json, routing::get};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::replica::{ReplicationAgent, ReplicationStatus};
use crate::server::health;
use crate::store::{ChangeCheck, Record};

/// Shared replication state
pub type ReplicationState = Arc<ReplicationAgent>;

/// `GET /replication/short`: one dirty-flag check. Consumes the principal's flag.
pub async fn short_poll(
    State(agent): State<ReplicationState>,
) -> Result<Json<ChangeCheck>, ApiError> {
    info!("Short polling endpoint accessed manually");
    match agent.short_poll().await {
        Ok(check) => Ok(Json(check)),
        Err(e) => {
            warn!(error = %e, "Manual short poll failed");
            Err(ApiError::ShortPoll(e))
        }
    }
}

/// `GET /replication/long`: one full sync, returning the synced records.
pub async fn long_poll(
    State(agent): State<ReplicationState>,
) -> Result<Json<Vec<Record>>, ApiError> {
    info!("Long polling endpoint accessed manually");
    match agent.long_poll().await {
        Ok(snapshot) => Ok(Json(snapshot.to_vec())),
        Err(e) => {
            warn!(error = %e, "Manual long poll failed");
            Err(ApiError::LongPoll(e))
        }
    }
}

/// `GET /replication/data`
pub async fn data(State(agent): State<ReplicationState>) -> Json<Vec<Record>> {
    Json(agent.data().to_vec())
}

/// `GET /replication/status`
pub async fn status(State(agent): State<ReplicationState>) -> Json<ReplicationStatus> {
    Json(agent.status())
}

/// Creates the replication router
pub fn replication_router(agent: ReplicationState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/replication/short", get(short_poll))
        .route("/replication/long", get(long_poll))
        .route("/replication/data", get(data))
        .route("/replication/status", get(status))
        .with_state(agent)
}
