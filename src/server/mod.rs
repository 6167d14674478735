//! HTTP surface for both services.
//!
//! The principal and the replica each get their own router and listen on their own
//! port; they share only the health endpoint and the serve helper.

pub mod principal;
pub mod replication;

use axum::{Router, response::Json};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::net::TcpListener;

pub use principal::principal_router;
pub use replication::replication_router;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Basic health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running!".to_string(),
    })
}

/// Serves `router` on `listener` until `shutdown` resolves, then drains open requests.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}
