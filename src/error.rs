//! Error types for the principal store, the replication client and the HTTP surface.
//!
//! | Error | Status | Raised by |
//! |-------|--------|-----------|
//! | `ApiError::InvalidId` | 400 | non-integer path id |
//! | `ApiError::InvalidBody` | 400 | malformed or incomplete JSON body |
//! | `ApiError::NotFound` | 404 | update/delete of an unknown id |
//! | `ApiError::ShortPoll` | 500 | manual flag check failed upstream |
//! | `ApiError::LongPoll` | 500 | manual sync failed upstream |
//!
//! None of these are fatal to either process.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::store::RecordId;

/// Errors raised by [`PrincipalStore`](crate::store::PrincipalStore) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The targeted record does not exist. No state was mutated.
    #[error("user {0} not found")]
    NotFound(RecordId),
}

/// Result type alias for replication operations.
pub type Result<T> = std::result::Result<T, ReplicationError>;

/// Errors raised while talking to the principal.
///
/// All variants are transient from the poll loop's point of view: it logs them and
/// waits for the next tick.
#[derive(Error, Debug)]
pub enum ReplicationError {
    /// Connection refused, reset, or any other transport failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The principal did not answer within the configured request timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The principal answered with a non-success status.
    #[error("{url} returned {status}")]
    UpstreamStatus { url: String, status: u16 },

    /// The response body was not the expected JSON.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ReplicationError {
    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            ReplicationError::Timeout {
                url: url.to_string(),
            }
        } else if source.is_decode() {
            ReplicationError::Decode {
                url: url.to_string(),
                message: source.to_string(),
            }
        } else {
            ReplicationError::Transport {
                url: url.to_string(),
                source,
            }
        }
    }

    /// Returns true if the principal did not answer in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ReplicationError::Timeout { .. })
    }
}

/// Errors returned to HTTP callers of either service.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid ID")]
    InvalidId,

    #[error("Invalid request body")]
    InvalidBody,

    #[error("User not found")]
    NotFound,

    #[error("Failed to check for new records")]
    ShortPoll(#[source] ReplicationError),

    #[error("Failed to fetch users")]
    LongPoll(#[source] ReplicationError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId | ApiError::InvalidBody => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::ShortPoll(_) | ApiError::LongPoll(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
