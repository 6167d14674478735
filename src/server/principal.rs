//! Route handlers for the principal service.

use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, put},
};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::server::health;
use crate::store::{ChangeCheck, PrincipalStore, Record, RecordId, RecordInput};

/// Shared principal state
pub type PrincipalState = Arc<PrincipalStore>;

fn parse_id(raw: &str) -> Result<RecordId, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId)
}

/// `GET /users`
pub async fn list_users(State(store): State<PrincipalState>) -> Json<Vec<Record>> {
    Json(store.list())
}

/// `POST /users`
pub async fn create_user(
    State(store): State<PrincipalState>,
    payload: Result<Json<RecordInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let Json(input) = payload.map_err(|_| ApiError::InvalidBody)?;
    let record = store.create(input);
    Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /users/:id`
pub async fn update_user(
    State(store): State<PrincipalState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<RecordInput>, JsonRejection>,
) -> Result<Json<Record>, ApiError> {
    let id = parse_id(&raw_id)?;
    let Json(input) = payload.map_err(|_| ApiError::InvalidBody)?;
    Ok(Json(store.update(id, input)?))
}

/// `DELETE /users/:id`
pub async fn delete_user(
    State(store): State<PrincipalState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    store.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /users/check-new`: reports and clears the dirty flag.
pub async fn check_new(State(store): State<PrincipalState>) -> Json<ChangeCheck> {
    let check = ChangeCheck::new(store.check_and_reset());
    if check.new_changes {
        info!("Reported pending changes to a poller");
    }
    Json(check)
}

/// `GET /users/peek`: reports the dirty flag without clearing it.
pub async fn peek(State(store): State<PrincipalState>) -> Json<ChangeCheck> {
    Json(ChangeCheck::new(store.peek()))
}

/// `PUT`/`DELETE` on `/users/check-new` and `/users/peek`: those segments are ids that
/// do not parse.
async fn reject_id() -> ApiError {
    ApiError::InvalidId
}

/// Creates the principal router
pub fn principal_router(store: PrincipalState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/check-new",
            get(check_new).put(reject_id).delete(reject_id),
        )
        .route("/users/peek", get(peek).put(reject_id).delete(reject_id))
        .route("/users/:id", put(update_user).delete(delete_user))
        .with_state(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert_eq!(parse_id("-3").unwrap(), -3);
        assert!(matches!(parse_id("abc"), Err(ApiError::InvalidId)));
        assert!(matches!(parse_id("1.5"), Err(ApiError::InvalidId)));
    }
}
