//! Edge cases for the principal's HTTP surface and the dirty-flag contract.
//!
//! These verify that rejected requests never mutate state or set the flag, and that
//! the check endpoint consumes the flag while peek does not.

mod common;

use serde_json::{Value, json};

use common::{spawn_principal, spawn_replica};

async fn body(response: reqwest::Response) -> Value {
    response.json().await.unwrap()
}

#[tokio::test]
async fn test_non_integer_id_is_rejected() {
    let client = reqwest::Client::new();
    let (principal, store) = spawn_principal().await;
    store.create(user_replication::RecordInput::new("A", "a"));
    store.check_and_reset();

    let response = client
        .put(principal.url("/users/abc"))
        .json(&json!({"name": "X", "username": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(body(response).await, json!({"error": "Invalid ID"}));

    let response = client
        .delete(principal.url("/users/1.5"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    assert!(!store.peek());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_invalid_bodies_are_rejected() {
    let client = reqwest::Client::new();
    let (principal, store) = spawn_principal().await;

    let response = client
        .post(principal.url("/users"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(body(response).await, json!({"error": "Invalid request body"}));

    let response = client
        .post(principal.url("/users"))
        .json(&json!({"name": "only a name"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let created = store.create(user_replication::RecordInput::new("A", "a"));
    store.check_and_reset();
    let response = client
        .put(principal.url(&format!("/users/{}", created.id)))
        .body("plain text")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    assert!(!store.peek());
    assert_eq!(store.list(), vec![created]);
}

#[tokio::test]
async fn test_update_and_delete_unknown_ids() {
    let client = reqwest::Client::new();
    let (principal, store) = spawn_principal().await;

    let response = client
        .put(principal.url("/users/7"))
        .json(&json!({"name": "X", "username": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(body(response).await, json!({"error": "User not found"}));

    let response = client
        .delete(principal.url("/users/-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    assert!(!store.peek());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_crud_round_trip_over_http() {
    let client = reqwest::Client::new();
    let (principal, _store) = spawn_principal().await;

    let response = client
        .post(principal.url("/users"))
        .json(&json!({"id": 500, "name": "A", "username": "a"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    assert_eq!(
        body(response).await,
        json!({"id": 1, "name": "A", "username": "a"})
    );

    let response = client
        .put(principal.url("/users/1"))
        .json(&json!({"name": "Alice", "username": "alice"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        body(response).await,
        json!({"id": 1, "name": "Alice", "username": "alice"})
    );

    let response = client.get(principal.url("/users")).send().await.unwrap();
    assert_eq!(
        body(response).await,
        json!([{"id": 1, "name": "Alice", "username": "alice"}])
    );

    let response = client
        .delete(principal.url("/users/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let response = client.get(principal.url("/users")).send().await.unwrap();
    assert_eq!(body(response).await, json!([]));
}

#[tokio::test]
async fn test_check_consumes_but_peek_does_not() {
    let client = reqwest::Client::new();
    let (principal, store) = spawn_principal().await;
    store.create(user_replication::RecordInput::new("A", "a"));

    for _ in 0..2 {
        let response = client.get(principal.url("/users/peek")).send().await.unwrap();
        assert_eq!(body(response).await, json!({"newChanges": true}));
    }

    let response = client
        .get(principal.url("/users/check-new"))
        .send()
        .await
        .unwrap();
    assert_eq!(body(response).await, json!({"newChanges": true}));

    let response = client
        .get(principal.url("/users/check-new"))
        .send()
        .await
        .unwrap();
    assert_eq!(body(response).await, json!({"newChanges": false}));
}

#[tokio::test]
async fn test_manual_short_poll_masks_pending_sync() {
    let (principal, store) = spawn_principal().await;
    let (_replica, agent) = spawn_replica(&principal.base_url()).await;

    store.create(user_replication::RecordInput::new("A", "a"));
    assert!(agent.short_poll().await.unwrap().new_changes);

    // The flag is gone; a later cycle sees nothing to do even though the mirror is stale.
    assert_eq!(
        agent.poll_once().await.unwrap(),
        user_replication::PollOutcome::Unchanged
    );
    assert!(agent.data().is_empty());
}

#[tokio::test]
async fn test_health_endpoints() {
    let client = reqwest::Client::new();
    let (principal, _store) = spawn_principal().await;
    let (replica, _agent) = spawn_replica(&principal.base_url()).await;

    for url in [principal.url("/health"), replica.url("/health")] {
        let response = client.get(url).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(body(response).await["status"], "ok");
    }

    let response = client
        .get(replica.url("/replication/status"))
        .send()
        .await
        .unwrap();
    let status = body(response).await;
    assert_eq!(status["checks"], 0);
    assert_eq!(status["last_synced_at"], Value::Null);
}

#[tokio::test]
async fn test_reserved_segments_are_invalid_ids_for_put_and_delete() {
    let client = reqwest::Client::new();
    let (principal, store) = spawn_principal().await;
    store.create(user_replication::RecordInput::new("A", "a"));

    for path in ["/users/check-new", "/users/peek"] {
        let response = client
            .put(principal.url(path))
            .json(&json!({"name": "X", "username": "x"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400, "PUT {path}");
        assert_eq!(body(response).await, json!({"error": "Invalid ID"}));

        let response = client.delete(principal.url(path)).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 400, "DELETE {path}");
        assert_eq!(body(response).await, json!({"error": "Invalid ID"}));
    }

    // Rejected requests neither consumed nor touched the flag.
    assert!(store.peek());
    assert_eq!(store.len(), 1);
}
