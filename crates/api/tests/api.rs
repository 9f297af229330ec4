//! HTTP surface tests.
//!
//! Requests go through the full router, auth middleware included, against
//! the in-memory store, started pools and a recording transport.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use murmur_api::{AppState, StaticTokenAuthenticator};
use murmur_common::LocalStorage;
use murmur_common::config::WorkersConfig;
use murmur_core::{Processor, StoreMediaManager};
use murmur_db::entities::Account;
use murmur_db::test_utils::{LOCAL_BASE_URL, local_account, public_status, remote_account};
use murmur_db::{MemoryStore, Store};
use murmur_federation::Activity;
use murmur_federation::test_utils::RecordingTransport;
use murmur_federation::UriBuilder;
use murmur_queue::Workers;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

struct TestApp {
    app: Router,
    store: Arc<MemoryStore>,
    transport: Arc<RecordingTransport>,
    processor: Processor,
    alice: Account,
    bob: Account,
    _media_dir: TempDir,
}

async fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(RecordingTransport::new());
    let media_dir = tempfile::tempdir().unwrap();

    let alice = local_account("01alice", "alice");
    let mut root = local_account("01root", "root");
    root.admin = true;
    let bob = remote_account("01bob", "bob", "remote.example");
    for account in [&alice, &root, &bob] {
        store.put_account(account.clone()).await.unwrap();
    }

    let storage = Arc::new(LocalStorage::new(
        media_dir.path().to_path_buf(),
        "/files".to_string(),
    ));
    let processor = Processor::new(
        store.clone(),
        transport.clone(),
        Arc::new(Workers::new(&WorkersConfig {
            client_api_workers: 2,
            client_api_queue_size: 16,
            federator_workers: 2,
            federator_queue_size: 16,
        })),
        Arc::new(StoreMediaManager::new(store.clone(), storage, 1)),
        UriBuilder::new(LOCAL_BASE_URL).unwrap(),
    );
    processor.start().unwrap();

    let tokens = HashMap::from([
        ("alice-token".to_string(), "01alice".to_string()),
        ("root-token".to_string(), "01root".to_string()),
    ]);
    let state = AppState {
        processor: processor.clone(),
        store: store.clone(),
        authenticator: Arc::new(StaticTokenAuthenticator::new(tokens, store.clone())),
        shutdown: CancellationToken::new(),
        media_remote_cache_days: 30,
    };

    TestApp {
        app: murmur_api::router(state),
        store,
        transport,
        processor,
        alice,
        bob,
        _media_dir: media_dir,
    }
}

fn post(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_favourite_requires_token() {
    let t = test_app().await;
    let status = public_status("01status", &t.bob);
    t.store.put_status(status).await.unwrap();

    for token in [None, Some("wrong-token")] {
        let response = t
            .app
            .clone()
            .oneshot(post("/api/v1/statuses/01status/favourite", token, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
    assert_eq!(t.store.count_faves("01status").await.unwrap(), 0);
}

#[tokio::test]
async fn test_favourite_remote_status_delivers_like() {
    let t = test_app().await;
    let status = public_status("01status", &t.bob);
    t.store.put_status(status.clone()).await.unwrap();

    let response = t
        .app
        .clone()
        .oneshot(post(
            "/api/v1/statuses/01status/favourite",
            Some("alice-token"),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["id"], "01status");
    assert_eq!(body["favourited"], true);
    assert_eq!(body["favourites_count"], 1);

    t.processor.stop().await;

    let deliveries = t.transport.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].inbox, t.bob.inbox_uri);
    let Activity::Like(like) = &deliveries[0].activity else {
        panic!("expected Like, got {:?}", deliveries[0].activity);
    };
    assert_eq!(like.actor, t.alice.uri);
    assert_eq!(like.object, status.uri);
}

#[tokio::test]
async fn test_favourite_unknown_status_is_not_found() {
    let t = test_app().await;

    let response = t
        .app
        .clone()
        .oneshot(post(
            "/api/v1/statuses/01missing/favourite",
            Some("alice-token"),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unfavourite_clears_fave() {
    let t = test_app().await;
    t.store
        .put_status(public_status("01status", &t.bob))
        .await
        .unwrap();

    for path in ["favourite", "unfavourite"] {
        let response = t
            .app
            .clone()
            .oneshot(post(
                &format!("/api/v1/statuses/01status/{path}"),
                Some("alice-token"),
                "",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert_eq!(t.store.count_faves("01status").await.unwrap(), 0);
}

#[tokio::test]
async fn test_media_cleanup_is_admin_only() {
    let t = test_app().await;

    let response = t
        .app
        .clone()
        .oneshot(post(
            "/api/v1/admin/media_cleanup",
            Some("alice-token"),
            r#"{"remote_cache_days": 7}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(t.processor.pending_maintenance(), 0);
}

#[tokio::test]
async fn test_media_cleanup_rejects_negative_days() {
    let t = test_app().await;

    let response = t
        .app
        .clone()
        .oneshot(post(
            "/api/v1/admin/media_cleanup",
            Some("root-token"),
            r#"{"remote_cache_days": -1}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(t.processor.pending_maintenance(), 0);
}

#[tokio::test]
async fn test_media_cleanup_uses_configured_default() {
    let t = test_app().await;

    let response = t
        .app
        .clone()
        .oneshot(post("/api/v1/admin/media_cleanup", Some("root-token"), "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({}));

    t.processor.wait_maintenance().await;
    assert_eq!(t.processor.pending_maintenance(), 0);
}

#[tokio::test]
async fn test_inbox_rejects_malformed_json() {
    let t = test_app().await;

    let response = t
        .app
        .clone()
        .oneshot(post("/users/alice/inbox", None, "{not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inbox_unknown_user_is_not_found() {
    let t = test_app().await;
    let like = json!({
        "type": "Like",
        "id": "https://remote.example/likes/1",
        "actor": t.bob.uri,
        "object": "https://local.example/users/alice/statuses/1",
    });

    let response = t
        .app
        .clone()
        .oneshot(post("/users/nobody/inbox", None, &like.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inbox_acknowledges_unsupported_activity() {
    let t = test_app().await;
    let move_activity = json!({
        "type": "Move",
        "id": "https://remote.example/moves/1",
        "actor": t.bob.uri,
        "object": t.bob.uri,
    });

    let response = t
        .app
        .clone()
        .oneshot(post("/users/alice/inbox", None, &move_activity.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_inbox_unknown_actor_is_unauthorized() {
    let t = test_app().await;
    let like = json!({
        "type": "Like",
        "id": "https://stranger.example/likes/1",
        "actor": "https://stranger.example/users/eve",
        "object": "https://local.example/users/alice/statuses/1",
    });

    let response = t
        .app
        .clone()
        .oneshot(post("/users/alice/inbox", None, &like.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_inbox_like_is_processed_after_ack() {
    let t = test_app().await;
    let status = public_status("01status", &t.alice);
    t.store.put_status(status.clone()).await.unwrap();
    let like = json!({
        "type": "Like",
        "id": "https://remote.example/likes/1",
        "actor": t.bob.uri,
        "object": status.uri,
    });

    let response = t
        .app
        .clone()
        .oneshot(post("/users/alice/inbox", None, &like.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    t.processor.stop().await;

    assert_eq!(t.store.count_faves("01status").await.unwrap(), 1);
    assert!(t.transport.deliveries().is_empty());
}
