// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use serde_json::Value;
use std::sync::Arc;
use trailhead_api::config::Config;
use trailhead_api::db::{FirestoreDb, MemoryStore};
use trailhead_api::middleware::auth::create_jwt;
use trailhead_api::routes::create_router;
use trailhead_api::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Test app over an in-memory store.
/// Returns the router, the shared state, and a handle on the store for seeding.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, MemoryStore) {
    let config = Config::test_default();
    let store = MemoryStore::new();

    let state = Arc::new(AppState {
        config,
        store: Arc::new(store.clone()),
    });

    (create_router(state.clone()), state, store)
}

/// Create a test JWT token.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: u64) -> String {
    create_jwt(user_id, &Config::test_default().jwt_signing_key).unwrap()
}

/// Build an authenticated JSON request.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, user_id: u64, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", create_test_jwt(user_id)),
        )
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
