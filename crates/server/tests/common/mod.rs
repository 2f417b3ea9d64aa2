//! Common test utilities for driving the API in-process.
//!
//! The fixture wires the router to a SQLite media library in a temp
//! directory, so tests seed shows and episodes directly and then exercise
//! the cart endpoints with a session header.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use lundflix_core::{
    Config, DatabaseConfig, MediaLibrary, MemorySessionStore, SessionStore, SqliteLibrary,
};
use lundflix_server::{create_router, AppState};

/// Re-export fixtures for test convenience
pub use lundflix_core::testing::fixtures;

/// Session id sent by the request helpers
pub const DEFAULT_SESSION: &str = "test-session";

/// In-process server backed by a seeded library.
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_toggle() {
///     let fixture = TestFixture::new();
///     let response = fixture.post("/api/v1/cart/movies/1/toggle", Value::Null).await;
///     assert_eq!(response.status, StatusCode::OK);
/// }
/// ```
pub struct TestFixture {
    pub router: Router,
    /// Library behind the router; seed it directly
    pub library: Arc<SqliteLibrary>,
    pub sessions: Arc<MemorySessionStore>,
    /// Temporary directory holding the library database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("library.db");

        let config = Config {
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            ..Default::default()
        };

        let library = Arc::new(SqliteLibrary::new(&db_path).expect("Failed to create library"));
        let sessions = Arc::new(MemorySessionStore::new());

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&sessions) as Arc<dyn SessionStore>,
            Arc::clone(&library) as Arc<dyn MediaLibrary>,
        ));

        Self {
            router: create_router(state),
            library,
            sessions,
            temp_dir,
        }
    }

    /// Seed show 1 "Alpha" with a three-episode first season.
    pub fn seed_alpha(&self) {
        self.library
            .upsert_show(&fixtures::show(1, "Alpha"))
            .expect("Failed to seed show");
        self.library
            .upsert_episodes(&fixtures::weekly_season(1, 1, 101, 3, "2024-01-01"))
            .expect("Failed to seed episodes");
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, Some(DEFAULT_SESSION)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), Some(DEFAULT_SESSION))
            .await
    }

    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body), Some(DEFAULT_SESSION))
            .await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None, Some(DEFAULT_SESSION))
            .await
    }

    /// Send a request as a specific session, or with no session header.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        session: Option<&str>,
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        if let Some(session_id) = session {
            request_builder = request_builder.header("X-Session-Id", session_id);
        }

        let body = match body {
            Some(json_body) if !json_body.is_null() => {
                request_builder = request_builder.header("Content-Type", "application/json");
                Body::from(serde_json::to_vec(&json_body).unwrap())
            }
            _ => Body::empty(),
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
