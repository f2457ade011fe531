#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use policydesk_db::{create_pool, init_schema, DbPool, DbRuntimeSettings};
use policydesk_server::{app, AppState};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// A router over a fresh database file. Keep `_dir` alive for the test.
pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
    _dir: TempDir,
}

pub fn setup_app() -> TestApp {
    setup_app_with(DbRuntimeSettings::default())
}

pub fn setup_app_with(settings: DbRuntimeSettings) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policydesk.db");
    let pool = create_pool(path.to_str().unwrap(), settings).unwrap();
    {
        let conn = pool.get().unwrap();
        let failures = init_schema(&conn);
        assert!(failures.is_empty(), "schema init failed: {failures:?}");
    }

    TestApp {
        router: app(AppState { pool: pool.clone() }),
        pool,
        _dir: dir,
    }
}

impl TestApp {
    /// Sends a request and returns the status with the body parsed as JSON
    /// (`Value::Null` for an empty or non-JSON body).
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        match body {
            Some(json) => {
                self.send_raw(method, uri, Some("application/json"), json.to_string())
                    .await
            }
            None => self.send_raw(method, uri, None, String::new()).await,
        }
    }

    /// Like [`TestApp::send`], with the content type and body bytes given as is.
    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: impl Into<Body>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(body.into()).unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub fn count(&self, table: &str) -> i64 {
        let conn = self.pool.get().unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }
}
