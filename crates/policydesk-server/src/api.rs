//! Shared pieces for the HTTP handlers: the error type, the JSON body
//! extractor and blocking DB access.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use policydesk_db::DbPool;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Generic message returned for any storage failure.
pub const DB_ERROR: &str = "DB error";

/// Message returned for a request body that cannot be decoded.
pub const INVALID_BODY: &str = "Invalid JSON body";

/// API error type mapping to HTTP status codes.
///
/// The message is sent to the client verbatim, so internal details must be
/// logged before constructing an `InternalServerError`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl ApiError {
    /// Logs `err` and returns the generic storage failure.
    pub fn database(err: impl std::fmt::Display) -> Self {
        tracing::error!(error = %err, "database operation failed");
        ApiError::InternalServerError(DB_ERROR.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// JSON request body whose failures render as [`ApiError`].
///
/// A request with no body, or without a JSON content type, yields
/// `T::default()`, the same as an empty object. A body that is not valid
/// JSON for `T` is a 400.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim_start().starts_with("application/json"));
        if !is_json {
            return Ok(JsonBody(T::default()));
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge("Request body too large".to_string())
            } else {
                tracing::debug!(error = %rejection.body_text(), "failed to read request body");
                ApiError::BadRequest(INVALID_BODY.to_string())
            }
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            tracing::debug!(error = %e, "rejected request body");
            ApiError::BadRequest(INVALID_BODY.to_string())
        })
    }
}

/// Runs `f` on a pooled connection inside the blocking thread pool.
///
/// Pool exhaustion and task panics are reported as the generic storage
/// failure.
pub async fn with_conn<T, F>(pool: &DbPool, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(ApiError::database)?;
        f(&conn)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "blocking task join error");
        ApiError::InternalServerError(DB_ERROR.to_string())
    })?
}
