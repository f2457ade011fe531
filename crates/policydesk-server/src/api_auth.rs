//! Registration and login handlers.
//!
//! Login only reports whether the credentials matched. No token or session
//! is issued, and no other endpoint checks for one.

use crate::api::{with_conn, ApiError, JsonBody};
use crate::AppState;
use axum::extract::{Extension, Json};
use policydesk_accounts::{login, register, AccountError, Credentials, Registration};
use serde_json::{json, Value};
use std::sync::Arc;

fn account_err(e: AccountError) -> ApiError {
    match e {
        AccountError::MissingFields => ApiError::BadRequest("All fields required".to_string()),
        AccountError::EmailInUse => ApiError::BadRequest("Email in use".to_string()),
        AccountError::InvalidCredentials => ApiError::BadRequest("Invalid credentials".to_string()),
        AccountError::Hashing(msg) => {
            tracing::error!(error = %msg, "password hashing failed");
            ApiError::InternalServerError("Server error".to_string())
        }
        AccountError::Database(err) => ApiError::database(err),
    }
}

/// POST /api/auth/register
pub async fn register_handler(
    Extension(state): Extension<Arc<AppState>>,
    JsonBody(payload): JsonBody<Registration>,
) -> Result<Json<Value>, ApiError> {
    with_conn(&state.pool, move |conn| {
        register(conn, &payload).map_err(account_err)
    })
    .await?;

    Ok(Json(json!({ "message": "Registered" })))
}

/// POST /api/auth/login
pub async fn login_handler(
    Extension(state): Extension<Arc<AppState>>,
    JsonBody(payload): JsonBody<Credentials>,
) -> Result<Json<Value>, ApiError> {
    let user = with_conn(&state.pool, move |conn| {
        login(conn, &payload).map_err(account_err)
    })
    .await?;

    tracing::info!(user_id = user.id, "login successful");
    Ok(Json(json!({ "message": "Login successful" })))
}
