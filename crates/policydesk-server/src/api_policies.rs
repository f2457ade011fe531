//! Policy handlers: list, get, create, update and delete.
//!
//! Stored rows are returned as found, including text left in numeric
//! columns by earlier clients.

use crate::api::{with_conn, ApiError, JsonBody};
use crate::AppState;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use policydesk_records::{
    create_policy, delete_policy, get_policy, list_policies, update_policy, NewPolicy, Policy,
    PolicyTerms, RecordError,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn policy_err(e: RecordError) -> ApiError {
    match e {
        RecordError::NotFound { .. } => ApiError::NotFound("Policy not found".to_string()),
        err => ApiError::database(err),
    }
}

/// GET /api/policies
pub async fn list_policies_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Policy>>, ApiError> {
    let policies = with_conn(&state.pool, |conn| list_policies(conn).map_err(policy_err)).await?;
    Ok(Json(policies))
}

/// GET /api/policies/{id}
pub async fn get_policy_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Policy>, ApiError> {
    let policy = with_conn(&state.pool, move |conn| get_policy(conn, id).map_err(policy_err)).await?;
    Ok(Json(policy))
}

/// POST /api/policies
///
/// `memberId` is stored as given; it is only checked against `members` when
/// foreign keys are enforced.
pub async fn create_policy_handler(
    Extension(state): Extension<Arc<AppState>>,
    JsonBody(payload): JsonBody<NewPolicy>,
) -> Result<Json<Value>, ApiError> {
    let id = with_conn(&state.pool, move |conn| {
        create_policy(conn, &payload).map_err(policy_err)
    })
    .await?;

    Ok(Json(json!({ "id": id })))
}

/// PUT /api/policies/{id}
///
/// Overwrites the policy terms. A `memberId` in the body is ignored.
pub async fn update_policy_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<PolicyTerms>,
) -> Result<StatusCode, ApiError> {
    let changed = with_conn(&state.pool, move |conn| {
        update_policy(conn, id, &payload).map_err(policy_err)
    })
    .await?;

    tracing::debug!(policy_id = id, changed, "policy update");
    Ok(StatusCode::OK)
}

/// DELETE /api/policies/{id}
pub async fn delete_policy_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let removed =
        with_conn(&state.pool, move |conn| delete_policy(conn, id).map_err(policy_err)).await?;

    tracing::debug!(policy_id = id, removed, "policy delete");
    Ok(StatusCode::OK)
}
