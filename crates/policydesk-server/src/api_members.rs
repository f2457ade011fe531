//! Member handlers: list, get, create, update and delete.

use crate::api::{with_conn, ApiError, JsonBody};
use crate::AppState;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use policydesk_records::{
    create_member, delete_member, get_member, list_members, update_member, Member, MemberFields,
    RecordError,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// `NotFound` → 404, everything else → 500 (with error logged).
fn member_err(e: RecordError) -> ApiError {
    match e {
        RecordError::NotFound { .. } => ApiError::NotFound("Member not found".to_string()),
        err => ApiError::database(err),
    }
}

/// GET /api/members
pub async fn list_members_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Member>>, ApiError> {
    let members = with_conn(&state.pool, |conn| list_members(conn).map_err(member_err)).await?;
    Ok(Json(members))
}

/// GET /api/members/{id}
pub async fn get_member_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Member>, ApiError> {
    let member = with_conn(&state.pool, move |conn| get_member(conn, id).map_err(member_err)).await?;
    Ok(Json(member))
}

/// POST /api/members
pub async fn create_member_handler(
    Extension(state): Extension<Arc<AppState>>,
    JsonBody(payload): JsonBody<MemberFields>,
) -> Result<Json<Value>, ApiError> {
    let id = with_conn(&state.pool, move |conn| {
        create_member(conn, &payload).map_err(member_err)
    })
    .await?;

    Ok(Json(json!({ "id": id })))
}

/// PUT /api/members/{id}
///
/// Succeeds whether or not a member with `id` exists.
pub async fn update_member_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<MemberFields>,
) -> Result<StatusCode, ApiError> {
    let changed = with_conn(&state.pool, move |conn| {
        update_member(conn, id, &payload).map_err(member_err)
    })
    .await?;

    tracing::debug!(member_id = id, changed, "member update");
    Ok(StatusCode::OK)
}

/// DELETE /api/members/{id}
pub async fn delete_member_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let removed =
        with_conn(&state.pool, move |conn| delete_member(conn, id).map_err(member_err)).await?;

    tracing::debug!(member_id = id, removed, "member delete");
    Ok(StatusCode::OK)
}
