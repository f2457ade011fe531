//! Policydesk HTTP server library logic.

pub mod api;
pub mod api_auth;
pub mod api_members;
pub mod api_policies;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use policydesk_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Maximum request body size (1 MiB).
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
///
/// No route requires authentication.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(api_auth::register_handler))
        .route("/api/auth/login", post(api_auth::login_handler))
        .route(
            "/api/members",
            get(api_members::list_members_handler).post(api_members::create_member_handler),
        )
        .route(
            "/api/members/{id}",
            get(api_members::get_member_handler)
                .put(api_members::update_member_handler)
                .delete(api_members::delete_member_handler),
        )
        .route(
            "/api/policies",
            get(api_policies::list_policies_handler).post(api_policies::create_policy_handler),
        )
        .route(
            "/api/policies/{id}",
            get(api_policies::get_policy_handler)
                .put(api_policies::update_policy_handler)
                .delete(api_policies::delete_policy_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
