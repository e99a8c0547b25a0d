// Liveness endpoints (never prefixed, never authenticated)

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::common::MessageResponse;
use super::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Active tenant document backend
    pub tenant_store: &'static str,
    /// Active user directory backend
    pub user_directory: &'static str,
}

/// GET /ping
#[utoipa::path(
    get,
    path = "/ping",
    responses((status = 200, description = "Service is up", body = MessageResponse)),
    tag = "health"
)]
pub async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse::new("pong"))
}

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service health", body = HealthResponse)),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        tenant_store: state.tenants.backend_name(),
        user_directory: state.users.backend_name(),
    })
}
