// Auth and user directory API routes
// Decision: /auth/me echoes the resolved UserContext, nothing is re-read
// Decision: Directory records are managed by Admin only

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tenantry_core::UserContext;
use utoipa::ToSchema;

use super::common::ErrorResponse;
use super::error::ApiError;
use super::state::AppState;
use crate::auth::{CurrentUser, RequireRole, UserAdmins};

/// Stored directory record for a subject.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponse {
    pub uid: String,
    #[schema(example = "HR")]
    pub role: String,
    #[schema(example = "acme")]
    pub tenant: String,
}

/// Role and tenant to assign.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[schema(example = "Employee")]
    pub role: String,
    #[schema(example = "acme")]
    pub tenant: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserResponse {
    pub success: bool,
    pub message: String,
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/users/:uid", get(get_user).put(update_user))
}

/// GET /auth/me - Current user
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Authenticated user", body = UserContext),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Identity not provisioned", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserContext> {
    Json(user)
}

/// GET /auth/users/{uid} - Read a directory record
#[utoipa::path(
    get,
    path = "/auth/users/{uid}",
    params(("uid" = String, Path, description = "Identity provider subject id")),
    responses(
        (status = 200, description = "Directory record", body = UserProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "No record for this subject", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn get_user(
    State(state): State<AppState>,
    _admin: RequireRole<UserAdmins>,
    Path(uid): Path<String>,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let profile = state
        .users
        .fetch_user_metadata(&uid)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User '{uid}' not found.")))?;

    Ok(Json(UserProfileResponse {
        uid,
        role: profile.role,
        tenant: profile.tenant,
    }))
}

/// PUT /auth/users/{uid} - Assign role and tenant
#[utoipa::path(
    put,
    path = "/auth/users/{uid}",
    params(("uid" = String, Path, description = "Identity provider subject id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Record saved", body = UpdateUserResponse),
        (status = 400, description = "Invalid role or tenant", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn update_user(
    State(state): State<AppState>,
    _admin: RequireRole<UserAdmins>,
    Path(uid): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UpdateUserResponse>, ApiError> {
    let Json(req) = payload?;
    state
        .users
        .update_user_metadata(&uid, &req.role, &req.tenant)
        .await?;

    Ok(Json(UpdateUserResponse {
        success: true,
        message: format!("User profile updated for UID {uid}."),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_user_request_requires_both_fields() {
        assert!(serde_json::from_str::<UpdateUserRequest>(r#"{"role": "HR"}"#).is_err());
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"role": "HR", "tenant": "acme"}"#).unwrap();
        assert_eq!(req.role, "HR");
    }

    #[test]
    fn test_update_user_response_shape() {
        let json = serde_json::to_value(UpdateUserResponse {
            success: true,
            message: "ok".to_string(),
        })
        .unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "ok");
    }
}
