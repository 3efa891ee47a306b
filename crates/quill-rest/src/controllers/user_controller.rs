//! User management controller.

use super::invalid_id;
use crate::{
    extractors::{AuthenticatedUser, PageRange, ValidatedJson},
    responses::{ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use quill_core::UserId;
use quill_security::{guards, ClaimsExt};
use quill_service::{UpdateUserRequest, UserResponse};
use tracing::debug;

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

fn parse_user_id(id: &str) -> Result<UserId, AppError> {
    UserId::parse(id).map_err(|_| invalid_id("user", id))
}

/// List users (admin only).
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(
        ("start" = u64, Query, description = "First record offset"),
        ("end" = u64, Query, description = "Last record offset, inclusive")
    ),
    responses(
        (status = 200, description = "Users in range", body = [UserResponse]),
        (status = 401, description = "Not an administrator")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PageRange(range): PageRange,
) -> ApiResult<Vec<UserResponse>> {
    debug!("List users request: {}", range);

    user.require_any_role(guards::ADMIN_ONLY)?;

    let response = state.user_service.list_users(range).await?;
    ok(response)
}

/// Get a user by ID (self or admin).
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<UserResponse> {
    debug!("Get user request: {}", id);

    let user_id = parse_user_id(&id)?;
    user.require_self_or_any_role(user_id, guards::ADMIN_ONLY)?;

    let response = state.user_service.get_user(user_id).await?;
    ok(response)
}

/// Update a user (self or admin). Empty fields are left unchanged.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    debug!("Update user request: {}", id);

    let user_id = parse_user_id(&id)?;
    user.require_self_or_any_role(user_id, guards::ADMIN_ONLY)?;

    let response = state.user_service.update_user(user_id, request).await?;
    ok(response)
}

/// Delete a user (admin only).
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted user", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<UserResponse> {
    debug!("Delete user request: {}", id);

    user.require_any_role(guards::ADMIN_ONLY)?;

    let user_id = parse_user_id(&id)?;
    let response = state.user_service.delete_user(user_id).await?;
    ok(response)
}
