//! Post controller. Reads are public, writes are admin only.

use super::invalid_id;
use crate::{
    extractors::{AuthenticatedUser, PageRange, ValidatedJson},
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use quill_core::PostId;
use quill_security::{guards, ClaimsExt};
use quill_service::{CreatePostRequest, PostResponse, UpdatePostRequest};
use tracing::debug;

/// Creates the post router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).put(update_post).delete(delete_post))
}

fn parse_post_id(id: &str) -> Result<PostId, AppError> {
    PostId::parse(id).map_err(|_| invalid_id("post", id))
}

#[utoipa::path(
    get,
    path = "/posts",
    tag = "posts",
    params(
        ("start" = u64, Query, description = "First record offset"),
        ("end" = u64, Query, description = "Last record offset, inclusive")
    ),
    responses((status = 200, description = "Posts in range", body = [PostResponse]))
)]
pub async fn list_posts(
    State(state): State<AppState>,
    PageRange(range): PageRange,
) -> ApiResult<Vec<PostResponse>> {
    let response = state.post_service.list_posts(range).await?;
    ok(response)
}

#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post found", body = PostResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PostResponse> {
    let post_id = parse_post_id(&id)?;
    let response = state.post_service.get_post(post_id).await?;
    ok(response)
}

/// Create a post authored by the caller.
#[utoipa::path(
    post,
    path = "/posts",
    tag = "posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Invalid request or unknown category"),
        (status = 409, description = "Slug already taken")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostResponse>>), AppError> {
    debug!("Create post request: {}", request.title);

    user.require_any_role(guards::ADMIN_ONLY)?;

    let response = state.post_service.create_post(user.sub, request).await?;
    Ok(created(response))
}

#[utoipa::path(
    put,
    path = "/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdatePostRequest>,
) -> ApiResult<PostResponse> {
    debug!("Update post request: {}", id);

    user.require_any_role(guards::ADMIN_ONLY)?;

    let post_id = parse_post_id(&id)?;
    let response = state.post_service.update_post(post_id, request).await?;
    ok(response)
}

#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Deleted post", body = PostResponse),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<PostResponse> {
    debug!("Delete post request: {}", id);

    user.require_any_role(guards::ADMIN_ONLY)?;

    let post_id = parse_post_id(&id)?;
    let response = state.post_service.delete_post(post_id).await?;
    ok(response)
}
