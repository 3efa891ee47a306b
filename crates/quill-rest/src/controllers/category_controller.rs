//! Category controller. Reads are public, writes are admin only.

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
use quill_core::CategoryId;
use quill_security::{guards, ClaimsExt};
use quill_service::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use tracing::debug;

/// Creates the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

fn parse_category_id(id: &str) -> Result<CategoryId, AppError> {
    CategoryId::parse(id).map_err(|_| invalid_id("category", id))
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    params(
        ("start" = u64, Query, description = "First record offset"),
        ("end" = u64, Query, description = "Last record offset, inclusive")
    ),
    responses((status = 200, description = "Categories in range", body = [CategoryResponse]))
)]
pub async fn list_categories(
    State(state): State<AppState>,
    PageRange(range): PageRange,
) -> ApiResult<Vec<CategoryResponse>> {
    let response = state.category_service.list_categories(range).await?;
    ok(response)
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CategoryResponse> {
    let category_id = parse_category_id(&id)?;
    let response = state.category_service.get_category(category_id).await?;
    ok(response)
}

#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 409, description = "Name already taken")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), AppError> {
    debug!("Create category request: {}", request.name);

    user.require_any_role(guards::ADMIN_ONLY)?;

    let response = state.category_service.create_category(request).await?;
    Ok(created(response))
}

#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCategoryRequest>,
) -> ApiResult<CategoryResponse> {
    debug!("Update category request: {}", id);

    user.require_any_role(guards::ADMIN_ONLY)?;

    let category_id = parse_category_id(&id)?;
    let response = state
        .category_service
        .update_category(category_id, request)
        .await?;
    ok(response)
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted category", body = CategoryResponse),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<CategoryResponse> {
    debug!("Delete category request: {}", id);

    user.require_any_role(guards::ADMIN_ONLY)?;

    let category_id = parse_category_id(&id)?;
    let response = state.category_service.delete_category(category_id).await?;
    ok(response)
}
