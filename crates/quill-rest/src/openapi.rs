//! OpenAPI documentation for the REST API.

use crate::controllers::health_controller::HealthResponse;
use quill_core::{CategoryId, ErrorResponse, FieldError, PostId, Role, UserId};
use quill_service::{
    AccessTokenResponse, CategoryResponse, CreateCategoryRequest, CreatePostRequest,
    CreateUserRequest, LoginRequest, LoginResponse, MessageResponse, PostResponse,
    RefreshTokenRequest, UpdateCategoryRequest, UpdatePostRequest, UpdateUserRequest,
    UserResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the Quill API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quill API",
        version = "1.0.0",
        description = "Blog API with cache-aside reads over users, categories and posts"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        crate::controllers::auth_controller::register,
        crate::controllers::auth_controller::login,
        crate::controllers::auth_controller::refresh,
        crate::controllers::auth_controller::logout,
        crate::controllers::user_controller::list_users,
        crate::controllers::user_controller::get_user,
        crate::controllers::user_controller::update_user,
        crate::controllers::user_controller::delete_user,
        crate::controllers::category_controller::list_categories,
        crate::controllers::category_controller::get_category,
        crate::controllers::category_controller::create_category,
        crate::controllers::category_controller::update_category,
        crate::controllers::category_controller::delete_category,
        crate::controllers::post_controller::list_posts,
        crate::controllers::post_controller::get_post,
        crate::controllers::post_controller::create_post,
        crate::controllers::post_controller::update_post,
        crate::controllers::post_controller::delete_post,
        crate::controllers::health_controller::health_check,
    ),
    components(
        schemas(
            UserId,
            CategoryId,
            PostId,
            Role,
            ErrorResponse,
            FieldError,
            CreateUserRequest,
            UpdateUserRequest,
            UserResponse,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CategoryResponse,
            CreatePostRequest,
            UpdatePostRequest,
            PostResponse,
            LoginRequest,
            RefreshTokenRequest,
            LoginResponse,
            AccessTokenResponse,
            MessageResponse,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and tokens"),
        (name = "users", description = "User management"),
        (name = "categories", description = "Post categories"),
        (name = "posts", description = "Blog posts"),
        (name = "health", description = "Health check")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token; the access_token cookie is also accepted"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_resource_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/login", "/refresh", "/users/{id}", "/categories", "/posts/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn test_openapi_has_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
