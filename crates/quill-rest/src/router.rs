//! Main application router.

use crate::{
    controllers::{
        auth_controller, category_controller, health_controller, post_controller, user_controller,
    },
    middleware::{auth_middleware, logging_middleware, AuthMiddlewareState},
    openapi::ApiDoc,
    state::AppState,
};
use axum::{http::HeaderValue, middleware, Router};
use quill_config::ServerConfig;
use quill_service::{AuthService, CacheInterface, CategoryService, PostService, UserService};
use shaku::{HasComponent, Module};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the application router from a Shaku module.
pub fn create_router<M>(module: &M, server_config: &ServerConfig) -> Router
where
    M: Module
        + HasComponent<dyn UserService>
        + HasComponent<dyn CategoryService>
        + HasComponent<dyn PostService>
        + HasComponent<dyn AuthService>
        + HasComponent<dyn CacheInterface>,
{
    build_router(AppState::from_module(module), server_config)
}

/// Creates the application router from already resolved services.
pub fn build_router(state: AppState, server_config: &ServerConfig) -> Router {
    let auth_state = AuthMiddlewareState::new(state.auth_service.clone());

    let api_router = Router::new()
        .merge(auth_controller::router())
        .nest("/users", user_controller::router())
        .nest("/categories", category_controller::router())
        .nest("/posts", post_controller::router())
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(state.clone());

    let router = Router::new()
        .merge(health_controller::router().with_state(state))
        .nest("/api/v1", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(create_cors_layer(server_config))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    if server_config.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
