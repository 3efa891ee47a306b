//! Application state for Axum handlers.

use quill_service::{AuthService, CacheInterface, CategoryService, PostService, UserService};
use shaku::{HasComponent, Module};
use std::sync::Arc;

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub category_service: Arc<dyn CategoryService>,
    pub post_service: Arc<dyn PostService>,
    pub auth_service: Arc<dyn AuthService>,
    /// Only the health check talks to the cache directly.
    pub cache: Arc<dyn CacheInterface>,
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserService>,
        category_service: Arc<dyn CategoryService>,
        post_service: Arc<dyn PostService>,
        auth_service: Arc<dyn AuthService>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            user_service,
            category_service,
            post_service,
            auth_service,
            cache,
        }
    }

    /// Resolves every service from a Shaku module.
    pub fn from_module<M>(module: &M) -> Self
    where
        M: Module
            + HasComponent<dyn UserService>
            + HasComponent<dyn CategoryService>
            + HasComponent<dyn PostService>
            + HasComponent<dyn AuthService>
            + HasComponent<dyn CacheInterface>,
    {
        Self {
            user_service: module.resolve(),
            category_service: module.resolve(),
            post_service: module.resolve(),
            auth_service: module.resolve(),
            cache: module.resolve(),
        }
    }
}
