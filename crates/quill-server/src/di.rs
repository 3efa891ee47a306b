//! Dependency injection module using Shaku.
//!
//! One module holds the whole object graph: the PostgreSQL pool and record
//! stores, the Redis cache, password hashing, token issuance, and the four
//! services built on top of them.

use quill_config::AppConfig;
use quill_core::{module, HasComponent, QuillResult};
use quill_repository::{
    DatabasePool, DatabasePoolInterface, PgCategoryRepository, PgPostRepository,
    PgUserRepository,
};
use quill_security::{PasswordHasher, TokenProvider};
use quill_service::{
    create_redis_pool, AuthServiceComponent, CacheInterface, CategoryServiceComponent,
    PostServiceComponent, RedisCacheService, UserServiceComponent,
};
use std::sync::Arc;
use tracing::{info, warn};

module! {
    pub AppModule {
        components = [
            DatabasePool,
            PgUserRepository,
            PgCategoryRepository,
            PgPostRepository,
            RedisCacheService,
            PasswordHasher,
            TokenProvider,
            UserServiceComponent,
            CategoryServiceComponent,
            PostServiceComponent,
            AuthServiceComponent,
        ],
        providers = [],
    }
}

/// Wires the module around an existing database pool and cache backend.
///
/// `cache` is `None` when Redis is disabled; every read then misses.
pub fn build_module(
    db_pool: &DatabasePool,
    cache: Option<Arc<deadpool_redis::Pool>>,
    config: &AppConfig,
) -> AppModule {
    let entry_ttl = config.cache.entry_ttl();

    AppModule::builder()
        .with_component_parameters::<DatabasePool>(db_pool.parameters())
        .with_component_parameters::<RedisCacheService>(RedisCacheService::parameters(cache))
        .with_component_parameters::<PasswordHasher>(PasswordHasher::parameters(
            config.security.password_hash_cost,
        ))
        .with_component_parameters::<TokenProvider>(TokenProvider::parameters(&config.security))
        .with_component_parameters::<UserServiceComponent>(UserServiceComponent::parameters(
            entry_ttl,
        ))
        .with_component_parameters::<CategoryServiceComponent>(
            CategoryServiceComponent::parameters(entry_ttl),
        )
        .with_component_parameters::<PostServiceComponent>(PostServiceComponent::parameters(
            entry_ttl,
        ))
        .build()
}

/// Connects to PostgreSQL and Redis, then builds the module.
///
/// Migrations run when enabled. An unreachable Redis fails startup.
pub async fn build_app_module(config: &AppConfig) -> QuillResult<Arc<AppModule>> {
    let db_pool = DatabasePool::new(&config.database).await?;
    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }

    let cache_pool = if config.redis.enabled {
        let pool_size = usize::try_from(config.redis.pool_size).unwrap_or(usize::MAX);
        Some(Arc::new(create_redis_pool(&config.redis.url, pool_size)?))
    } else {
        warn!("Redis disabled; every cache read will miss");
        None
    };

    let module = build_module(&db_pool, cache_pool, config);

    let cache: Arc<dyn CacheInterface> = module.resolve();
    cache.ping().await?;
    info!(enabled = cache.is_enabled(), "Cache ready");

    Ok(Arc::new(module))
}

/// Releases the cache and database pools.
pub async fn shutdown_module(module: &AppModule) {
    let cache: Arc<dyn CacheInterface> = module.resolve();
    cache.close().await;

    let db: Arc<dyn DatabasePoolInterface> = module.resolve();
    db.close().await;
}
