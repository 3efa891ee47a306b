//! Redis-backed cache store.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use quill_core::{QuillError, QuillResult};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Keys requested per `SCAN` round trip.
pub const SCAN_BATCH_SIZE: usize = 100;

/// Redis cache service.
///
/// Without a pool the service is disabled: reads miss and writes are no-ops.
#[derive(Component)]
#[shaku(interface = CacheInterface)]
pub struct RedisCacheService {
    pool: Option<Arc<Pool>>,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Builds the component parameters for DI registration.
    #[must_use]
    pub fn parameters(pool: Option<Arc<Pool>>) -> RedisCacheServiceParameters {
        RedisCacheServiceParameters { pool }
    }

    async fn get_conn(&self) -> QuillResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool
                .get()
                .await
                .map_err(|e| QuillError::cache(format!("Failed to get Redis connection: {e}"))),
            None => Err(QuillError::cache("Cache is disabled")),
        }
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheService")
            .field("enabled", &self.pool.is_some())
            .finish()
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> QuillResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| QuillError::cache(format!("Failed to get key '{key}': {e}")))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> QuillResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let result = if ttl.is_zero() {
            conn.set::<_, _, ()>(key, value).await
        } else {
            conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1)).await
        };
        result.map_err(|e| QuillError::cache(format!("Failed to set key '{key}': {e}")))?;

        debug!(key = key, ttl_secs = ttl.as_secs(), "Cached key");
        Ok(())
    }

    async fn delete(&self, key: &str) -> QuillResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| QuillError::cache(format!("Failed to delete key '{key}': {e}")))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn delete_by_prefix(&self, prefix: &str) -> QuillResult<u64> {
        if !self.is_enabled() {
            return Ok(0);
        }

        let mut conn = self.get_conn().await?;
        let pattern = format!("{prefix}*");
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = deadpool_redis::redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH_SIZE)
                .query_async(&mut conn)
                .await
                .map_err(|e| QuillError::cache(format!("Redis SCAN failed: {e}")))?;

            if !keys.is_empty() {
                let count: u64 = deadpool_redis::redis::cmd("DEL")
                    .arg(&keys)
                    .query_async(&mut conn)
                    .await
                    .map_err(|e| QuillError::cache(format!("Redis DEL (batch) failed: {e}")))?;
                deleted += count;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        debug!(pattern = %pattern, deleted = deleted, "Cache prefix DEL");
        Ok(deleted)
    }

    async fn ping(&self) -> QuillResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let pong: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| QuillError::cache(format!("Redis PING failed: {e}")))?;

        if pong == "PONG" {
            Ok(())
        } else {
            Err(QuillError::cache(format!("Unexpected PING reply: {pong}")))
        }
    }

    async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close();
            info!("Redis pool closed");
        }
    }
}

/// Builds a Redis pool from a connection URL.
pub fn create_redis_pool(url: &str, pool_size: usize) -> QuillResult<Pool> {
    let mut config = deadpool_redis::Config::from_url(url);
    config.pool = Some(deadpool_redis::PoolConfig::new(pool_size.max(1)));
    config
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .map_err(|e| QuillError::Configuration(format!("Failed to create Redis pool: {e}")))
}
