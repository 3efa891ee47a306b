//! Cache store interface.

use async_trait::async_trait;
use quill_core::QuillResult;
use serde::{de::DeserializeOwned, Serialize};
use shaku::Interface;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Cache store holding JSON-encoded records.
///
/// Values are stored as strings so the trait stays object safe; typed access
/// goes through [`CacheExt`]. A TTL of [`Duration::ZERO`] means the entry
/// never expires.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw JSON value. `None` if the key is absent or expired.
    async fn get_raw(&self, key: &str) -> QuillResult<Option<String>>;

    /// Set a raw JSON value.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> QuillResult<()>;

    /// Delete a single key. Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> QuillResult<bool>;

    /// Delete every key starting with `prefix`, scanning in bounded batches.
    ///
    /// Returns the number of keys deleted.
    async fn delete_by_prefix(&self, prefix: &str) -> QuillResult<u64>;

    /// Check that the backing store answers.
    async fn ping(&self) -> QuillResult<()>;

    /// Release the backing connections.
    async fn close(&self);

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Typed helpers on top of [`CacheInterface`].
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value.
    ///
    /// An entry that no longer decodes is reported as a miss so the caller
    /// falls back to the record store.
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> QuillResult<Option<T>> {
        let Some(json) = self.get_raw(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = key, error = %e, "Discarding undecodable cache entry");
                Ok(None)
            }
        }
    }

    /// Get a typed value, treating any cache failure as a miss.
    async fn lookup<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        match self.get::<T>(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key = key, error = %e, "Cache read failed, falling back to store");
                None
            }
        }
    }

    /// Set a typed value.
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> QuillResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }

    /// Serve `key` from the cache, or load it and cache the result.
    ///
    /// Load errors, including `NotFound`, propagate and nothing is cached.
    /// A failed write after a successful load fails the call.
    async fn read_through<T, F, Fut>(&self, key: &str, ttl: Duration, load: F) -> QuillResult<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = QuillResult<T>> + Send,
    {
        if let Some(cached) = self.lookup::<T>(key).await {
            debug!(key = key, "Serving from cache");
            return Ok(cached);
        }

        let value = load().await?;
        self.set(key, &value, ttl).await?;
        Ok(value)
    }

    /// Drop a single entry and every collection page of its family.
    async fn invalidate(&self, key: &str, collection_prefix: &str) -> QuillResult<()> {
        self.delete(key).await?;
        self.delete_by_prefix(collection_prefix).await?;
        Ok(())
    }
}

impl<T: CacheInterface + ?Sized> CacheExt for T {}
