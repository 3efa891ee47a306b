//! Cache store for the service layer.
//!
//! Records and collection pages are cached as JSON under the key scheme in
//! [`cache_keys`]. The record store stays authoritative; the cache is
//! populated on reads and invalidated on every write.

mod cache_interface;
pub mod cache_keys;
mod redis_cache;

#[cfg(test)]
pub use cache_interface::MockCacheInterface;
pub use cache_interface::{CacheExt, CacheInterface};
pub use redis_cache::{
    create_redis_pool, RedisCacheService, RedisCacheServiceParameters, SCAN_BATCH_SIZE,
};
