//! Store Module
//!
//! The key-value store seam the cache facade is built on, with a Redis
//! implementation and an in-process one that mirrors Redis semantics.

mod entry;
mod memory;
mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{Config, StoreBackend};
use crate::error::Result;

// Re-export public types
pub use entry::{StoreEntry, StoredValue};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Shared handle to a store, injected into every facade.
pub type SharedStore = Arc<dyn KeyValueStore>;

// == Key-Value Store ==
/// Primitive operations the facade needs from a backing store.
///
/// Each operation must be atomic at the store level: counters and list
/// appends from concurrent callers never interleave partially.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Atomically increments the integer at `key` (missing keys start at 0)
    /// and returns the new value.
    async fn increment(&self, key: &str) -> Result<i64>;

    /// Stores `value` under `key`, replacing any previous value and TTL.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Stores `value` under `key`; the store makes it unreadable after
    /// `ttl_seconds`.
    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<()>;

    /// Reads the bytes at `key`, `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Appends `value` to the list at `key` and returns the new length.
    async fn append_to_list(&self, key: &str, value: &[u8]) -> Result<usize>;

    /// Reads list elements `start..=stop`. Negative indices count from the
    /// end, so `(0, -1)` reads the whole list.
    async fn read_list_range(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>>;

    /// Removes every key from the store.
    async fn flush_all(&self) -> Result<()>;
}

/// Connects to the store selected by `config`.
pub async fn connect(config: &Config) -> Result<SharedStore> {
    match config.store_backend {
        StoreBackend::Redis => {
            let store = RedisStore::connect(&config.redis_url).await?;
            info!("Connected to Redis at {}", config.redis_url);
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            info!("Using in-process memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
