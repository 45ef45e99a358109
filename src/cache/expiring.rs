//! Expiring Cache Module
//!
//! Memoizes a fetch function in the store with a fixed TTL and counts every
//! access per resource key. Expiration is left entirely to the store.

use std::sync::Arc;

use tracing::{debug, info};

use super::fetch::Fetch;
use super::instrument::read_counter;
use super::value::decode_str;
use crate::error::{CacheError, Result};
use crate::store::SharedStore;

/// Store key of the cached value for `resource`.
pub fn cache_key(resource: &str) -> String {
    format!("cache:{}", resource)
}

/// Store key of the access counter for `resource`.
pub fn count_key(resource: &str) -> String {
    format!("count:{}", resource)
}

// == Expiring Cache ==
/// A fetch function wrapped with a store-backed, expiring cache entry.
///
/// Each resource key moves between two states: absent, and cached until the
/// store expires it. There is no manual invalidation.
pub struct ExpiringCache {
    store: SharedStore,
    fetcher: Arc<dyn Fetch>,
    ttl_seconds: u64,
}

impl ExpiringCache {
    /// TTL used when none is configured.
    pub const DEFAULT_TTL: u64 = 10;

    // == Configure ==
    /// Wraps `fetcher` so its results are cached for `ttl_seconds`.
    ///
    /// A zero TTL is rejected.
    pub fn configure(
        store: SharedStore,
        ttl_seconds: u64,
        fetcher: impl Fetch + 'static,
    ) -> Result<Self> {
        if ttl_seconds == 0 {
            return Err(CacheError::InvalidRequest(
                "TTL must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            store,
            fetcher: Arc::new(fetcher),
            ttl_seconds,
        })
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    // == Call ==
    /// Returns the cached value for `resource_key`, fetching and caching it
    /// on a miss. Every call counts as an access, hit or miss.
    pub async fn call(&self, resource_key: &str) -> Result<String> {
        self.store.increment(&count_key(resource_key)).await?;

        let key = cache_key(resource_key);
        if let Some(bytes) = self.store.get(&key).await? {
            debug!("Cache hit for {}", resource_key);
            return decode_str(bytes);
        }

        info!("Cache miss for {}, fetching", resource_key);
        let result = self.fetcher.fetch(resource_key).await?;
        self.store
            .set_with_ttl(&key, result.as_bytes(), self.ttl_seconds)
            .await?;

        Ok(result)
    }

    // == Access Count ==
    /// Number of calls made for `resource_key`.
    pub async fn access_count(&self, resource_key: &str) -> Result<i64> {
        read_counter(self.store.as_ref(), &count_key(resource_key)).await
    }
}
