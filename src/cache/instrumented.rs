//! Instrumented Cache Module
//!
//! Stores values under freshly generated keys and reads them back, with the
//! store operation wrapped in call counting and call history.

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::instrument::{CallHistory, CountCalls, Operation};
use super::replay::{replay, Replay};
use super::value::{decode_int, decode_str, CacheValue};
use crate::error::Result;
use crate::store::SharedStore;

/// Identity of [`Cache::store`], used for its counter and history keys.
pub const STORE_IDENTITY: &str = "Cache.store";

// == Store Value ==
/// The undecorated store operation: write under a new UUID key.
pub struct StoreValue {
    store: SharedStore,
}

#[async_trait]
impl Operation for StoreValue {
    type Input = CacheValue;
    type Output = String;

    fn identity(&self) -> &str {
        STORE_IDENTITY
    }

    async fn call(&self, data: CacheValue) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, &data.to_bytes()).await?;
        Ok(key)
    }
}

// == Cache ==
/// Caching facade over an injected store.
///
/// Holds no data locally; everything lives in the store.
pub struct Cache {
    store: SharedStore,
    store_op: CountCalls<CallHistory<StoreValue>>,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache over `store` without touching existing data.
    pub fn new(store: SharedStore) -> Self {
        let store_op = CountCalls::new(
            store.clone(),
            CallHistory::new(
                store.clone(),
                StoreValue {
                    store: store.clone(),
                },
            ),
        );

        Self { store, store_op }
    }

    /// Flushes `store`, then creates a cache over it, so counters and
    /// history start from zero.
    pub async fn flushed(store: SharedStore) -> Result<Self> {
        store.flush_all().await?;
        debug!("Store flushed");
        Ok(Self::new(store))
    }

    /// Identity the store operation is instrumented under.
    pub fn store_identity(&self) -> &str {
        self.store_op.identity()
    }

    // == Store ==
    /// Writes `data` under a new unique key and returns the key.
    ///
    /// The call is counted and its input recorded before the write; if the
    /// write fails no output is recorded and the error is returned.
    pub async fn store(&self, data: impl Into<CacheValue>) -> Result<String> {
        let key = self.store_op.call(data.into()).await?;
        debug!("Stored value under key {}", key);
        Ok(key)
    }

    // == Get ==
    /// Reads the raw bytes stored under `key`, `None` when absent.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key).await
    }

    /// Reads `key` and applies `converter` to the bytes when present.
    pub async fn get_with<T, F>(&self, key: &str, converter: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T> + Send,
    {
        match self.store.get(key).await? {
            Some(bytes) => converter(bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Reads `key` as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, decode_str).await
    }

    /// Reads `key` as a base-10 integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, decode_int).await
    }

    // == Instrumentation ==
    /// Number of times [`Cache::store`] has been called.
    pub async fn call_count(&self) -> Result<i64> {
        self.store_op.count().await
    }

    /// Recorded history of [`Cache::store`].
    pub async fn replay(&self) -> Result<Replay> {
        replay(self.store.as_ref(), self.store_identity()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use crate::store::{KeyValueStore, MemoryStore};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn memory_cache() -> Cache {
        Cache::new(Arc::new(MemoryStore::new()))
    }

    /// Memory store whose plain writes can be switched off.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn increment(&self, key: &str) -> Result<i64> {
            self.inner.increment(key).await
        }

        async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(CacheError::StoreUnavailable("connection reset".to_string()));
            }
            self.inner.set(key, value).await
        }

        async fn set_with_ttl(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<()> {
            self.inner.set_with_ttl(key, value, ttl_seconds).await
        }

        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.inner.get(key).await
        }

        async fn append_to_list(&self, key: &str, value: &[u8]) -> Result<usize> {
            self.inner.append_to_list(key, value).await
        }

        async fn read_list_range(
            &self,
            key: &str,
            start: isize,
            stop: isize,
        ) -> Result<Vec<Vec<u8>>> {
            self.inner.read_list_range(key, start, stop).await
        }

        async fn flush_all(&self) -> Result<()> {
            self.inner.flush_all().await
        }
    }

    #[tokio::test]
    async fn test_store_and_get_roundtrip() {
        let cache = memory_cache();

        let key = cache.store("foo").await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"foo".to_vec()));

        let key = cache.store(vec![0u8, 159, 146, 150]).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(vec![0u8, 159, 146, 150]));
    }

    #[tokio::test]
    async fn test_get_nonexistent_is_absent() {
        let cache = memory_cache();

        assert_eq!(cache.get("nonexistent-key").await.unwrap(), None);
        assert_eq!(cache.get_str("nonexistent-key").await.unwrap(), None);
        assert_eq!(cache.get_int("nonexistent-key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_str_and_int() {
        let cache = memory_cache();

        let text_key = cache.store("hello").await.unwrap();
        let int_key = cache.store(42).await.unwrap();

        assert_eq!(cache.get_str(&text_key).await.unwrap(), Some("hello".to_string()));
        assert_eq!(cache.get_int(&int_key).await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_get_int_conversion_error() {
        let cache = memory_cache();

        let key = cache.store("abc").await.unwrap();
        let result = cache.get_int(&key).await;
        assert!(matches!(result, Err(CacheError::Conversion(_))));
    }

    #[tokio::test]
    async fn test_get_with_custom_converter() {
        let cache = memory_cache();

        let key = cache.store(2.5).await.unwrap();
        let value = cache
            .get_with(&key, |bytes| {
                decode_str(bytes)?
                    .parse::<f64>()
                    .map_err(|e| CacheError::Conversion(e.to_string()))
            })
            .await
            .unwrap();
        assert_eq!(value, Some(2.5));

        let failing = cache
            .get_with(&key, |_| -> Result<()> {
                Err(CacheError::Conversion("nope".to_string()))
            })
            .await;
        assert!(matches!(failing, Err(CacheError::Conversion(_))));
    }

    #[tokio::test]
    async fn test_keys_are_unique() {
        let cache = memory_cache();
        let mut keys = HashSet::new();

        for i in 0..1000 {
            keys.insert(cache.store(i).await.unwrap());
        }

        assert_eq!(keys.len(), 1000);
    }

    #[tokio::test]
    async fn test_call_count() {
        let cache = memory_cache();

        assert_eq!(cache.call_count().await.unwrap(), 0);
        for _ in 0..7 {
            cache.store("x").await.unwrap();
        }
        assert_eq!(cache.call_count().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_flushed_resets_instrumentation() {
        let store: SharedStore = Arc::new(MemoryStore::new());

        let cache = Cache::new(store.clone());
        cache.store("a").await.unwrap();
        assert_eq!(cache.call_count().await.unwrap(), 1);

        let cache = Cache::flushed(store).await.unwrap();
        assert_eq!(cache.call_count().await.unwrap(), 0);
        assert_eq!(cache.replay().await.unwrap().call_count, 0);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_partial_history() {
        let flaky = Arc::new(FlakyStore::default());
        let cache = Cache::new(flaky.clone());

        cache.store("ok").await.unwrap();

        flaky.fail_writes.store(true, Ordering::SeqCst);
        let result = cache.store("lost").await;
        assert!(matches!(result, Err(CacheError::StoreUnavailable(_))));

        // Attempt counted and input recorded, but no output
        assert_eq!(cache.call_count().await.unwrap(), 2);
        let inputs = flaky.read_list_range("Cache.store:inputs", 0, -1).await.unwrap();
        let outputs = flaky.read_list_range("Cache.store:outputs", 0, -1).await.unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(outputs.len(), 1);

        // Replay pairs only the complete call
        let replay = cache.replay().await.unwrap();
        assert_eq!(replay.call_count, 2);
        assert_eq!(replay.calls.len(), 1);
        assert_eq!(replay.calls[0].input, "(\"ok\",)");
    }
}
