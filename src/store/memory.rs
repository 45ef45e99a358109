//! Memory Store Module
//!
//! In-process key-value store with Redis semantics for the primitives the
//! facade uses: expiring keys, integer counters and lists.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::entry::{StoreEntry, StoredValue};
use super::KeyValueStore;
use crate::error::{CacheError, Result};

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

// == Memory Store ==
/// In-process store used for tests, demos and single-process deployments.
///
/// Every operation runs under one write or read lock, so each primitive is
/// atomic just like its Redis counterpart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoreEntry>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of stored entries, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Drops `key` if its entry has expired, so callers only see live entries.
fn evict_if_expired(entries: &mut HashMap<String, StoreEntry>, key: &str) {
    if entries.get(key).is_some_and(StoreEntry::is_expired) {
        entries.remove(key);
    }
}

/// Resolves a Redis-style inclusive range against a list of `len` items.
fn normalize_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start >= len || start > stop {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn increment(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.write().await;
        evict_if_expired(&mut entries, key);

        match entries.get_mut(key) {
            Some(entry) => match &mut entry.value {
                StoredValue::Bytes(bytes) => {
                    let current: i64 = std::str::from_utf8(bytes)
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .ok_or_else(|| {
                            CacheError::Store("value is not an integer or out of range".to_string())
                        })?;
                    let next = current.checked_add(1).ok_or_else(|| {
                        CacheError::Store("increment or decrement would overflow".to_string())
                    })?;
                    // INCR keeps any TTL already on the key
                    *bytes = next.to_string().into_bytes();
                    Ok(next)
                }
                StoredValue::List(_) => Err(CacheError::Store(WRONG_TYPE.to_string())),
            },
            None => {
                entries.insert(
                    key.to_string(),
                    StoreEntry::new(StoredValue::Bytes(b"1".to_vec()), None),
                );
                Ok(1)
            }
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let entry = StoreEntry::new(StoredValue::Bytes(value.to_vec()), None);
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<()> {
        if ttl_seconds == 0 {
            return Err(CacheError::Store(
                "invalid expire time in 'setex' command".to_string(),
            ));
        }

        let entry = StoreEntry::new(StoredValue::Bytes(value.to_vec()), Some(ttl_seconds));
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // Write lock so expired entries are dropped on access
        let mut entries = self.entries.write().await;
        evict_if_expired(&mut entries, key);

        match entries.get(key) {
            Some(StoreEntry {
                value: StoredValue::Bytes(bytes),
                ..
            }) => Ok(Some(bytes.clone())),
            Some(_) => Err(CacheError::Store(WRONG_TYPE.to_string())),
            None => Ok(None),
        }
    }

    async fn append_to_list(&self, key: &str, value: &[u8]) -> Result<usize> {
        let mut entries = self.entries.write().await;
        evict_if_expired(&mut entries, key);

        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| StoreEntry::new(StoredValue::List(Vec::new()), None));

        match &mut entry.value {
            StoredValue::List(items) => {
                items.push(value.to_vec());
                Ok(items.len())
            }
            StoredValue::Bytes(_) => Err(CacheError::Store(WRONG_TYPE.to_string())),
        }
    }

    async fn read_list_range(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        evict_if_expired(&mut entries, key);

        match entries.get(key).map(|entry| &entry.value) {
            Some(StoredValue::List(items)) => Ok(normalize_range(items.len(), start, stop)
                .map(|(from, to)| items[from..=to].to_vec())
                .unwrap_or_default()),
            Some(StoredValue::Bytes(_)) => Err(CacheError::Store(WRONG_TYPE.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn flush_all(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}
