//! Store Entry Module
//!
//! Defines the structure for individual memory store entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

// == Stored Value ==
/// The two value shapes the store primitives operate on.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// A plain binary string (SET/GET/INCR)
    Bytes(Vec<u8>),
    /// An ordered list of binary strings (RPUSH/LRANGE)
    List(Vec<Vec<u8>>),
}

// == Store Entry ==
/// A single store entry with its optional expiration deadline.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored value
    pub value: StoredValue,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - Optional TTL in seconds
    pub fn new(value: StoredValue, ttl_seconds: Option<u64>) -> Self {
        let expires_at = ttl_seconds.map(|ttl| current_timestamp_ms() + (ttl * 1000));

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// the expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
