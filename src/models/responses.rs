//! Response DTOs for the cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CallRecord, Replay};

/// Response body for the STORE operation (POST /store)
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// The generated key
    pub key: String,
}

impl StoreResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The decoded value (string or integer)
    pub value: Value,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for the replay endpoint (GET /replay)
#[derive(Debug, Clone, Serialize)]
pub struct ReplayResponse {
    /// Instrumented operation identity
    pub identity: String,
    /// Number of recorded calls
    pub call_count: usize,
    /// Inputs paired with outputs in call order
    pub calls: Vec<CallRecord>,
    /// Human-readable trace
    pub trace: String,
}

impl From<Replay> for ReplayResponse {
    fn from(replay: Replay) -> Self {
        let trace = replay.to_string();
        Self {
            identity: replay.identity,
            call_count: replay.call_count,
            calls: replay.calls,
            trace,
        }
    }
}

/// Response body for the page access counter (GET /page/count)
#[derive(Debug, Clone, Serialize)]
pub struct AccessCountResponse {
    /// The resource URL
    pub url: String,
    /// Number of accesses, cache hits included
    pub count: i64,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::new("test_key", 42);
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"key":"test_key","value":42}"#);
    }

    #[test]
    fn test_replay_response_from_replay() {
        let replay = Replay {
            identity: "Cache.store".to_string(),
            call_count: 1,
            calls: vec![CallRecord {
                input: "(\"foo\",)".to_string(),
                output: "k1".to_string(),
            }],
        };

        let resp = ReplayResponse::from(replay);
        assert_eq!(resp.call_count, 1);
        assert_eq!(
            resp.trace,
            "Cache.store was called 1 times:\nCache.store(*(\"foo\",)) -> k1"
        );
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
