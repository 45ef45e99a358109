//! Request DTOs for the cache API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::CacheValue;

/// Request body for the STORE operation (POST /store)
///
/// # Fields
/// - `value`: a JSON string, integer or float
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    /// The value to store
    pub value: Value,
}

impl StoreRequest {
    /// Converts the JSON value into a storable value.
    ///
    /// Returns an error message for null, booleans, arrays and objects.
    pub fn into_cache_value(self) -> Result<CacheValue, String> {
        match self.value {
            Value::String(s) => Ok(CacheValue::Text(s)),
            Value::Number(n) => n
                .as_i64()
                .map(CacheValue::Int)
                .or_else(|| n.as_f64().map(CacheValue::Float))
                .ok_or_else(|| format!("Unsupported number: {}", n)),
            other => Err(format!(
                "Value must be a string, integer or float, got {}",
                other
            )),
        }
    }
}

/// How GET /get/:key should decode the stored bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    /// UTF-8 text
    #[default]
    Text,
    /// Base-10 integer
    Int,
}

/// Query string for GET /get/:key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetQuery {
    /// Requested decoding, `?as=text` or `?as=int`
    #[serde(rename = "as", default)]
    pub format: ValueFormat,
}

/// Query string for the page endpoints (GET /page, GET /page/count)
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    /// The URL to fetch
    pub url: String,
}

impl PageQuery {
    /// Validates the query
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.trim().is_empty() {
            return Some("URL cannot be empty".to_string());
        }
        None
    }
}
