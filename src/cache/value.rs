//! Cache Value Module
//!
//! The scalar and binary values the facade can store, and the converters used
//! to read them back.

use std::fmt;

use crate::error::{CacheError, Result};

// == Cache Value ==
/// A value accepted by [`Cache::store`](super::Cache::store).
#[derive(Clone, PartialEq)]
pub enum CacheValue {
    /// UTF-8 text, stored as its bytes
    Text(String),
    /// Raw bytes, stored verbatim
    Bytes(Vec<u8>),
    /// Integer, stored in base 10
    Int(i64),
    /// Float, stored in its shortest round-trip decimal form
    Float(f64),
}

impl CacheValue {
    /// Encodes the value into the bytes written to the store.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            CacheValue::Text(s) => s.as_bytes().to_vec(),
            CacheValue::Bytes(b) => b.clone(),
            CacheValue::Int(i) => i.to_string().into_bytes(),
            CacheValue::Float(f) => format!("{:?}", f).into_bytes(),
        }
    }
}

// Debug output doubles as the argument snapshot recorded in call history
impl fmt::Debug for CacheValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheValue::Text(s) => write!(f, "{:?}", s),
            CacheValue::Bytes(bytes) => {
                f.write_str("b\"")?;
                for byte in bytes {
                    write!(f, "{}", std::ascii::escape_default(*byte))?;
                }
                f.write_str("\"")
            }
            CacheValue::Int(i) => write!(f, "{:?}", i),
            CacheValue::Float(x) => write!(f, "{:?}", x),
        }
    }
}

impl From<&str> for CacheValue {
    fn from(value: &str) -> Self {
        CacheValue::Text(value.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(value: String) -> Self {
        CacheValue::Text(value)
    }
}

impl From<Vec<u8>> for CacheValue {
    fn from(value: Vec<u8>) -> Self {
        CacheValue::Bytes(value)
    }
}

impl From<&[u8]> for CacheValue {
    fn from(value: &[u8]) -> Self {
        CacheValue::Bytes(value.to_vec())
    }
}

impl From<i64> for CacheValue {
    fn from(value: i64) -> Self {
        CacheValue::Int(value)
    }
}

impl From<i32> for CacheValue {
    fn from(value: i32) -> Self {
        CacheValue::Int(value.into())
    }
}

impl From<u32> for CacheValue {
    fn from(value: u32) -> Self {
        CacheValue::Int(value.into())
    }
}

impl From<f64> for CacheValue {
    fn from(value: f64) -> Self {
        CacheValue::Float(value)
    }
}

impl From<f32> for CacheValue {
    fn from(value: f32) -> Self {
        CacheValue::Float(value.into())
    }
}

// == Converters ==
/// Decodes stored bytes as UTF-8 text.
pub fn decode_str(bytes: Vec<u8>) -> Result<String> {
    Ok(String::from_utf8(bytes)?)
}

/// Parses stored bytes as a base-10 integer.
///
/// Surrounding ASCII whitespace is ignored.
pub fn decode_int(bytes: Vec<u8>) -> Result<i64> {
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| CacheError::Conversion(format!("not an integer literal: {}", e)))?;
    Ok(text.trim().parse::<i64>()?)
}
