//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;
use std::str::FromStr;

// == Store Backend ==
/// Which key-value store implementation to connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// A Redis server reachable at `redis_url`
    Redis,
    /// The in-process store (single process only)
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store implementation to use
    pub store_backend: StoreBackend,
    /// Redis connection URL
    pub redis_url: String,
    /// TTL in seconds for cached pages
    pub page_cache_ttl: u64,
    /// Timeout in seconds for page fetches
    pub fetch_timeout: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Memory store expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Flush the store before use
    pub flush_on_start: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STORE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `REDIS_URL` - Redis URL (default: redis://127.0.0.1:6379)
    /// - `PAGE_CACHE_TTL` - Page cache TTL in seconds (default: 10)
    /// - `FETCH_TIMEOUT` - Page fetch timeout in seconds (default: 10)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Memory store sweep frequency in seconds (default: 1)
    /// - `FLUSH_ON_START` - Flush the store at startup (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            store_backend: parse_var("STORE_BACKEND").unwrap_or(defaults.store_backend),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            page_cache_ttl: parse_var("PAGE_CACHE_TTL")
                .filter(|ttl| *ttl > 0)
                .unwrap_or(defaults.page_cache_ttl),
            fetch_timeout: parse_var("FETCH_TIMEOUT").unwrap_or(defaults.fetch_timeout),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            flush_on_start: parse_var("FLUSH_ON_START").unwrap_or(defaults.flush_on_start),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_backend: StoreBackend::Redis,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            page_cache_ttl: 10,
            fetch_timeout: 10,
            server_port: 3000,
            cleanup_interval: 1,
            flush_on_start: true,
        }
    }
}
