//! Instrumented Cache - a caching facade over Redis
//!
//! Stores values under generated keys with call counting and replayable call
//! history, and caches fetched pages with store-enforced expiration.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, ExpiringCache};
pub use config::Config;
pub use store::{KeyValueStore, MemoryStore, RedisStore, SharedStore};
pub use tasks::spawn_cleanup_task;
