//! Cache Module
//!
//! The instrumented cache facade, call history replay and the expiring fetch
//! cache, all layered over an injected key-value store.

mod expiring;
mod fetch;
mod instrument;
mod instrumented;
mod replay;
mod value;


// Re-export public types
pub use expiring::{cache_key, count_key, ExpiringCache};
pub use fetch::{fetch_fn, Fetch, FnFetcher, HttpFetcher};
pub use instrument::{inputs_key, outputs_key, read_counter, CallHistory, CountCalls, Operation};
pub use instrumented::{Cache, StoreValue, STORE_IDENTITY};
pub use replay::{replay, CallRecord, Replay};
pub use value::{decode_int, decode_str, CacheValue};
