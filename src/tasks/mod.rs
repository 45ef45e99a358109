//! Background Tasks Module
//!
//! # Tasks
//! - Expiry sweep: purges expired keys from the memory store

mod cleanup;

pub use cleanup::spawn_cleanup_task;
