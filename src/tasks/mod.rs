//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache.
//!
//! # Tasks
//! - TTL Cleanup: removes expired cache entries twice per TTL window

mod cleanup;

pub use cleanup::spawn_cleanup_task;
