//! Key-value store holding the registry, cursor, settings and day buckets.
//!
//! Provides a [`KeyValueStore`] trait with two implementations:
//! - [`RedisStore`] - Production Redis-backed store shared by all instances
//! - [`MemoryStore`] - Process-local store for tests and development

mod memory_store;
mod redis_store;
mod service;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use service::{KeyValueStore, StoreError, StoreResult};

#[cfg(test)]
pub use service::MockKeyValueStore;
