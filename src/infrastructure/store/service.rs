//! Key-value store trait and error types.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store operation error: {0}")]
    Operation(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_io_error() {
            Self::Connection(e.to_string())
        } else {
            Self::Operation(e.to_string())
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Shared key-value store holding all rotator state.
///
/// Only single-key primitives plus two multi-key writes are required. No
/// operation is retried; callers decide whether a failure is fatal.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisStore`] - Redis-backed production store
/// - [`crate::infrastructure::store::MemoryStore`] - Process-local store for tests and development
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a string value.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrites a string value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Writes several string values at once; either all are written or none.
    async fn set_many(&self, pairs: &[(String, String)]) -> StoreResult<()>;

    /// Removes keys. Missing keys are ignored.
    async fn delete(&self, keys: &[String]) -> StoreResult<()>;

    /// Reads list elements between `start` and `stop` inclusive.
    ///
    /// Negative indices count from the end, so `(0, -1)` reads the whole list.
    /// A missing key reads as an empty list.
    async fn list_range(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>>;

    /// Atomically replaces a list with `values`.
    async fn replace_list(&self, key: &str, values: &[String]) -> StoreResult<()>;

    /// Atomically adds `by` to a hash field, returning the new value.
    async fn increment(&self, key: &str, field: &str, by: i64) -> StoreResult<i64>;

    /// Reads all fields of a hash. A missing key reads as an empty map.
    async fn hash_get_all(&self, key: &str) -> StoreResult<HashMap<String, String>>;

    /// Sets (or resets) the time to live of a key.
    async fn expire(&self, key: &str, ttl: Duration) -> StoreResult<()>;

    /// Checks if the store backend is reachable.
    async fn health_check(&self) -> bool;
}
