//! Redis-backed store implementation.

use super::service::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

/// Redis store for registry, cursor, block size and day buckets.
///
/// Uses `ConnectionManager` for automatic reconnection; the manager is cheap
/// to clone and every operation works on its own clone. Unlike a cache, errors
/// are returned to the caller: the services decide what is fatal.
#[derive(Clone)]
pub struct RedisStore {
    client: ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)
            .map_err(|e| StoreError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self { client: manager })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.client.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.client.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn set_many(&self, pairs: &[(String, String)]) -> StoreResult<()> {
        if pairs.is_empty() {
            return Ok(());
        }
        let mut conn = self.client.clone();
        conn.mset::<_, _, ()>(pairs).await?;
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> StoreResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.client.clone();
        let deleted: i64 = conn.del(keys).await?;
        debug!("DEL {:?} removed {} key(s)", keys, deleted);
        Ok(())
    }

    async fn list_range(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>> {
        let mut conn = self.client.clone();
        Ok(conn.lrange(key, start, stop).await?)
    }

    async fn replace_list(&self, key: &str, values: &[String]) -> StoreResult<()> {
        let mut conn = self.client.clone();

        let mut pipe = redis::pipe();
        pipe.atomic().del(key).ignore();
        if !values.is_empty() {
            pipe.rpush(key, values).ignore();
        }
        pipe.query_async::<()>(&mut conn).await?;

        debug!("Replaced list {} with {} element(s)", key, values.len());
        Ok(())
    }

    async fn increment(&self, key: &str, field: &str, by: i64) -> StoreResult<i64> {
        let mut conn = self.client.clone();
        Ok(conn.hincr(key, field, by).await?)
    }

    async fn hash_get_all(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        let mut conn = self.client.clone();
        Ok(conn.hgetall(key).await?)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> StoreResult<()> {
        let mut conn = self.client.clone();
        let seconds = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        conn.expire::<_, ()>(key, seconds).await?;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
