#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, middleware};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use link_rotator::api::middleware::auth;
use link_rotator::api::routes::{admin_routes, public_routes};
use link_rotator::config::RotationSettings;
use link_rotator::domain::entities::DestinationEntry;
use link_rotator::infrastructure::store::{KeyValueStore, MemoryStore, StoreError, StoreResult};
use link_rotator::state::AppState;
use link_rotator::utils::FixedClock;

pub const TOKEN: &str = "test-admin-token";

/// 2024-05-15 is a Wednesday.
pub fn test_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 15)
        .unwrap()
        .and_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap())
}

pub struct TestContext {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
}

pub fn create_test_state(store: Arc<dyn KeyValueStore>, clock: Arc<FixedClock>) -> AppState {
    AppState::new(store, &RotationSettings::default(), TOKEN, clock).unwrap()
}

pub fn create_test_context() -> TestContext {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(test_now()));
    let state = create_test_state(store.clone(), clock.clone());

    TestContext {
        state,
        store,
        clock,
    }
}

/// Every route with token authentication, without rate limiting.
pub fn test_router(state: AppState) -> Router {
    let admin = admin_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .merge(public_routes())
        .merge(admin)
        .with_state(state)
}

pub async fn seed_links(store: &dyn KeyValueStore, entries: &[(&str, &str)]) {
    let stored: Vec<String> = entries
        .iter()
        .map(|(name, url)| DestinationEntry::new(*name, *url).to_stored())
        .collect();
    store.replace_list("links", &stored).await.unwrap();
}

/// How [`StatsFaultStore`] treats stats writes.
#[derive(Debug, Clone, Copy)]
pub enum StatsFault {
    /// Increment and expire return an error.
    Fail,
    /// Increment never completes.
    Stall,
}

/// Store whose stats writes misbehave while everything else works.
pub struct StatsFaultStore {
    pub inner: MemoryStore,
    fault: StatsFault,
}

impl StatsFaultStore {
    pub fn new(fault: StatsFault) -> Self {
        Self {
            inner: MemoryStore::new(),
            fault,
        }
    }

    fn stats_error<T>() -> StoreResult<T> {
        Err(StoreError::Connection("stats shard unavailable".to_string()))
    }
}

#[async_trait]
impl KeyValueStore for StatsFaultStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner.set(key, value).await
    }

    async fn set_many(&self, pairs: &[(String, String)]) -> StoreResult<()> {
        self.inner.set_many(pairs).await
    }

    async fn delete(&self, keys: &[String]) -> StoreResult<()> {
        self.inner.delete(keys).await
    }

    async fn list_range(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>> {
        self.inner.list_range(key, start, stop).await
    }

    async fn replace_list(&self, key: &str, values: &[String]) -> StoreResult<()> {
        self.inner.replace_list(key, values).await
    }

    async fn increment(&self, _key: &str, _field: &str, _by: i64) -> StoreResult<i64> {
        match self.fault {
            StatsFault::Fail => Self::stats_error(),
            StatsFault::Stall => std::future::pending().await,
        }
    }

    async fn hash_get_all(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        self.inner.hash_get_all(key).await
    }

    async fn expire(&self, _key: &str, _ttl: Duration) -> StoreResult<()> {
        Self::stats_error()
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Waits until the background stats writes for `key` add up to `expected`.
///
/// Redirects record hits off the response path, so tests poll the bucket.
pub async fn wait_for_hits(store: &dyn KeyValueStore, key: &str, expected: i64) {
    let settled = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let total: i64 = store
                .hash_get_all(key)
                .await
                .unwrap()
                .values()
                .filter_map(|count| count.parse::<i64>().ok())
                .sum();
            if total >= expected {
                return total;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    assert_eq!(
        settled.ok(),
        Some(expected),
        "hits in {key} did not settle at {expected}"
    );
}

/// Store that is unreachable.
pub struct DownStore;

fn down<T>() -> StoreResult<T> {
    Err(StoreError::Connection("connection refused".to_string()))
}

#[async_trait]
impl KeyValueStore for DownStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        down()
    }

    async fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        down()
    }

    async fn set_many(&self, _pairs: &[(String, String)]) -> StoreResult<()> {
        down()
    }

    async fn delete(&self, _keys: &[String]) -> StoreResult<()> {
        down()
    }

    async fn list_range(
        &self,
        _key: &str,
        _start: isize,
        _stop: isize,
    ) -> StoreResult<Vec<String>> {
        down()
    }

    async fn replace_list(&self, _key: &str, _values: &[String]) -> StoreResult<()> {
        down()
    }

    async fn increment(&self, _key: &str, _field: &str, _by: i64) -> StoreResult<i64> {
        down()
    }

    async fn hash_get_all(&self, _key: &str) -> StoreResult<HashMap<String, String>> {
        down()
    }

    async fn expire(&self, _key: &str, _ttl: Duration) -> StoreResult<()> {
        down()
    }

    async fn health_check(&self) -> bool {
        false
    }
}
