//! Per-day hit counters and range reports.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use super::RegistryService;
use crate::domain::entities::{RangeReport, StatsRange};
use crate::domain::keys::KeySpace;
use crate::infrastructure::store::{KeyValueStore, StoreResult};
use crate::utils::Clock;

/// Default lifetime of a day bucket.
pub const DEFAULT_RETENTION_DAYS: u32 = 35;

/// Service for the stats ledger.
///
/// Each calendar day (server local time, read from the injected [`Clock`])
/// has its own bucket mapping url to hit count. Every hit refreshes the
/// bucket's expiry, so a bucket disappears `retention` after its last hit.
pub struct StatsService {
    store: Arc<dyn KeyValueStore>,
    keys: KeySpace,
    registry: Arc<RegistryService>,
    clock: Arc<dyn Clock>,
    retention: Duration,
}

impl StatsService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        keys: KeySpace,
        registry: Arc<RegistryService>,
        clock: Arc<dyn Clock>,
        retention_days: u32,
    ) -> Self {
        Self {
            store,
            keys,
            registry,
            clock,
            retention: Duration::from_secs(u64::from(retention_days) * 24 * 60 * 60),
        }
    }

    /// Local calendar date a hit arriving now belongs to.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Counts one hit for `url` in today's bucket.
    ///
    /// # Errors
    ///
    /// Returns the store error from the increment or the expiry refresh.
    pub async fn record(&self, url: &str) -> StoreResult<()> {
        self.record_on(self.today(), url).await
    }

    /// Counts one hit for `url` in the bucket of `day`.
    ///
    /// # Errors
    ///
    /// Returns the store error from the increment or the expiry refresh.
    pub async fn record_on(&self, day: NaiveDate, url: &str) -> StoreResult<()> {
        let key = self.keys.stats_day(day);

        self.store.increment(&key, url, 1).await?;
        self.store.expire(&key, self.retention).await?;

        Ok(())
    }

    /// Like [`StatsService::record_on`], but failures are only logged.
    pub async fn record_best_effort(&self, day: NaiveDate, url: &str) {
        if let Err(e) = self.record_on(day, url).await {
            metrics::counter!("stats_record_failures_total").increment(1);
            error!("Failed to record hit for {}: {}", url, e);
        }
    }

    /// Records a hit on a background task and returns immediately.
    ///
    /// `day` is taken by the caller when the request arrives, so a write that
    /// lands after midnight still counts toward the request's day. The redirect
    /// response never waits on the store.
    pub fn spawn_record(self: &Arc<Self>, day: NaiveDate, url: String) -> JoinHandle<()> {
        let stats = Arc::clone(self);
        tokio::spawn(async move {
            stats.record_best_effort(day, &url).await;
        })
    }

    /// Reads the per-url totals of one day bucket.
    ///
    /// Fields that do not hold an integer, or hold zero, are left out.
    pub async fn day_totals(&self, day: NaiveDate) -> StoreResult<HashMap<String, i64>> {
        let key = self.keys.stats_day(day);
        let raw = self.store.hash_get_all(&key).await?;

        Ok(raw
            .into_iter()
            .filter_map(|(url, value)| match value.trim().parse::<i64>() {
                Ok(0) => None,
                Ok(count) => Some((url, count)),
                Err(_) => {
                    warn!("Ignoring non-integer count {:?} for {} in {}", value, url, key);
                    None
                }
            })
            .collect())
    }

    /// Sums the day buckets of `range` and joins them to registry names.
    ///
    /// # Errors
    ///
    /// Returns the store error if any bucket or the registry cannot be read.
    pub async fn aggregate(&self, range: StatsRange) -> StoreResult<RangeReport> {
        let mut totals: HashMap<String, i64> = HashMap::new();

        for day in range.days(self.clock.today()) {
            for (url, count) in self.day_totals(day).await? {
                *totals.entry(url).or_insert(0) += count;
            }
        }

        let names = self.registry.names_by_url().await?;

        Ok(RangeReport::build(range, totals, &names))
    }
}
