//! Process-local store for tests and single-instance development.

use super::service::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
enum Value {
    String(String),
    List(Vec<String>),
    Hash(HashMap<String, String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: Value) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-memory store with Redis-like semantics.
///
/// Expiry is evaluated lazily against [`tokio::time::Instant`], so tests can
/// pause and advance time to observe retention. State lives only as long as
/// the process; it is not shared between instances.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using MemoryStore (state is process-local)");
        Self::default()
    }

    /// Remaining time to live of a key, if it exists and has one.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let entries = self.lock().ok()?;
        let now = Instant::now();
        entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<String, Entry>>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Operation("memory store lock poisoned".to_string()))?;

        let now = Instant::now();
        entries.retain(|_, entry| !entry.is_expired(now));

        Ok(entries)
    }
}

fn wrong_type(key: &str) -> StoreError {
    StoreError::Operation(format!(
        "WRONGTYPE Operation against key {key} holding the wrong kind of value"
    ))
}

/// Resolves an inclusive, possibly negative, range against a list length.
fn list_bounds(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if len == 0 || start > stop || start >= len {
        return None;
    }

    Some((start as usize, stop as usize))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.lock()?;
        match entries.get(key).map(|entry| &entry.value) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), Entry::new(Value::String(value.to_string())));
        Ok(())
    }

    async fn set_many(&self, pairs: &[(String, String)]) -> StoreResult<()> {
        let mut entries = self.lock()?;
        for (key, value) in pairs {
            entries.insert(key.clone(), Entry::new(Value::String(value.clone())));
        }
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> StoreResult<()> {
        let mut entries = self.lock()?;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn list_range(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>> {
        let entries = self.lock()?;
        match entries.get(key).map(|entry| &entry.value) {
            None => Ok(Vec::new()),
            Some(Value::List(items)) => Ok(list_bounds(items.len(), start, stop)
                .map(|(first, last)| items[first..=last].to_vec())
                .unwrap_or_default()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn replace_list(&self, key: &str, values: &[String]) -> StoreResult<()> {
        let mut entries = self.lock()?;
        if values.is_empty() {
            entries.remove(key);
        } else {
            entries.insert(key.to_string(), Entry::new(Value::List(values.to_vec())));
        }
        Ok(())
    }

    async fn increment(&self, key: &str, field: &str, by: i64) -> StoreResult<i64> {
        let mut entries = self.lock()?;
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(Value::Hash(HashMap::new())));

        let Value::Hash(hash) = &mut entry.value else {
            return Err(wrong_type(key));
        };

        let current = match hash.get(field) {
            Some(raw) => raw.parse::<i64>().map_err(|_| {
                StoreError::Operation("ERR hash value is not an integer".to_string())
            })?,
            None => 0,
        };
        let updated = current
            .checked_add(by)
            .ok_or_else(|| StoreError::Operation("ERR increment would overflow".to_string()))?;

        hash.insert(field.to_string(), updated.to_string());
        Ok(updated)
    }

    async fn hash_get_all(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        let entries = self.lock()?;
        match entries.get(key).map(|entry| &entry.value) {
            None => Ok(HashMap::new()),
            Some(Value::Hash(hash)) => Ok(hash.clone()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn expire(&self, key: &str, ttl: Duration) -> StoreResult<()> {
        let mut entries = self.lock()?;
        if let Some(entry) = entries.get_mut(key) {
            entry.expires_at = Some(Instant::now() + ttl);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.lock().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_set() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_set_many_and_delete() {
        let store = MemoryStore::new();
        store
            .set_many(&[
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ])
            .await
            .unwrap();

        assert_eq!(store.get("a").await.unwrap(), Some("1".to_string()));
        assert_eq!(store.get("b").await.unwrap(), Some("2".to_string()));

        store
            .delete(&["a".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("b").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_list_range() {
        let store = MemoryStore::new();
        let values: Vec<String> = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
        store.replace_list("l", &values).await.unwrap();

        assert_eq!(store.list_range("l", 0, -1).await.unwrap(), values);
        assert_eq!(store.list_range("l", 1, 1).await.unwrap(), vec!["y"]);
        assert_eq!(store.list_range("l", -2, -1).await.unwrap(), vec!["y", "z"]);
        assert_eq!(store.list_range("l", 0, 10).await.unwrap(), values);
        assert!(store.list_range("l", 5, 10).await.unwrap().is_empty());
        assert!(store.list_range("missing", 0, -1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_list_discards_previous() {
        let store = MemoryStore::new();
        store
            .replace_list("l", &["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        store.replace_list("l", &["c".to_string()]).await.unwrap();

        assert_eq!(store.list_range("l", 0, -1).await.unwrap(), vec!["c"]);

        store.replace_list("l", &[]).await.unwrap();
        assert!(store.list_range("l", 0, -1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_increment_and_hash_get_all() {
        let store = MemoryStore::new();
        assert_eq!(store.increment("h", "f", 1).await.unwrap(), 1);
        assert_eq!(store.increment("h", "f", 1).await.unwrap(), 2);
        assert_eq!(store.increment("h", "g", 5).await.unwrap(), 5);

        let all = store.hash_get_all("h").await.unwrap();
        assert_eq!(all.get("f"), Some(&"2".to_string()));
        assert_eq!(all.get("g"), Some(&"5".to_string()));
        assert!(store.hash_get_all("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_type_errors() {
        let store = MemoryStore::new();
        store.set("s", "v").await.unwrap();

        assert!(store.increment("s", "f", 1).await.is_err());
        assert!(store.list_range("s", 0, -1).await.is_err());
        assert!(store.hash_get_all("s").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expire() {
        let store = MemoryStore::new();
        store.increment("h", "f", 1).await.unwrap();
        store.expire("h", Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.ttl("h"), Some(Duration::from_secs(60)));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(!store.hash_get_all("h").await.unwrap().is_empty());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(store.hash_get_all("h").await.unwrap().is_empty());
        assert_eq!(store.ttl("h"), None);
    }

    #[tokio::test]
    async fn test_expire_missing_key_is_noop() {
        let store = MemoryStore::new();
        store
            .expire("missing", Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(store.get("missing").await.unwrap(), None);
    }
}
