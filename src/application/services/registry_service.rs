//! Destination registry: the ordered list of redirect targets.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::entities::DestinationEntry;
use crate::domain::keys::KeySpace;
use crate::error::AppError;
use crate::infrastructure::store::{KeyValueStore, StoreResult};
use crate::utils::UrlPolicy;

/// Service owning the destination list.
///
/// The list is only ever replaced wholesale; entries are never edited in place.
/// Admin input is normalized and checked against the [`UrlPolicy`] before any
/// store access, so a rejected request leaves the previous list untouched.
pub struct RegistryService {
    store: Arc<dyn KeyValueStore>,
    keys: KeySpace,
    policy: UrlPolicy,
}

impl RegistryService {
    /// Creates a new registry service.
    pub fn new(store: Arc<dyn KeyValueStore>, keys: KeySpace, policy: UrlPolicy) -> Self {
        Self {
            store,
            keys,
            policy,
        }
    }

    /// Returns the current destinations in order, skipping unreadable elements.
    ///
    /// # Errors
    ///
    /// Returns the store error if the list cannot be read.
    pub async fn list(&self) -> StoreResult<Vec<DestinationEntry>> {
        let raw = self.store.list_range(&self.keys.registry(), 0, -1).await?;
        let total = raw.len();

        let entries: Vec<DestinationEntry> = raw
            .iter()
            .filter_map(|item| DestinationEntry::parse_stored(item))
            .collect();

        if entries.len() != total {
            warn!(
                "Skipped {} unreadable registry element(s)",
                total - entries.len()
            );
        }

        Ok(entries)
    }

    /// Maps each url to its display name in the current registry.
    ///
    /// When a url appears more than once, the last entry's name wins.
    pub async fn names_by_url(&self) -> StoreResult<HashMap<String, String>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .map(|entry| (entry.url, entry.name))
            .collect())
    }

    /// Replaces the registry from a decoded admin JSON array.
    ///
    /// Items may be bare url strings or `{name, url}` objects; see
    /// [`RegistryService::normalize`].
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if any url fails the policy
    /// - [`AppError::EmptyList`] if nothing usable remains
    /// - [`AppError::Store`] if the write fails
    pub async fn replace(&self, items: &[Value]) -> Result<usize, AppError> {
        self.replace_entries(Self::normalize(items)).await
    }

    /// Replaces the registry from a comma-separated list of bare urls.
    ///
    /// # Errors
    ///
    /// Same as [`RegistryService::replace`].
    pub async fn replace_urls(&self, csv: &str) -> Result<usize, AppError> {
        let entries = csv
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(DestinationEntry::unnamed)
            .collect();

        self.replace_entries(entries).await
    }

    /// Validates and stores already normalized entries.
    ///
    /// # Errors
    ///
    /// Same as [`RegistryService::replace`].
    pub async fn replace_entries(&self, entries: Vec<DestinationEntry>) -> Result<usize, AppError> {
        if let Some(rejected) = entries.iter().find(|entry| !self.policy.allows(&entry.url)) {
            return Err(AppError::InvalidUrl {
                url: rejected.url.clone(),
            });
        }

        if entries.is_empty() {
            return Err(AppError::EmptyList);
        }

        let stored: Vec<String> = entries.iter().map(DestinationEntry::to_stored).collect();
        self.store
            .replace_list(&self.keys.registry(), &stored)
            .await?;

        info!("Registry replaced with {} destination(s)", stored.len());
        Ok(stored.len())
    }

    /// Removes every destination.
    pub async fn reset(&self) -> StoreResult<()> {
        self.store.delete(&[self.keys.registry()]).await?;
        info!("Registry cleared");
        Ok(())
    }

    /// Normalizes admin input into entries.
    ///
    /// # Rules
    ///
    /// - string item: the trimmed string is the url, name is empty
    /// - object item: `name` and `url` are read as clean strings
    /// - any other item is skipped
    /// - entries whose url is empty or the literal `[object Object]` are skipped
    pub fn normalize(items: &[Value]) -> Vec<DestinationEntry> {
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(url) => Some(DestinationEntry::unnamed(url.trim())),
                Value::Object(object) => Some(DestinationEntry::new(
                    object.get("name").map(clean_string).unwrap_or_default(),
                    object.get("url").map(clean_string).unwrap_or_default(),
                )),
                _ => None,
            })
            .filter(|entry| !entry.url.is_empty() && !entry.url.eq_ignore_ascii_case("[object Object]"))
            .collect()
    }
}

/// Reads a loosely typed admin field as a trimmed string.
///
/// Nested objects contribute their `href` or `value` field, the shapes form
/// inputs tend to produce.
fn clean_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(object) => ["href", "value"]
            .iter()
            .find_map(|field| object.get(*field).and_then(Value::as_str))
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        Value::Null | Value::Array(_) => String::new(),
    }
}
