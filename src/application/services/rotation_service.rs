//! Weighted round-robin selection over the registry.

use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, info};

use super::{BlockSizeService, RegistryService};
use crate::domain::entities::{DestinationEntry, RotationState, StoredCursor};
use crate::domain::keys::KeySpace;
use crate::error::AppError;
use crate::infrastructure::store::{KeyValueStore, StoreResult};

/// Picks the destination for each redirect and persists the rotation cursor.
///
/// # Concurrency
///
/// The cursor is read and written without a lock. Two redirects handled at the
/// same moment may read the same cursor and serve the same destination, which
/// skews the distribution by one hit. The write itself is a single multi-key
/// set, so the two cursor fields are never observed half-updated.
pub struct RotationService {
    store: Arc<dyn KeyValueStore>,
    keys: KeySpace,
    registry: Arc<RegistryService>,
    block_sizes: Arc<BlockSizeService>,
}

impl RotationService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        keys: KeySpace,
        registry: Arc<RegistryService>,
        block_sizes: Arc<BlockSizeService>,
    ) -> Self {
        Self {
            store,
            keys,
            registry,
            block_sizes,
        }
    }

    /// Selects the destination for one redirect and advances the cursor.
    ///
    /// # Errors
    ///
    /// - [`AppError::NoDestinations`] if the registry is empty; no state is touched
    /// - [`AppError::Store`] if the registry, block size or cursor cannot be
    ///   read, or the new cursor cannot be written
    pub async fn next_destination(&self) -> Result<DestinationEntry, AppError> {
        let mut entries = self.registry.list().await?;
        let Some(len) = NonZeroUsize::new(entries.len()) else {
            return Err(AppError::NoDestinations);
        };

        let block_size = self.block_sizes.effective().await?;
        let state = self.load_cursor().await?.resolve(len, block_size);
        let step = state.advance(len, block_size);

        self.save_cursor(step.next).await?;

        debug!(
            "Rotation served index {} of {} (next: index {}, remaining {})",
            step.selected, len, step.next.index, step.next.remaining
        );

        Ok(entries.swap_remove(step.selected))
    }

    /// Reads the raw cursor fields.
    pub async fn load_cursor(&self) -> StoreResult<StoredCursor> {
        let index = self.store.get(&self.keys.rotation_index()).await?;
        let remaining = self.store.get(&self.keys.rotation_remaining()).await?;

        Ok(StoredCursor::parse(index.as_deref(), remaining.as_deref()))
    }

    /// Writes both cursor fields in one operation.
    pub async fn save_cursor(&self, state: RotationState) -> StoreResult<()> {
        self.store
            .set_many(&[
                (self.keys.rotation_index(), state.index.to_string()),
                (self.keys.rotation_remaining(), state.remaining.to_string()),
            ])
            .await
    }

    /// Clears the cursor so the next redirect starts a fresh block at index 0.
    pub async fn reset(&self) -> StoreResult<()> {
        self.store
            .delete(&[self.keys.rotation_index(), self.keys.rotation_remaining()])
            .await?;
        info!("Rotation cursor reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::BlockSize;
    use crate::infrastructure::store::{MemoryStore, MockKeyValueStore, StoreError};
    use crate::utils::UrlPolicy;

    fn service(store: Arc<dyn KeyValueStore>, block_size: i64) -> RotationService {
        let keys = KeySpace::default();
        let registry = Arc::new(RegistryService::new(
            store.clone(),
            keys.clone(),
            UrlPolicy::default(),
        ));
        let block_sizes = Arc::new(BlockSizeService::new(
            store.clone(),
            keys.clone(),
            Some(BlockSize::clamped(block_size)),
        ));
        RotationService::new(store, keys, registry, block_sizes)
    }

    async fn seed(store: &MemoryStore, urls: &[&str]) {
        let stored: Vec<String> = urls
            .iter()
            .map(|url| DestinationEntry::unnamed(*url).to_stored())
            .collect();
        store.replace_list("links", &stored).await.unwrap();
    }

    async fn serve(rotation: &RotationService, count: usize) -> Vec<String> {
        let mut urls = Vec::with_capacity(count);
        for _ in 0..count {
            urls.push(rotation.next_destination().await.unwrap().url);
        }
        urls
    }

    #[tokio::test]
    async fn test_weighted_sequence() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, &["https://wa.me/1", "https://wa.me/2"]).await;
        let rotation = service(store.clone(), 2);

        assert_eq!(
            serve(&rotation, 5).await,
            vec![
                "https://wa.me/1",
                "https://wa.me/1",
                "https://wa.me/2",
                "https://wa.me/2",
                "https://wa.me/1",
            ]
        );

        assert_eq!(store.get("rot:i").await.unwrap(), Some("0".to_string()));
        assert_eq!(store.get("rot:left").await.unwrap(), Some("1".to_string()));
    }

    #[tokio::test]
    async fn test_reset_restarts_at_first_entry() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, &["https://wa.me/1", "https://wa.me/2", "https://wa.me/3"]).await;
        let rotation = service(store.clone(), 1);

        serve(&rotation, 2).await;
        rotation.reset().await.unwrap();

        assert_eq!(serve(&rotation, 1).await, vec!["https://wa.me/1"]);
    }

    #[tokio::test]
    async fn test_shrunk_registry_resets_cursor() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, &["https://wa.me/1", "https://wa.me/2", "https://wa.me/3"]).await;
        store
            .set_many(&[
                ("rot:i".to_string(), "2".to_string()),
                ("rot:left".to_string(), "1".to_string()),
            ])
            .await
            .unwrap();

        seed(&store, &["https://wa.me/1"]).await;
        let rotation = service(store, 2);

        assert_eq!(
            serve(&rotation, 3).await,
            vec!["https://wa.me/1", "https://wa.me/1", "https://wa.me/1"]
        );
    }

    #[tokio::test]
    async fn test_lowered_block_size_caps_remaining() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, &["https://wa.me/1", "https://wa.me/2"]).await;
        store
            .set_many(&[
                ("rot:i".to_string(), "0".to_string()),
                ("rot:left".to_string(), "9".to_string()),
            ])
            .await
            .unwrap();

        let rotation = service(store, 1);
        assert_eq!(
            serve(&rotation, 3).await,
            vec!["https://wa.me/1", "https://wa.me/2", "https://wa.me/1"]
        );
    }

    #[tokio::test]
    async fn test_corrupt_cursor_is_treated_as_missing() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, &["https://wa.me/1", "https://wa.me/2"]).await;
        store
            .set_many(&[
                ("rot:i".to_string(), "-4".to_string()),
                ("rot:left".to_string(), "abc".to_string()),
            ])
            .await
            .unwrap();

        let rotation = service(store, 2);
        assert_eq!(
            serve(&rotation, 3).await,
            vec!["https://wa.me/1", "https://wa.me/1", "https://wa.me/2"]
        );
    }

    #[tokio::test]
    async fn test_empty_registry_touches_nothing() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_list_range()
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));

        let rotation = service(Arc::new(mock), 2);
        assert!(matches!(
            rotation.next_destination().await,
            Err(AppError::NoDestinations)
        ));
    }

    #[tokio::test]
    async fn test_cursor_write_failure_is_an_error() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_list_range()
            .returning(|_, _, _| Ok(vec!["https://wa.me/1".to_string()]));
        mock.expect_get().returning(|_| Ok(None));
        mock.expect_set_many()
            .times(1)
            .returning(|_| Err(StoreError::Connection("refused".to_string())));

        let rotation = service(Arc::new(mock), 2);
        assert!(matches!(
            rotation.next_destination().await,
            Err(AppError::Store(StoreError::Connection(_)))
        ));
    }

    #[tokio::test]
    async fn test_cursor_written_in_one_call() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_list_range()
            .returning(|_, _, _| Ok(vec!["https://wa.me/1".to_string(), "https://wa.me/2".to_string()]));
        mock.expect_get().returning(|_| Ok(None));
        mock.expect_set_many()
            .withf(|pairs| {
                pairs.to_vec()
                    == vec![
                        ("rot:i".to_string(), "0".to_string()),
                        ("rot:left".to_string(), "1".to_string()),
                    ]
            })
            .times(1)
            .returning(|_| Ok(()));

        let entry = service(Arc::new(mock), 2).next_destination().await.unwrap();
        assert_eq!(entry.url, "https://wa.me/1");
    }

    #[tokio::test]
    async fn test_interleaved_requests_can_serve_same_slot() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, &["https://wa.me/1", "https://wa.me/2"]).await;
        let first = service(store.clone(), 1);
        let second = service(store.clone(), 1);
        let len = NonZeroUsize::new(2).unwrap();
        let block = BlockSize::clamped(1);

        // Both read before either writes.
        let a = first.load_cursor().await.unwrap().resolve(len, block).advance(len, block);
        let b = second.load_cursor().await.unwrap().resolve(len, block).advance(len, block);
        first.save_cursor(a.next).await.unwrap();
        second.save_cursor(b.next).await.unwrap();

        assert_eq!(a.selected, b.selected);
        assert_eq!(
            first.load_cursor().await.unwrap(),
            StoredCursor {
                index: Some(1),
                remaining: Some(1),
            }
        );
    }
}
