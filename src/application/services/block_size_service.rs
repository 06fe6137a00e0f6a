//! Runtime block size setting.

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::entities::BlockSize;
use crate::domain::entities::block_size::parse_integer;
use crate::domain::keys::KeySpace;
use crate::error::AppError;
use crate::infrastructure::store::{KeyValueStore, StoreResult};

/// Resolves and updates the block size.
///
/// The value is read from the store on every call, so an update applies to
/// the very next redirect on every instance.
///
/// # Resolution Order
///
/// 1. Stored override, if it is an integer (clamped into 1..=20)
/// 2. Environment default (`BLOCK_SIZE`, already clamped by config)
/// 3. [`BlockSize::DEFAULT`]
pub struct BlockSizeService {
    store: Arc<dyn KeyValueStore>,
    keys: KeySpace,
    env_default: Option<BlockSize>,
}

impl BlockSizeService {
    /// Creates a new block size service.
    pub fn new(store: Arc<dyn KeyValueStore>, keys: KeySpace, env_default: Option<BlockSize>) -> Self {
        Self {
            store,
            keys,
            env_default,
        }
    }

    /// Returns the block size in effect right now.
    ///
    /// # Errors
    ///
    /// Returns the store error if the override cannot be read.
    pub async fn effective(&self) -> StoreResult<BlockSize> {
        if let Some(raw) = self.store.get(&self.keys.block_size()).await? {
            match BlockSize::parse_lenient(&raw) {
                Some(block_size) => {
                    if block_size.to_string() != raw.trim() {
                        warn!("Stored block size {:?} read as {}", raw, block_size);
                    }
                    return Ok(block_size);
                }
                None => warn!("Ignoring non-integer stored block size {:?}", raw),
            }
        }

        Ok(self.env_default.unwrap_or_default())
    }

    /// Returns the raw stored override, if it is an integer.
    ///
    /// Unlike [`BlockSizeService::effective`], no clamping or fallback is applied.
    pub async fn stored(&self) -> StoreResult<Option<i64>> {
        Ok(self
            .store
            .get(&self.keys.block_size())
            .await?
            .and_then(|raw| parse_integer(raw.trim())))
    }

    /// Validates and stores an override from an admin request value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidValue`] unless `value` is an integer in 1..=20.
    /// Returns [`AppError::Store`] if the write fails.
    pub async fn set_from_json(&self, value: &Value) -> Result<BlockSize, AppError> {
        let block_size = BlockSize::from_json(value).ok_or(AppError::InvalidValue)?;
        self.set(block_size).await?;
        Ok(block_size)
    }

    /// Stores an override.
    pub async fn set(&self, block_size: BlockSize) -> StoreResult<()> {
        self.store
            .set(&self.keys.block_size(), &block_size.to_string())
            .await?;
        info!("Block size set to {}", block_size);
        Ok(())
    }
}
