//! DTOs for the block size endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /admin/blocksize`.
///
/// `value` is kept loosely typed: numbers and numeric strings are both
/// accepted and validated by [`crate::domain::entities::BlockSize::from_json`].
#[derive(Debug, Deserialize)]
pub struct BlockSizeRequest {
    #[serde(default)]
    pub value: Value,
}

/// Stored override, or `null` when none is set.
#[derive(Debug, Serialize)]
pub struct BlockSizeResponse {
    pub ok: bool,
    pub value: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct BlockSizeSavedResponse {
    pub ok: bool,
    pub saved: bool,
    pub value: u32,
}
