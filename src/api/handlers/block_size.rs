//! Handlers for the runtime block size.

use axum::{Json, body::Bytes, extract::State};

use crate::api::dto::block_size::{BlockSizeRequest, BlockSizeResponse, BlockSizeSavedResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the stored block size override.
///
/// # Endpoint
///
/// `GET /admin/blocksize?token=...`
///
/// `value` is `null` when no override is stored (the environment default or
/// the built-in default of 2 applies then).
pub async fn get_block_size_handler(
    State(state): State<AppState>,
) -> Result<Json<BlockSizeResponse>, AppError> {
    let value = state.block_size_service.stored().await?;
    Ok(Json(BlockSizeResponse { ok: true, value }))
}

/// Stores a block size override.
///
/// # Endpoint
///
/// `POST /admin/blocksize?token=...`
///
/// # Request Body
///
/// ```json
/// { "value": 3 }
/// ```
///
/// `value` may also be a numeric string (`"3"`). The change applies from the
/// next redirect on.
///
/// # Errors
///
/// - `400 bad_body` if the body is not JSON
/// - `400 invalid_value` unless `value` is an integer between 1 and 20
pub async fn set_block_size_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BlockSizeSavedResponse>, AppError> {
    let request: BlockSizeRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        // Valid JSON that is not an object has no `value` to read.
        Err(e) if e.is_data() => return Err(AppError::InvalidValue),
        Err(_) => return Err(AppError::BadBody),
    };

    let block_size = state
        .block_size_service
        .set_from_json(&request.value)
        .await?;

    Ok(Json(BlockSizeSavedResponse {
        ok: true,
        saved: true,
        value: block_size.get(),
    }))
}
