//! Handler for the rotation cursor reset.

use axum::{Json, extract::State};

use crate::api::dto::links::ResetResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Clears the rotation cursor.
///
/// # Endpoint
///
/// `GET|POST /admin/rotation/reset?token=...`
///
/// The next redirect serves the first destination with a full block.
pub async fn reset_rotation_handler(
    State(state): State<AppState>,
) -> Result<Json<ResetResponse>, AppError> {
    state.rotation_service.reset().await?;
    Ok(Json(ResetResponse::done()))
}
