//! Fallback for unsupported methods on known paths.

use crate::error::AppError;

/// Answers `405` with `{"ok": false, "error": "method_not_allowed"}`.
///
/// Installed as the method fallback of every route, so a known path never
/// falls through to axum's empty 405.
pub async fn method_not_allowed_handler() -> AppError {
    AppError::MethodNotAllowed
}
