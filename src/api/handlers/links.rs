//! Handlers for destination list management.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::api::dto::links::{
    LegacyAdminAction, LegacyAdminQuery, LinksResponse, ResetResponse, SavedResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// Lists the destinations in rotation order.
///
/// # Endpoint
///
/// `GET /admin/links?token=...`
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<LinksResponse>, AppError> {
    let links = state.registry_service.list().await?;
    Ok(Json(LinksResponse { ok: true, links }))
}

/// Replaces the whole destination list.
///
/// # Endpoint
///
/// `POST /admin/links?token=...`
///
/// # Request Body
///
/// A JSON array of url strings and/or `{ "name": ..., "url": ... }` objects.
/// A JSON string holding such an array is accepted too. The Content-Type is
/// not checked.
///
/// ```json
/// ["https://wa.me/5491100000001", { "name": "Ventas", "url": "https://wa.me/5491100000002" }]
/// ```
///
/// # Errors
///
/// - `400 bad_body` if the body is not a JSON array
/// - `400 invalid_url` (with the offending `url`) if an entry fails the allow-list
/// - `400 empty_list` if no usable entry remains
///
/// The previous list is kept on any error.
pub async fn replace_links_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SavedResponse>, AppError> {
    let items = parse_array_body(&body)?;
    let saved = state.registry_service.replace(&items).await?;

    Ok(Json(SavedResponse { ok: true, saved }))
}

/// Removes every destination.
///
/// # Endpoint
///
/// `DELETE /admin/links?token=...`
pub async fn delete_links_handler(
    State(state): State<AppState>,
) -> Result<Json<ResetResponse>, AppError> {
    state.registry_service.reset().await?;
    Ok(Json(ResetResponse::done()))
}

/// Query-string admin form kept for existing bookmarks and scripts.
///
/// # Endpoint
///
/// `GET /admin?token=...&reset=1`, `&set=<url>,<url>,...` or `&get=1`
///
/// # Errors
///
/// Returns `400 missing_action` if no action parameter is present, plus the
/// errors of [`replace_links_handler`] for `set`.
pub async fn legacy_admin_handler(
    State(state): State<AppState>,
    Query(query): Query<LegacyAdminQuery>,
) -> Result<Response, AppError> {
    match query.action().ok_or(AppError::MissingAction)? {
        LegacyAdminAction::Reset => {
            state.registry_service.reset().await?;
            Ok(Json(ResetResponse::done()).into_response())
        }
        LegacyAdminAction::Set(csv) => {
            let saved = state.registry_service.replace_urls(csv).await?;
            Ok(Json(SavedResponse { ok: true, saved }).into_response())
        }
        LegacyAdminAction::Get => {
            let links = state.registry_service.list().await?;
            Ok(Json(LinksResponse { ok: true, links }).into_response())
        }
    }
}

/// Decodes a request body that must be a JSON array.
fn parse_array_body(body: &[u8]) -> Result<Vec<Value>, AppError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| AppError::BadBody)?;

    let value = match value {
        Value::String(inner) => serde_json::from_str(&inner).map_err(|_| AppError::BadBody)?,
        other => other,
    };

    match value {
        Value::Array(items) => Ok(items),
        _ => Err(AppError::BadBody),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array_body() {
        assert_eq!(parse_array_body(br#"["a", 1]"#).unwrap().len(), 2);
        assert_eq!(parse_array_body(br#""[\"a\"]""#).unwrap().len(), 1);
        assert!(parse_array_body(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_array_body_rejects_non_arrays() {
        for body in [&b"{}"[..], b"\"x\"", b"", b"[", b"42"] {
            assert!(matches!(parse_array_body(body), Err(AppError::BadBody)));
        }
    }
}
