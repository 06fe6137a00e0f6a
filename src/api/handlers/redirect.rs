//! Handler for the rotating redirect.

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use url::Url;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects to the destination whose turn it is.
///
/// # Endpoint
///
/// `GET /r`
///
/// # Request Flow
///
/// 1. Note the local date the request arrived on
/// 2. Load the registry (empty registry: `404`, nothing else is touched)
/// 3. Resolve the block size and the rotation cursor
/// 4. Persist the advanced cursor
/// 5. Hand the hit to a background task for the stats bucket of step 1
/// 6. Return `302 Found` with the selected url in `Location`
///
/// # Stats
///
/// The response does not wait for the stats write. Recording failures are
/// logged and counted in `stats_record_failures_total`.
///
/// # Errors
///
/// Returns `404` with the plain text `No links configured.` if the registry
/// is empty. Returns `500` if the registry, block size or cursor cannot be read
/// or the cursor cannot be written.
pub async fn redirect_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let day = state.stats_service.today();

    let entry = match state.rotation_service.next_destination().await {
        Ok(entry) => entry,
        Err(AppError::NoDestinations) => {
            metrics::counter!("redirects_empty_total").increment(1);
            return Err(AppError::NoDestinations);
        }
        Err(e) => return Err(e),
    };

    let location = location_header(&entry.url).ok_or_else(|| AppError::InvalidDestination {
        url: entry.url.clone(),
    })?;

    state.stats_service.spawn_record(day, entry.url);
    metrics::counter!("redirects_total").increment(1);

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Builds the `Location` value for a stored url.
///
/// Non-ASCII urls (e.g. a prefilled message with accents) are sent in their
/// percent-encoded form.
fn location_header(url: &str) -> Option<HeaderValue> {
    if url.is_ascii() {
        return HeaderValue::from_str(url).ok();
    }

    Url::parse(url)
        .ok()
        .and_then(|parsed| HeaderValue::from_str(parsed.as_str()).ok())
}
