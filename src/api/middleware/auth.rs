//! Admin token authentication middleware.

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Default, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Authenticates admin requests using the `token` query parameter.
///
/// # Query Format
///
/// ```text
/// GET /stats?token=<ADMIN_TOKEN>&range=week
/// ```
///
/// Installed with `route_layer`, so it runs for every method of a matched
/// route: an unauthenticated request gets `401` even when the method would
/// otherwise be rejected with `405`.
///
/// # Errors
///
/// Returns `401 Unauthorized` with `{"ok": false, "error": "bad_token"}` if
/// the parameter is missing, empty or wrong.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let admin = Router::new()
///     .route("/stats", get(stats_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let query = Query::<TokenQuery>::try_from_uri(req.uri())
        .map(|Query(query)| query)
        .unwrap_or_default();

    st.auth_service.authenticate(query.token.as_deref())?;

    Ok(next.run(req).await)
}
