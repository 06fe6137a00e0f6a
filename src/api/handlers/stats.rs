//! Handler for the range report.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::dto::stats::{StatsQuery, StatsResponse};
use crate::domain::entities::StatsRange;
use crate::error::AppError;
use crate::state::AppState;

/// Returns hit counts per destination over a date range.
///
/// # Endpoint
///
/// `GET /stats?token=...&range=today|yesterday|week|month`
///
/// Unknown or missing `range` values fall back to `today`; the response
/// echoes the range actually used.
///
/// # Response
///
/// ```json
/// {
///   "ok": true,
///   "range": "week",
///   "total": 12,
///   "stats": [
///     { "name": "Ventas", "url": "https://wa.me/5491100000001", "count": 8 },
///     { "name": "Sin nombre", "url": "https://wa.me/5491100000002", "count": 4 }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns `500` if a day bucket or the registry cannot be read.
pub async fn stats_handler(
    State(state): State<AppState>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let range = StatsRange::from_param(params.range.as_deref());
    let report = state.stats_service.aggregate(range).await?;

    Ok(Json(StatsResponse { ok: true, report }))
}
