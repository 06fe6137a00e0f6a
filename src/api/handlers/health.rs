//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Store**: PING
/// 2. **Registry**: reads the destination list and reports its size
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "message": "Store reachable" },
///     "registry": { "status": "ok", "message": "3 destination(s)" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_store(&state).await;
    let registry_check = check_registry(&state).await;

    let all_healthy = store_check.is_ok() && registry_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            store: store_check,
            registry: registry_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_store(state: &AppState) -> CheckStatus {
    if state.store.health_check().await {
        CheckStatus::ok("Store reachable")
    } else {
        CheckStatus::error("Store connection failed")
    }
}

/// An empty registry is healthy: redirects answer 404 until links are set.
async fn check_registry(state: &AppState) -> CheckStatus {
    match state.registry_service.list().await {
        Ok(entries) => CheckStatus::ok(format!("{} destination(s)", entries.len())),
        Err(e) => CheckStatus::error(format!("Registry read failed: {}", e)),
    }
}
