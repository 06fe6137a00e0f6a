//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /r`       - Rotating redirect (public)
//! - `GET  /health`  - Health check (public)
//! - `/stats`, `/admin/*` - Reports and administration (`token` query parameter required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin, for browser-based admin panels
//! - **Rate limiting** - Per-IP token bucket on admin routes (configurable for proxy deployments)
//! - **Authentication** - Admin token, checked before method dispatch
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::http::{Method, header};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// CORS policy shared by every route.
///
/// Preflight requests are answered here and never reach authentication.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Builds every route with its middleware, without path normalization.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
///
/// The admin rate limiter keys on the peer address, so the router must be
/// served with connect info (or given a `MockConnectInfo` in tests).
pub fn api_router(state: AppState, behind_proxy: bool) -> Router {
    let admin = api::routes::admin_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let admin = if behind_proxy {
        admin.layer(rate_limit::proxied_secure_layer())
    } else {
        admin.layer(rate_limit::secure_layer())
    };

    Router::new()
        .merge(api::routes::public_routes())
        .merge(admin)
        .with_state(state)
        .layer(cors_layer())
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// Trailing slashes are trimmed before routing, so `/admin/links/` reaches
/// the same handler as `/admin/links`.
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(api_router(state, behind_proxy))
}
