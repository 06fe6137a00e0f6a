//! API route configuration.
//!
//! Every route answers unsupported methods with a JSON `405` through
//! [`method_not_allowed_handler`].

use crate::api::handlers::{
    delete_links_handler, get_block_size_handler, health_handler, legacy_admin_handler,
    list_links_handler, method_not_allowed_handler, redirect_handler, replace_links_handler,
    reset_rotation_handler, set_block_size_handler, stats_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Routes that need no token.
///
/// # Endpoints
///
/// - `GET /r`      - Rotating redirect
/// - `GET /health` - Store and registry health
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/r",
            get(redirect_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/health",
            get(health_handler).fallback(method_not_allowed_handler),
        )
}

/// Admin and report routes, to be wrapped with token authentication.
///
/// # Endpoints
///
/// - `GET    /stats`                - Range report
/// - `GET    /admin`                - Legacy query-string admin form
/// - `GET    /admin/links`          - List destinations
/// - `POST   /admin/links`          - Replace destinations
/// - `DELETE /admin/links`          - Clear destinations
/// - `GET    /admin/rotation/reset` - Reset the rotation cursor (POST also accepted)
/// - `GET    /admin/blocksize`      - Read the stored block size
/// - `POST   /admin/blocksize`      - Store a block size
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/stats",
            get(stats_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/admin",
            get(legacy_admin_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/admin/links",
            get(list_links_handler)
                .post(replace_links_handler)
                .delete(delete_links_handler)
                .fallback(method_not_allowed_handler),
        )
        .route(
            "/admin/rotation/reset",
            get(reset_rotation_handler)
                .post(reset_rotation_handler)
                .fallback(method_not_allowed_handler),
        )
        .route(
            "/admin/blocksize",
            get(get_block_size_handler)
                .post(set_block_size_handler)
                .fallback(method_not_allowed_handler),
        )
}
