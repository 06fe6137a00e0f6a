//! Rate limiting middleware using token bucket algorithm.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::error::{AppError, ErrorBody};

const SECURE_PER_SECOND: u64 = 1;
const SECURE_BURST: u32 = 10;

fn secure<K>(extractor: K) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>
where
    K: KeyExtractor,
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(SECURE_PER_SECOND)
            .burst_size(SECURE_BURST)
            .key_extractor(extractor)
            .finish()
            .expect("rate limiter constants are non-zero"),
    );

    GovernorLayer::new(governor_conf).error_handler(rejection)
}

/// Renders limiter rejections in the same envelope as every other admin error.
///
/// The `x-ratelimit-after` / `retry-after` headers set by the limiter are kept.
fn rejection(error: GovernorError) -> Response {
    let (status, message, headers) = match error {
        GovernorError::TooManyRequests { wait_time, headers } => {
            let mut response = AppError::RateLimited { wait_time }.into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            return response;
        }
        other => {
            let (parts, message) = other.into_response().into_parts();
            (parts.status, message, parts.headers)
        }
    };

    tracing::error!("Rate limiter rejected request: {}", message);

    let body = ErrorBody {
        ok: false,
        error: "server_error",
        url: None,
        message: Some(message),
    };
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().extend(headers);
    response
}

/// Creates the rate limiter for admin and report endpoints.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests` with
/// `{"ok": false, "error": "rate_limited", "message": ...}`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// # Example
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/admin/links", get(list_links_handler))
///     .layer(rate_limit::secure_layer());
/// ```
pub fn secure_layer()
-> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    secure(PeerIpKeyExtractor)
}

/// Same limits as [`secure_layer`], keyed by the forwarded client IP.
///
/// Reads `X-Forwarded-For`, `X-Real-IP` and `Forwarded`, falling back to the
/// peer address. Use only behind a trusted reverse proxy: the headers are
/// client-controlled otherwise.
pub fn proxied_secure_layer()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    secure(SmartIpKeyExtractor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, StatusCode, header};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_too_many_requests_uses_envelope() {
        let mut headers = HeaderMap::new();
        headers.insert(header::RETRY_AFTER, HeaderValue::from_static("2"));

        let response = rejection(GovernorError::TooManyRequests {
            wait_time: 2,
            headers: Some(headers),
        });

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "2");

        let json = body_json(response).await;
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"], "rate_limited");
        assert_eq!(json["message"], "too many requests, retry in 2s");
    }

    #[tokio::test]
    async fn test_missing_peer_address_is_server_error() {
        let response = rejection(GovernorError::UnableToExtractKey);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "server_error");
    }
}
