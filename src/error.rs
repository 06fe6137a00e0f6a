//! Request-level errors and their HTTP representation.
//!
//! Every failure is rendered as `{"ok": false, "error": "<code>", ...}` with a
//! stable code, except [`AppError::NoDestinations`], which is the user-facing
//! empty state of the redirect endpoint and answers with plain text.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::infrastructure::store::StoreError;

/// Body shown to redirect callers when no destinations are configured.
pub const NO_DESTINATIONS_MESSAGE: &str = "No links configured.";

/// Error envelope returned by JSON endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("missing or invalid admin token")]
    BadToken,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("request body is not a valid destination list")]
    BadBody,

    #[error("destination url is not allowed: {url}")]
    InvalidUrl { url: String },

    #[error("destination list is empty")]
    EmptyList,

    #[error("block size must be an integer between 1 and 20")]
    InvalidValue,

    #[error("no admin action requested")]
    MissingAction,

    #[error("too many requests, retry in {wait_time}s")]
    RateLimited { wait_time: u64 },

    #[error("no destinations configured")]
    NoDestinations,

    #[error("stored destination cannot be used as a redirect target: {url}")]
    InvalidDestination { url: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadToken => "bad_token",
            AppError::MethodNotAllowed => "method_not_allowed",
            AppError::BadBody => "bad_body",
            AppError::InvalidUrl { .. } => "invalid_url",
            AppError::EmptyList => "empty_list",
            AppError::InvalidValue => "invalid_value",
            AppError::MissingAction => "missing_action",
            AppError::RateLimited { .. } => "rate_limited",
            AppError::NoDestinations => "not_found",
            AppError::InvalidDestination { .. } | AppError::Store(_) => "server_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadToken => StatusCode::UNAUTHORIZED,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadBody
            | AppError::InvalidUrl { .. }
            | AppError::EmptyList
            | AppError::InvalidValue
            | AppError::MissingAction => StatusCode::BAD_REQUEST,
            AppError::NoDestinations => StatusCode::NOT_FOUND,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::InvalidDestination { .. } | AppError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converts the error into the JSON envelope.
    pub fn to_error_body(&self) -> ErrorBody {
        let (url, message) = match self {
            AppError::InvalidUrl { url } => (Some(url.clone()), None),
            AppError::RateLimited { .. }
            | AppError::InvalidDestination { .. }
            | AppError::Store(_) => (None, Some(self.to_string())),
            _ => (None, None),
        };

        ErrorBody {
            ok: false,
            error: self.code(),
            url,
            message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::NoDestinations => {
                return (
                    status,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    NO_DESTINATIONS_MESSAGE,
                )
                    .into_response();
            }
            AppError::Store(e) => tracing::error!("Store failure: {}", e),
            AppError::InvalidDestination { url } => {
                tracing::error!("Cannot redirect to stored destination {:?}", url)
            }
            _ => {}
        }

        (status, Json(self.to_error_body())).into_response()
    }
}
