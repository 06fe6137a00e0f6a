//! HTTP surface of the rotator.
//!
//! - [`routes`] - Public and admin route tables
//! - [`handlers`] - One module per endpoint group
//! - [`dto`] - JSON bodies and query strings
//! - [`middleware`] - Token check, rate limiting and request spans
//!
//! Handlers stay thin: they parse the request, call one service and map the
//! outcome onto a response or an [`crate::error::AppError`].

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
