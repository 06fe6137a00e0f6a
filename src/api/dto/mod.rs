//! Data Transfer Objects for API requests and responses.
//!
//! Every successful JSON response carries `"ok": true`; failures are rendered
//! by [`crate::error::AppError`].

pub mod block_size;
pub mod health;
pub mod links;
pub mod stats;
