//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`store`] - Key-value store capability (Redis and in-memory implementations)

pub mod store;
