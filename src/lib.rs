//! # Link Rotator
//!
//! A weighted round-robin link redirector with per-day usage analytics,
//! built with Axum and Redis.
//!
//! Every `GET /r` is answered with a `302` to the next destination of an
//! ordered list. Each destination is served `block size` times in a row
//! before the rotation moves on, and every hit is counted in a per-day
//! bucket that reports aggregate over today, yesterday, this week or this
//! month.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Rotation state machine, report building, key names
//! - **Application Layer** ([`application`]) - Services orchestrating store access
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis and in-memory key-value stores
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Quick Start
//!
//! ```bash
//! export ADMIN_TOKEN="change-me"
//! export REDIS_URL="redis://localhost:6379"  # Optional, in-memory otherwise
//!
//! cargo run
//!
//! curl -X POST "http://localhost:3000/admin/links?token=change-me" \
//!   -d '[{"name": "Ventas", "url": "https://wa.me/5491100000001"}]'
//! curl -i http://localhost:3000/r
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AuthService, BlockSizeService, RegistryService, RotationService, StatsService,
    };
    pub use crate::domain::entities::{BlockSize, DestinationEntry, RangeReport, StatsRange};
    pub use crate::error::AppError;
    pub use crate::infrastructure::store::{KeyValueStore, MemoryStore, RedisStore};
    pub use crate::state::AppState;
}
