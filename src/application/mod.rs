//! Application layer services implementing business logic.
//!
//! Services own the rules around the persisted state and talk to storage only
//! through the [`crate::infrastructure::store::KeyValueStore`] capability, so
//! each can be exercised against the in-memory store or a mock.
//!
//! # Available Services
//!
//! - [`services::registry_service::RegistryService`] - Destination list management
//! - [`services::rotation_service::RotationService`] - Weighted round-robin selection
//! - [`services::block_size_service::BlockSizeService`] - Runtime block size
//! - [`services::stats_service::StatsService`] - Day buckets and range reports
//! - [`services::auth_service::AuthService`] - Admin token authentication

pub mod services;
