//! Business logic services for the application layer.

pub mod auth_service;
pub mod block_size_service;
pub mod registry_service;
pub mod rotation_service;
pub mod stats_service;

pub use auth_service::AuthService;
pub use block_size_service::BlockSizeService;
pub use registry_service::RegistryService;
pub use rotation_service::RotationService;
pub use stats_service::StatsService;
