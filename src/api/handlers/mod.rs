//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod block_size;
pub mod health;
pub mod links;
pub mod method_not_allowed;
pub mod redirect;
pub mod rotation;
pub mod stats;

pub use block_size::{get_block_size_handler, set_block_size_handler};
pub use health::health_handler;
pub use links::{
    delete_links_handler, legacy_admin_handler, list_links_handler, replace_links_handler,
};
pub use method_not_allowed::method_not_allowed_handler;
pub use redirect::redirect_handler;
pub use rotation::reset_rotation_handler;
pub use stats::stats_handler;
