//! Utility helpers shared by the services and binaries.
//!
//! - [`url_policy`] - Allow-list validation of destination urls
//! - [`clock`] - Local calendar date source

pub mod clock;
pub mod url_policy;

pub use clock::{Clock, FixedClock, SystemClock};
pub use url_policy::{UrlPolicy, UrlPolicyError};
