//! Core domain entities of the rotator.
//!
//! Entities are plain data with pure behaviour; nothing in here touches the
//! store or the clock.
//!
//! # Entity Types
//!
//! - [`DestinationEntry`] - A redirect target in the registry
//! - [`BlockSize`] - Hits per destination before the cursor advances
//! - [`RotationState`] / [`StoredCursor`] - The rotation cursor and its raw stored form
//! - [`StatsRange`] / [`RangeReport`] - Reporting windows and their aggregated output

pub mod block_size;
pub mod destination;
pub mod report;
pub mod rotation;

pub use block_size::BlockSize;
pub use destination::DestinationEntry;
pub use report::{RangeReport, StatsRange, StatsRow, UNNAMED_DESTINATION};
pub use rotation::{RotationState, RotationStep, StoredCursor};
