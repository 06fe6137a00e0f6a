//! Domain layer: entities and key naming.
//!
//! This layer has no dependencies on the store, HTTP or configuration.
//!
//! # Architecture
//!
//! - [`entities`] - Destinations, the rotation cursor, block size and reports
//! - [`keys`] - Layout of the persisted key space
//!
//! # Redirect Flow
//!
//! 1. The registry is read and parsed into [`entities::DestinationEntry`] values
//! 2. The stored cursor is read as a [`entities::StoredCursor`] and resolved
//! 3. [`entities::RotationState::advance`] picks the target and the next state
//! 4. The next state is persisted and the hit is tallied in the day bucket

pub mod entities;
pub mod keys;
