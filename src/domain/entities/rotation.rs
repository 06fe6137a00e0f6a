//! Rotation cursor state machine.
//!
//! The cursor is a pair `(index, remaining)` over a registry of `len`
//! destinations. Each redirect serves `registry[index]`, then consumes one hit;
//! once `remaining` reaches zero the cursor moves to the next index (wrapping)
//! and refills `remaining` with the current block size.
//!
//! Everything here is pure. Loading and persisting the cursor is done by
//! [`crate::application::services::RotationService`].

use std::num::NonZeroUsize;

use super::block_size::{BlockSize, parse_integer};

/// Persistent rotation cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationState {
    pub index: usize,
    pub remaining: u32,
}

/// Cursor fields as read from the store, before validation.
///
/// A field is `None` when the key was missing or held something other than
/// a valid value (negative or non-integer index, non-positive remaining).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoredCursor {
    pub index: Option<usize>,
    pub remaining: Option<u32>,
}

/// Outcome of serving one redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationStep {
    /// Registry position served by this request.
    pub selected: usize,
    /// State to persist for the next request.
    pub next: RotationState,
}

impl RotationState {
    /// The reset state: first entry, full block.
    pub fn initial(block_size: BlockSize) -> Self {
        Self {
            index: 0,
            remaining: block_size.get(),
        }
    }

    /// Serves one hit from this state.
    ///
    /// The entry at `self.index` is selected before the hit is consumed.
    pub fn advance(self, len: NonZeroUsize, block_size: BlockSize) -> RotationStep {
        let selected = self.index;
        let remaining = self.remaining.saturating_sub(1);

        let next = if remaining == 0 {
            Self {
                index: (selected + 1) % len.get(),
                remaining: block_size.get(),
            }
        } else {
            Self {
                index: selected,
                remaining,
            }
        };

        RotationStep { selected, next }
    }
}

impl StoredCursor {
    /// Parses the raw index and remaining values.
    pub fn parse(index: Option<&str>, remaining: Option<&str>) -> Self {
        Self {
            index: index
                .and_then(|raw| parse_integer(raw.trim()))
                .and_then(|n| usize::try_from(n).ok()),
            remaining: remaining
                .and_then(|raw| parse_integer(raw.trim()))
                .filter(|n| *n > 0)
                .and_then(|n| u32::try_from(n).ok()),
        }
    }

    /// Turns the stored fields into a usable state for a registry of `len` entries.
    ///
    /// - missing index resets to 0
    /// - missing remaining refills to the block size
    /// - remaining above the block size (the block size was lowered) is capped
    /// - an index past the end (the registry shrank) resets the whole cursor
    pub fn resolve(self, len: NonZeroUsize, block_size: BlockSize) -> RotationState {
        let index = self.index.unwrap_or(0);
        if index >= len.get() {
            return RotationState::initial(block_size);
        }

        let remaining = self
            .remaining
            .map_or(block_size.get(), |r| r.min(block_size.get()));

        RotationState { index, remaining }
    }
}
