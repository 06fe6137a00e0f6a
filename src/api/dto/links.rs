//! DTOs for destination list management.

use serde::{Deserialize, Serialize};

use crate::domain::entities::DestinationEntry;

/// Current destination list.
#[derive(Debug, Serialize)]
pub struct LinksResponse {
    pub ok: bool,
    pub links: Vec<DestinationEntry>,
}

/// Result of replacing the destination list.
#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub ok: bool,
    pub saved: usize,
}

/// Result of clearing the destination list or the rotation cursor.
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub ok: bool,
    pub reset: bool,
}

impl ResetResponse {
    pub fn done() -> Self {
        Self {
            ok: true,
            reset: true,
        }
    }
}

/// Query parameters of the legacy `GET /admin` form.
///
/// Only the first present action runs, in the order `reset`, `set`, `get`.
/// An empty parameter counts as absent.
#[derive(Debug, Default, Deserialize)]
pub struct LegacyAdminQuery {
    pub set: Option<String>,
    pub get: Option<String>,
    pub reset: Option<String>,
}

/// Action selected by a [`LegacyAdminQuery`].
#[derive(Debug, PartialEq, Eq)]
pub enum LegacyAdminAction<'a> {
    Reset,
    Set(&'a str),
    Get,
}

impl LegacyAdminQuery {
    pub fn action(&self) -> Option<LegacyAdminAction<'_>> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.is_empty())
        }

        if present(&self.reset).is_some() {
            Some(LegacyAdminAction::Reset)
        } else if let Some(csv) = present(&self.set) {
            Some(LegacyAdminAction::Set(csv))
        } else if present(&self.get).is_some() {
            Some(LegacyAdminAction::Get)
        } else {
            None
        }
    }
}
