//! Names of the persisted keys.

use chrono::NaiveDate;

/// Builds every key the rotator reads or writes.
///
/// With the default empty prefix the keys are `links`, `rot:i`, `rot:left`,
/// `blocksize` and `stats:day:YYYY-MM-DD`. A prefix lets several rotators
/// share one store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySpace {
    prefix: String,
}

impl KeySpace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Ordered destination list.
    pub fn registry(&self) -> String {
        format!("{}links", self.prefix)
    }

    pub fn rotation_index(&self) -> String {
        format!("{}rot:i", self.prefix)
    }

    pub fn rotation_remaining(&self) -> String {
        format!("{}rot:left", self.prefix)
    }

    /// Runtime block size override.
    pub fn block_size(&self) -> String {
        format!("{}blocksize", self.prefix)
    }

    /// Per-day hash of url to hit count.
    pub fn stats_day(&self, day: NaiveDate) -> String {
        format!("{}stats:day:{}", self.prefix, day.format("%Y-%m-%d"))
    }
}
