//! Block size: consecutive hits served to one destination before advancing.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Number of consecutive redirects sent to the same destination.
///
/// Always within [`BlockSize::MIN`]..=[`BlockSize::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BlockSize(u32);

impl BlockSize {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 20;
    pub const DEFAULT: BlockSize = BlockSize(2);

    /// Returns the block size if `value` is within range.
    pub fn new(value: i64) -> Option<Self> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Some(Self(value as u32))
        } else {
            None
        }
    }

    /// Clamps any integer into range.
    ///
    /// Used when reading values that bypassed validation, such as a
    /// hand-edited store key or an environment default.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u32)
    }

    /// Parses a raw stored or configured value.
    ///
    /// Returns `None` if the value is not an integer. Out of range integers
    /// are clamped.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        parse_integer(raw.trim()).map(Self::clamped)
    }

    /// Interprets the `value` field of an admin request.
    ///
    /// Accepts JSON integers, integral floats and numeric strings, and rejects
    /// everything outside 1..=20.
    pub fn from_json(value: &Value) -> Option<Self> {
        let number = match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => parse_integer(s.trim()),
            _ => None,
        }?;

        Self::new(number)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for BlockSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for BlockSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses an integer, also accepting integral decimal forms such as `"3.0"`.
pub(crate) fn parse_integer(raw: &str) -> Option<i64> {
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}
