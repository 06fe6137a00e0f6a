//! Admin-side validation of destination urls.
//!
//! Urls are checked, never rewritten: day buckets are keyed by the exact url
//! string, so the stored form must be what the administrator submitted.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;
use url::Url;

/// Default allow-list: WhatsApp click-to-chat hosts.
pub const DEFAULT_ALLOWED_URL_PATTERN: &str =
    r"^(https?://)(wa\.me|api\.whatsapp\.com|walink\.[a-z.]+|wame\.[a-z.]+|whatsapp\.com)/.+";

static DEFAULT_ALLOWED_URL: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(DEFAULT_ALLOWED_URL_PATTERN)
        .case_insensitive(true)
        .build()
        .unwrap()
});

/// Errors reported for a rejected destination url.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlPolicyError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL does not match the allowed destinations")]
    NotAllowed,
}

/// Allow-list of destination urls accepted by the admin endpoints.
#[derive(Debug, Clone)]
pub struct UrlPolicy {
    allowed: Regex,
}

impl UrlPolicy {
    /// Builds a policy from a case-insensitive regular expression.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error for an invalid pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let allowed = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { allowed })
    }

    /// Checks that `url` is an absolute HTTP(S) url matching the allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`UrlPolicyError::InvalidFormat`] for urls that do not parse,
    /// [`UrlPolicyError::UnsupportedProtocol`] for non-HTTP(S) schemes and
    /// [`UrlPolicyError::NotAllowed`] when the allow-list does not match.
    pub fn check(&self, url: &str) -> Result<(), UrlPolicyError> {
        let parsed = Url::parse(url).map_err(|e| UrlPolicyError::InvalidFormat(e.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => {}
            _ => return Err(UrlPolicyError::UnsupportedProtocol),
        }

        if !self.allowed.is_match(url) {
            return Err(UrlPolicyError::NotAllowed);
        }

        Ok(())
    }

    pub fn allows(&self, url: &str) -> bool {
        self.check(url).is_ok()
    }
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self {
            allowed: DEFAULT_ALLOWED_URL.clone(),
        }
    }
}
