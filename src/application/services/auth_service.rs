//! Admin token check.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Service for authenticating admin requests.
///
/// The configured token is never compared byte by byte. Instead, a MAC of the
/// presented token (keyed by the configured one) is verified with
/// [`Mac::verify_slice`], which runs in constant time.
pub struct AuthService {
    expected: Vec<u8>,
    admin_token: String,
}

impl AuthService {
    /// Creates a new authentication service.
    pub fn new(admin_token: impl Into<String>) -> Self {
        let admin_token = admin_token.into();
        let expected = Self::mac(&admin_token, &admin_token);
        Self {
            expected,
            admin_token,
        }
    }

    fn mac(key: &str, token: &str) -> Vec<u8> {
        // HMAC accepts keys of any length, including empty.
        let mut mac = match HmacSha256::new_from_slice(key.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return Vec::new(),
        };
        mac.update(token.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    /// Checks the token presented with a request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadToken`] if the token is missing, empty or wrong.
    pub fn authenticate(&self, token: Option<&str>) -> Result<(), AppError> {
        let token = token.filter(|t| !t.is_empty()).ok_or(AppError::BadToken)?;

        let mut mac = HmacSha256::new_from_slice(self.admin_token.as_bytes())
            .map_err(|_| AppError::BadToken)?;
        mac.update(token.as_bytes());

        mac.verify_slice(&self.expected)
            .map_err(|_| AppError::BadToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticate_success() {
        let auth = AuthService::new("s3cret");
        assert!(auth.authenticate(Some("s3cret")).is_ok());
    }

    #[test]
    fn test_authenticate_wrong_token() {
        let auth = AuthService::new("s3cret");
        assert!(matches!(
            auth.authenticate(Some("s3cret ")),
            Err(AppError::BadToken)
        ));
        assert!(matches!(
            auth.authenticate(Some("other")),
            Err(AppError::BadToken)
        ));
    }

    #[test]
    fn test_authenticate_missing_or_empty() {
        let auth = AuthService::new("s3cret");
        assert!(matches!(auth.authenticate(None), Err(AppError::BadToken)));
        assert!(matches!(auth.authenticate(Some("")), Err(AppError::BadToken)));
    }

    #[test]
    fn test_mac_depends_on_key() {
        assert_ne!(
            AuthService::mac("key-a", "token"),
            AuthService::mac("key-b", "token")
        );
        assert_eq!(AuthService::mac("key-a", "token").len(), 32);
    }
}
