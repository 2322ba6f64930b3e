//! Borrower credentials

use std::fmt;

use crate::error::CredentialsError;

pub const IDENTIFIER_WIDTH: usize = 8;
pub const SECRET_WIDTH: usize = 6;

/// Borrower id (zero-padded to 8 digits) and numeric password.
///
/// Validated on construction and immutable afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    identifier: String,
    secret: String,
}

impl Credentials {
    /// Build from the textual forms. The identifier may be given with or
    /// without its leading zeros.
    pub fn new(identifier: &str, secret: &str) -> Result<Self, CredentialsError> {
        let identifier = identifier.trim();
        if identifier.is_empty()
            || identifier.len() > IDENTIFIER_WIDTH
            || !identifier.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(CredentialsError::Identifier(identifier.to_string()));
        }

        let secret = secret.trim();
        if secret.len() != SECRET_WIDTH || !secret.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CredentialsError::Secret);
        }

        Ok(Self {
            identifier: format!("{:0>width$}", identifier, width = IDENTIFIER_WIDTH),
            secret: secret.to_string(),
        })
    }

    /// Build from a numeric borrower id.
    pub fn from_number(identifier: u32, secret: &str) -> Result<Self, CredentialsError> {
        Self::new(&identifier.to_string(), secret)
    }

    /// Zero-padded identifier, sent as `bor_id`.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Sent as `bor_verification`.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"******")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_fill() {
        let creds = Credentials::from_number(123456, "112233").unwrap();
        assert_eq!(creds.identifier(), "00123456");
        assert_eq!(creds.secret(), "112233");

        let creds = Credentials::new("00123456", "112233").unwrap();
        assert_eq!(creds.identifier(), "00123456");
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        let creds = Credentials::new(" 123456 ", " 112233\n").unwrap();
        assert_eq!(creds.identifier(), "00123456");
        assert_eq!(creds.secret(), "112233");
    }

    #[test]
    fn test_invalid_identifier() {
        assert!(matches!(
            Credentials::from_number(123_456_789, "112233"),
            Err(CredentialsError::Identifier(_))
        ));
        assert!(Credentials::new("", "112233").is_err());
        assert!(Credentials::new("12a4", "112233").is_err());
    }

    #[test]
    fn test_invalid_secret() {
        assert_eq!(Credentials::new("1", "12345"), Err(CredentialsError::Secret));
        assert_eq!(Credentials::new("1", "1234567"), Err(CredentialsError::Secret));
        assert_eq!(Credentials::new("1", "12345x"), Err(CredentialsError::Secret));
    }

    #[test]
    fn test_debug_hides_secret() {
        let creds = Credentials::from_number(42, "987654").unwrap();
        let shown = format!("{:?}", creds);
        assert!(shown.contains("00000042"));
        assert!(!shown.contains("987654"));
    }
}
