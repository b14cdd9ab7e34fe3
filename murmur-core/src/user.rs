//! Account field validation

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for display names.
const MAX_NAME_CHARS: usize = 100;

/// Maximum length for an email address (RFC 5321 limit).
const MAX_EMAIL_CHARS: usize = 254;

/// Password length bounds, in bytes.
const MIN_PASSWORD_BYTES: usize = 8;
const MAX_PASSWORD_BYTES: usize = 128;

/// Maximum length for profile bios.
const MAX_BIO_CHARS: usize = 1000;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

/// Validated display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// Create a display name: trimmed, non-empty, at most 100 characters.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if trimmed.chars().count() > MAX_NAME_CHARS {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_NAME_CHARS,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated, lowercased email address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create an email address.
    ///
    /// Shape check only (local part, `@`, dotted domain) — deliverability
    /// is the mail server's problem. Normalized to lowercase so the
    /// unique index treats `A@b.c` and `a@b.c` as the same account.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }
        if trimmed.chars().count() > MAX_EMAIL_CHARS {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_CHARS,
            });
        }
        if !EMAIL_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "not a valid email address",
            });
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated plaintext password, held only until it is hashed
#[derive(Clone)]
pub struct Password(String);

impl Password {
    /// Create a password: 8..=128 bytes, taken verbatim (no trimming —
    /// leading/trailing spaces are part of the secret).
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.len() < MIN_PASSWORD_BYTES {
            return Err(ValidationError::TooShort {
                field: "password",
                min: MIN_PASSWORD_BYTES,
            });
        }
        if s.len() > MAX_PASSWORD_BYTES {
            return Err(ValidationError::TooLong {
                field: "password",
                max: MAX_PASSWORD_BYTES,
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep passwords out of debug output and logs.
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Validated profile bio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bio(String);

impl Bio {
    /// Create a bio from optional input.
    ///
    /// Returns `Ok(None)` when the input is absent or blank after
    /// trimming, so callers store NULL instead of empty strings.
    pub fn new(s: Option<&str>) -> Result<Option<Self>, ValidationError> {
        let Some(raw) = s else { return Ok(None) };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > MAX_BIO_CHARS {
            return Err(ValidationError::TooLong {
                field: "bio",
                max: MAX_BIO_CHARS,
            });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_trims_and_validates() {
        let name = UserName::new("  Ada Lovelace  ").unwrap();
        assert_eq!(name.as_str(), "Ada Lovelace");

        assert!(UserName::new("   ").is_err());
        assert!(UserName::new(&"x".repeat(101)).is_err());
    }

    #[test]
    fn email_accepts_normal_addresses() {
        let email = EmailAddress::new("Ada@Example.COM").unwrap();
        assert_eq!(email.as_str(), "ada@example.com");
    }

    #[test]
    fn email_rejects_bad_shapes() {
        assert!(EmailAddress::new("").is_err());
        assert!(EmailAddress::new("no-at-sign").is_err());
        assert!(EmailAddress::new("two@@example.com").is_err());
        assert!(EmailAddress::new("spaces in@example.com").is_err());
        assert!(EmailAddress::new("nodot@example").is_err());
    }

    #[test]
    fn password_length_bounds() {
        assert!(Password::new("short").is_err());
        assert!(Password::new("longenough").is_ok());
        assert!(Password::new(&"p".repeat(129)).is_err());
    }

    #[test]
    fn password_debug_is_masked() {
        let pw = Password::new("supersecret").unwrap();
        assert_eq!(format!("{:?}", pw), "Password(***)");
    }

    #[test]
    fn bio_collapses_blank_to_none() {
        assert_eq!(Bio::new(None).unwrap(), None);
        assert_eq!(Bio::new(Some("   ")).unwrap(), None);

        let bio = Bio::new(Some("  likes rust  ")).unwrap().unwrap();
        assert_eq!(bio.as_str(), "likes rust");
    }

    #[test]
    fn bio_length_limit() {
        assert!(Bio::new(Some(&"b".repeat(1001))).is_err());
    }
}
