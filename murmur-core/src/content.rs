//! Post content validation

use super::ValidationError;

/// Maximum length for post content, in characters.
const MAX_CONTENT_CHARS: usize = 500;

/// Validated post content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent(String);

impl PostContent {
    /// Create new post content.
    ///
    /// # Rules
    /// - Must not be empty
    /// - At most 500 characters (Unicode scalars, not bytes)
    ///
    /// # Example
    /// ```
    /// use murmur_core::PostContent;
    ///
    /// assert!(PostContent::new("just shipped it").is_ok());
    /// assert!(PostContent::new("").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "content" });
        }

        if s.chars().count() > MAX_CONTENT_CHARS {
            return Err(ValidationError::TooLong {
                field: "content",
                max: MAX_CONTENT_CHARS,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Get the content as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for PostContent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_content() {
        assert!(PostContent::new("hello world").is_ok());
    }

    #[test]
    fn empty_content_rejected() {
        let err = PostContent::new("").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "content" }));
    }

    #[test]
    fn max_length_is_chars_not_bytes() {
        // 500 multibyte characters are fine even though they exceed 500 bytes
        let content_500 = "é".repeat(500);
        assert!(PostContent::new(&content_500).is_ok());

        let content_over = "é".repeat(501);
        let err = PostContent::new(&content_over).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 500, .. }));
    }

    #[test]
    fn boundary_length() {
        let content_500 = "a".repeat(500);
        assert!(PostContent::new(&content_500).is_ok());

        let content_501 = "a".repeat(501);
        assert!(PostContent::new(&content_501).is_err());
    }
}
