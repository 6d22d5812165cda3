//! Record identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`RecordId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordIdError {
    /// The input string is empty.
    #[error("record id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("record id must be at most {max} bytes")]
    TooLong {
        /// Maximum allowed length in bytes.
        max: usize,
    },
    /// The input contains a path separator.
    #[error("record id cannot contain '/'")]
    ContainsSlash,
    /// The input is a name the document store reserves.
    #[error("record id '{0}' is reserved")]
    Reserved(String),
}

/// Opaque key of a profile document.
///
/// Identifiers are handed to the remote store as a single path segment, so
/// the rules below keep them from escaping the `users` collection.
///
/// ## Constraints
///
/// - Length: 1-1500 bytes
/// - Must not contain `/`
/// - Must not be `.` or `..`
/// - Must not match `__.*__`
///
/// ## Examples
///
/// ```
/// use bizcard_core::RecordId;
///
/// assert!(RecordId::parse("QcsoVRnPirWZeFWgwm2Q").is_ok());
///
/// assert!(RecordId::parse("").is_err());
/// assert!(RecordId::parse("users/other").is_err());
/// assert!(RecordId::parse("__name__").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Maximum length of a document identifier in bytes.
    pub const MAX_LENGTH: usize = 1500;

    /// Parse a `RecordId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is longer than 1500 bytes
    /// - Contains a `/`
    /// - Is a reserved name
    pub fn parse(s: &str) -> Result<Self, RecordIdError> {
        if s.is_empty() {
            return Err(RecordIdError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(RecordIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.contains('/') {
            return Err(RecordIdError::ContainsSlash);
        }

        let dunder = s.len() >= 4 && s.starts_with("__") && s.ends_with("__");
        if s == "." || s == ".." || dunder {
            return Err(RecordIdError::Reserved(s.to_owned()));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `RecordId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = RecordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_ids() {
        assert!(RecordId::parse("QcsoVRnPirWZeFWgwm2Q").is_ok());
        assert!(RecordId::parse("demo").is_ok());
        assert!(RecordId::parse("user-123_abc").is_ok());
        assert!(RecordId::parse("__").is_ok());
        assert!(RecordId::parse("...").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(RecordId::parse(""), Err(RecordIdError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(RecordId::MAX_LENGTH + 1);
        assert!(matches!(
            RecordId::parse(&long),
            Err(RecordIdError::TooLong { .. })
        ));
        assert!(RecordId::parse(&"a".repeat(RecordId::MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_parse_slash() {
        assert_eq!(
            RecordId::parse("users/other"),
            Err(RecordIdError::ContainsSlash)
        );
    }

    #[test]
    fn test_parse_reserved() {
        assert!(matches!(RecordId::parse("."), Err(RecordIdError::Reserved(_))));
        assert!(matches!(RecordId::parse(".."), Err(RecordIdError::Reserved(_))));
        assert!(matches!(
            RecordId::parse("__name__"),
            Err(RecordIdError::Reserved(_))
        ));
    }

    #[test]
    fn test_display_and_from_str() {
        let id: RecordId = "abc123".parse().unwrap();
        assert_eq!(format!("{id}"), "abc123");
        assert_eq!(id.as_str(), "abc123");
        assert_eq!(id.into_inner(), "abc123");
    }

    #[test]
    fn test_serde_transparent() {
        let id = RecordId::parse("abc123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc123\"");
    }
}
