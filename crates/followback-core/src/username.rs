//! Instagram username normalization and validation.
//!
//! Every inbound username passes through [`Username::parse`] exactly once
//! before it reaches the cache or any upstream source. Downstream code takes
//! `&Username`, so an un-normalized handle cannot reach an adapter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Instagram's own handle length limit.
pub const MAX_USERNAME_LEN: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("Instagram username is required")]
    Empty,

    #[error("invalid Instagram username format: only letters, digits, '.' and '_' are allowed")]
    InvalidCharacters,

    #[error("Instagram username must be between 1 and {MAX_USERNAME_LEN} characters (got {len})")]
    TooLong { len: usize },
}

/// Canonical form of a user-supplied handle: every `@` removed, surrounding
/// whitespace trimmed, lowercased.
///
/// Idempotent: `normalize_username(&normalize_username(s)) == normalize_username(s)`.
#[must_use]
pub fn normalize_username(raw: &str) -> String {
    raw.replace('@', "").trim().to_lowercase()
}

/// A normalized, validated Instagram username.
///
/// Deserializing goes through [`Username::parse`] as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Normalizes `raw` and validates the result.
    ///
    /// # Errors
    ///
    /// - [`UsernameError::Empty`] if nothing remains after normalization.
    /// - [`UsernameError::InvalidCharacters`] if any character falls outside `[A-Za-z0-9._]`.
    /// - [`UsernameError::TooLong`] if longer than [`MAX_USERNAME_LEN`].
    pub fn parse(raw: &str) -> Result<Self, UsernameError> {
        let normalized = normalize_username(raw);
        if normalized.is_empty() {
            return Err(UsernameError::Empty);
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
        {
            return Err(UsernameError::InvalidCharacters);
        }
        let len = normalized.len();
        if len > MAX_USERNAME_LEN {
            return Err(UsernameError::TooLong { len });
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_at_trims_and_lowercases() {
        assert_eq!(normalize_username("  @Test_User "), "test_user");
        assert_eq!(normalize_username("@@Nasa"), "nasa");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in [
            "Test_User",
            "  @Test_User ",
            "@ spaced",
            "@@double@",
            "MiXeD.Case_99",
            "",
            "   ",
            "bad user!",
        ] {
            let once = normalize_username(raw);
            assert_eq!(normalize_username(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn parse_accepts_valid_handle() {
        let username = Username::parse("@Test_User").unwrap();
        assert_eq!(username.as_str(), "test_user");
        assert_eq!(username.to_string(), "test_user");
    }

    #[test]
    fn parse_accepts_dots_and_digits() {
        assert!(Username::parse("john.doe_42").is_ok());
    }

    #[test]
    fn parse_rejects_empty_after_trim() {
        assert_eq!(Username::parse("   ").unwrap_err(), UsernameError::Empty);
        assert_eq!(Username::parse("@").unwrap_err(), UsernameError::Empty);
    }

    #[test]
    fn parse_rejects_space_and_punctuation() {
        assert_eq!(
            Username::parse("bad user!").unwrap_err(),
            UsernameError::InvalidCharacters
        );
        assert_eq!(
            Username::parse("naïve").unwrap_err(),
            UsernameError::InvalidCharacters
        );
    }

    #[test]
    fn parse_enforces_length_limit() {
        let thirty = "a".repeat(30);
        assert!(Username::parse(&thirty).is_ok());

        let thirty_one = "a".repeat(31);
        assert_eq!(
            Username::parse(&thirty_one).unwrap_err(),
            UsernameError::TooLong { len: 31 }
        );
    }

    #[test]
    fn username_serializes_as_plain_string() {
        let username = Username::parse("nasa").unwrap();
        assert_eq!(serde_json::to_string(&username).unwrap(), "\"nasa\"");
    }

    #[test]
    fn username_deserializes_through_parse() {
        let username: Username = serde_json::from_str("\"@NASA\"").unwrap();
        assert_eq!(username.as_str(), "nasa");

        let err = serde_json::from_str::<Username>("\"bad user!\"").unwrap_err();
        assert!(err.to_string().contains("invalid Instagram username"), "{err}");
    }
}
