//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Longest address accepted, per RFC 5321.
const MAX_LENGTH: usize = 254;

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email is longer than {MAX_LENGTH} characters")]
    TooLong,
    #[error("email must contain an @ separating the mailbox and domain")]
    MissingAtSymbol,
    #[error("email has no mailbox before the @")]
    EmptyLocalPart,
    #[error("email has no domain after the @")]
    EmptyDomain,
}

/// A structurally valid email address.
///
/// The backend carries emails as plain strings; this type parses them once
/// at the boundary so the rest of the workspace never passes an obviously
/// malformed address around. Validation is structural only (a non-empty
/// mailbox, an @, a non-empty domain), not a deliverability check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse an address, rejecting empty, oversized, or @-less input.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] naming the first structural problem found.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > MAX_LENGTH {
            return Err(EmailError::TooLong);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::MissingAtSymbol)?;
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if domain.is_empty() {
            return Err(EmailError::EmptyDomain);
        }

        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_ordinary_addresses() {
        for ok in [
            "reader@example.com",
            "first.last@example.co.uk",
            "reader+folio@mail.example",
            "a@b",
        ] {
            assert!(Email::parse(ok).is_ok(), "{ok} should parse");
        }
    }

    #[test]
    fn test_parse_names_the_problem() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("reader.example"), Err(EmailError::MissingAtSymbol));
        assert_eq!(Email::parse("@example.com"), Err(EmailError::EmptyLocalPart));
        assert_eq!(Email::parse("reader@"), Err(EmailError::EmptyDomain));

        let oversized = format!("{}@example.com", "x".repeat(250));
        assert_eq!(Email::parse(&oversized), Err(EmailError::TooLong));
    }

    #[test]
    fn test_only_the_first_at_splits() {
        // "a@@b": local "a", domain "@b". Structurally fine by our rules.
        assert!(Email::parse("a@@b").is_ok());
    }

    #[test]
    fn test_display_and_from_str() {
        let email: Email = "reader@example.com".parse().unwrap();
        assert_eq!(email.to_string(), "reader@example.com");
        assert_eq!(email.as_str(), "reader@example.com");
    }

    #[test]
    fn test_serde_is_transparent() {
        let email = Email::parse("reader@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, r#""reader@example.com""#);
        assert_eq!(serde_json::from_str::<Email>(&json).unwrap(), email);
    }
}
