//! Account email addresses.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Why a string was rejected as an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email is required")]
    Empty,
    #[error("email is longer than {max} characters")]
    TooLong { max: usize },
    #[error("email contains whitespace")]
    Whitespace,
    #[error("email needs exactly one '@'")]
    AtSymbol,
    #[error("email is missing the part before '@'")]
    EmptyLocalPart,
    #[error("email is missing the domain after '@'")]
    EmptyDomain,
}

/// The login identifier of a storefront account.
///
/// Only the shape is checked (one `@`, something on each side, no
/// whitespace). Two addresses are the same account only if they are
/// byte-for-byte equal, so `A@x.com` and `a@x.com` can both register.
///
/// Deserialization runs the same checks, so a malformed address in stored
/// data is reported rather than silently accepted.
///
/// ```
/// use softbenny_core::Email;
///
/// assert_eq!(Email::parse("a@x.com").unwrap().as_str(), "a@x.com");
/// assert!(Email::parse("a@b@c").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Longest accepted address, per RFC 5321.
    pub const MAX_LENGTH: usize = 254;

    /// Validate `s` as an email address.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmailError`] that applies.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        match s.split_once('@') {
            _ if s.is_empty() => Err(EmailError::Empty),
            _ if s.len() > Self::MAX_LENGTH => Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            }),
            _ if s.contains(char::is_whitespace) => Err(EmailError::Whitespace),
            None => Err(EmailError::AtSymbol),
            Some((_, domain)) if domain.contains('@') => Err(EmailError::AtSymbol),
            Some(("", _)) => Err(EmailError::EmptyLocalPart),
            Some((_, "")) => Err(EmailError::EmptyDomain),
            Some(_) => Ok(Self(s.to_owned())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Email {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_shapes() {
        for s in ["a@x.com", "user.name+tag@domain.co.uk", "x@localhost"] {
            assert_eq!(Email::parse(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn test_rejects_with_reason() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("no-at"), Err(EmailError::AtSymbol));
        assert_eq!(Email::parse("a@b@c.com"), Err(EmailError::AtSymbol));
        assert_eq!(Email::parse("@x.com"), Err(EmailError::EmptyLocalPart));
        assert_eq!(Email::parse("a@"), Err(EmailError::EmptyDomain));
        assert_eq!(Email::parse("a b@x.com"), Err(EmailError::Whitespace));
        assert_eq!(
            Email::parse(&format!("{}@x.com", "a".repeat(250))),
            Err(EmailError::TooLong { max: 254 })
        );
    }

    #[test]
    fn test_accounts_differ_by_case() {
        let lower = Email::parse("a@x.com").unwrap();
        assert_ne!(lower, Email::parse("A@x.com").unwrap());
        assert!(lower == *"a@x.com");
    }

    #[test]
    fn test_serde_validates() {
        let email: Email = serde_json::from_str("\"a@x.com\"").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"a@x.com\"");
        assert!(serde_json::from_str::<Email>("\"nope\"").is_err());
    }
}
