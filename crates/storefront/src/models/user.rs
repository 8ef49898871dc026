//! User domain types.
//!
//! [`User`] is the public identity handed to callers and stored as the session
//! pointer. [`UserRecord`] is the persisted account row, which additionally
//! carries the password and never leaves the storage layer.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use softbenny_core::{Email, UserId};

/// A storefront user, without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (unique across accounts).
    pub email: Email,
    /// Display name.
    pub name: String,
}

/// A registered account as persisted under the `users` key.
///
/// The password is stored in plaintext (demo-grade persistence) but is held
/// as a [`SecretString`] in memory so it is redacted from `Debug` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Plaintext password.
    #[serde(serialize_with = "expose", deserialize_with = "conceal")]
    pub password: SecretString,
}

impl UserRecord {
    /// Create a record for a new account with a freshly generated ID.
    #[must_use]
    pub fn new(name: String, email: Email, password: SecretString) -> Self {
        Self {
            id: UserId::generate(),
            name,
            email,
            password,
        }
    }

    /// Whether `email` and `password` both match exactly.
    #[must_use]
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == *email && self.password.expose_secret() == password
    }

    /// The public user, with the password stripped.
    #[must_use]
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn conceal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record() -> UserRecord {
        UserRecord::new(
            "Ana".to_string(),
            Email::parse("a@x.com").unwrap(),
            SecretString::from("hunter22"),
        )
    }

    #[test]
    fn test_matches_requires_exact_pair() {
        let record = record();
        assert!(record.matches("a@x.com", "hunter22"));
        assert!(!record.matches("a@x.com", "hunter2"));
        assert!(!record.matches("A@x.com", "hunter22"));
    }

    #[test]
    fn test_to_user_strips_password() {
        let user = record().to_user();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["name"], "Ana");
    }

    #[test]
    fn test_record_persists_password_but_debug_redacts_it() {
        let record = record();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["password"], "hunter22");

        let back: UserRecord = serde_json::from_value(json).unwrap();
        assert!(back.matches("a@x.com", "hunter22"));

        assert!(!format!("{record:?}").contains("hunter22"));
    }
}
