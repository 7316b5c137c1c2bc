//! Admin user domain types.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use retro_games_core::{AdminUserId, Username};

/// An admin user (domain type).
///
/// This is the public view of an account: the stored password digest is
/// deliberately not part of it, so listing or serializing admins can never
/// expose credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Login name (unique, case-sensitive).
    pub username: Username,
    /// Given name.
    pub firstname: Option<String>,
    /// Family name.
    pub lastname: Option<String>,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
    /// When the admin was last updated.
    pub updated_at: DateTime<Utc>,
}

impl AdminUser {
    /// First and last name joined with a space, skipping missing parts.
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.firstname.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Fields for a new admin account, minus the credential.
#[derive(Debug, Clone)]
pub struct NewAdminUser {
    /// Login name.
    pub username: Username,
    /// Given name.
    pub firstname: Option<String>,
    /// Family name.
    pub lastname: Option<String>,
}

/// A stored password digest in PHC string format.
///
/// Embeds the algorithm, cost parameters and salt. The value is wrapped in a
/// `SecretString`, so `Debug` output is redacted and the digest never reaches
/// logs.
#[derive(Debug, Clone)]
pub struct PasswordDigest(SecretString);

impl PasswordDigest {
    /// Wrap a digest string produced by the hasher or read from storage.
    ///
    /// Returns `None` for an empty string: an account can never have an
    /// empty digest.
    #[must_use]
    pub fn new(phc: String) -> Option<Self> {
        if phc.is_empty() {
            None
        } else {
            Some(Self(SecretString::from(phc)))
        }
    }

    /// The PHC string, for storage and verification only.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn admin(firstname: Option<&str>, lastname: Option<&str>) -> AdminUser {
        let now = Utc::now();
        AdminUser {
            id: AdminUserId::new(1),
            username: Username::parse("alice123").unwrap(),
            firstname: firstname.map(str::to_owned),
            lastname: lastname.map(str::to_owned),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(admin(Some("Alice"), Some("Liddell")).full_name(), "Alice Liddell");
        assert_eq!(admin(None, Some("Liddell")).full_name(), "Liddell");
        assert_eq!(admin(None, None).full_name(), "");
    }

    #[test]
    fn test_digest_is_redacted_in_debug() {
        let digest = PasswordDigest::new("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned()).unwrap();
        let debug = format!("{digest:?}");
        assert!(!debug.contains("argon2id"));
        assert!(digest.expose().starts_with("$argon2id$"));
    }

    #[test]
    fn test_empty_digest_is_rejected() {
        assert!(PasswordDigest::new(String::new()).is_none());
    }

    #[test]
    fn test_serialized_view_has_no_digest() {
        let json = serde_json::to_value(admin(Some("Alice"), None)).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("username"));
        assert!(!object.keys().any(|key| key.contains("password") || key.contains("digest")));
    }
}
