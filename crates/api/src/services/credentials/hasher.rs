//! Argon2id credential hashing.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use unicode_normalization::UnicodeNormalization;

use super::error::CredentialError;
use crate::models::admin_user::PasswordDigest;

/// Hashes and verifies admin passwords.
///
/// Digests are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`)
/// with a fresh random salt per call. Verification reads the algorithm,
/// parameters and salt back out of the digest, so digests produced with
/// different cost settings remain verifiable.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Hasher with the Argon2id defaults recommended for credential storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hasher with explicit cost parameters.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Hash` if the parameters are out of range.
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, CredentialError> {
        let params =
            Params::new(m_cost, t_cost, p_cost, None).map_err(|_| CredentialError::Hash)?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password into a self-salted digest.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Hash` if Argon2 fails.
    pub fn hash(&self, plaintext: &str) -> Result<PasswordDigest, CredentialError> {
        let normalized: String = plaintext.nfc().collect();
        let salt = SaltString::generate(&mut OsRng);

        let phc = self
            .argon2
            .hash_password(normalized.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| CredentialError::Hash)?;

        PasswordDigest::new(phc).ok_or(CredentialError::Hash)
    }

    /// Check a plaintext attempt against a stored digest.
    ///
    /// A wrong password yields `Ok(false)`; it is never an error.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Corrupt` if the digest cannot be parsed or
    /// names parameters Argon2 cannot use.
    pub fn verify(&self, plaintext: &str, digest: &PasswordDigest) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(digest.expose())
            .map_err(|e| CredentialError::Corrupt(format!("unparseable digest: {e}")))?;
        let normalized: String = plaintext.nfc().collect();

        match self.argon2.verify_password(normalized.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CredentialError::Corrupt(format!(
                "digest cannot be verified: {e}"
            ))),
        }
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}
