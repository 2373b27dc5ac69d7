//! Credential values.

use super::IdentityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum accepted length for a plaintext password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Plaintext password held only long enough to hash or verify it.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Creates a password satisfying the length policy.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::PasswordTooShort`] when the value has
    /// fewer than [`MIN_PASSWORD_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        if raw.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(IdentityDomainError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        Ok(Self(raw))
    }

    /// Wraps a password submitted at login without applying the length
    /// policy, which only governs newly chosen passwords.
    #[must_use]
    pub fn submitted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Exposes the plaintext for hashing.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Opaque stored credential produced by a credential hasher.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wraps an encoded hash string.
    #[must_use]
    pub fn from_encoded(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the encoded hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(***)")
    }
}
