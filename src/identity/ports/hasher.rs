//! Credential hashing port.

use crate::identity::domain::{CredentialHash, Password};
use thiserror::Error;

/// Hashes and verifies passwords. The algorithm is an adapter concern.
pub trait CredentialHasher: Send + Sync {
    /// Produces a salted hash for storage.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialHashError`] when the underlying hasher fails.
    fn hash(&self, password: &Password) -> Result<CredentialHash, CredentialHashError>;

    /// Returns `true` when `password` matches `hash`. Malformed hashes never
    /// match.
    fn verify(&self, password: &Password, hash: &CredentialHash) -> bool;
}

/// Error returned when a credential cannot be hashed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("credential hashing failed: {0}")]
pub struct CredentialHashError(pub String);
