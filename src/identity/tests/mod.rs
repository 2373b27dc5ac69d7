//! Unit tests for the identity context.


use crate::identity::{
    domain::{CredentialHash, Password},
    ports::{CredentialHashError, CredentialHasher},
};

/// Fast reversible hasher for service tests.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FakeHasher;

impl CredentialHasher for FakeHasher {
    fn hash(&self, password: &Password) -> Result<CredentialHash, CredentialHashError> {
        Ok(CredentialHash::from_encoded(format!(
            "fake:{}",
            password.expose()
        )))
    }

    fn verify(&self, password: &Password, hash: &CredentialHash) -> bool {
        hash.as_str()
            .strip_prefix("fake:")
            .is_some_and(|stored| stored == password.expose())
    }
}
