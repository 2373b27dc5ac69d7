//! Adapter implementations for the identity store.

pub mod memory;
pub mod password_hasher;
pub mod postgres;

pub use password_hasher::Argon2CredentialHasher;
