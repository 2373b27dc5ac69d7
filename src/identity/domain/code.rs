//! Human-readable employee codes.

use super::IdentityDomainError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const PREFIX: &str = "EMP-";
const SUFFIX_LENGTH: usize = 6;
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generated employee identifier shown to people, e.g. `EMP-7QK2MZ`.
///
/// The alphabet omits `0`, `O`, `1` and `I` so codes survive being read
/// aloud or copied by hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeCode(String);

impl EmployeeCode {
    /// Generates a fresh random code.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LENGTH)
            .filter_map(|_| ALPHABET.get(rng.gen_range(0..ALPHABET.len())))
            .map(|byte| char::from(*byte))
            .collect();
        Self(format!("{PREFIX}{suffix}"))
    }

    /// Parses a persisted code.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::InvalidEmployeeCode`] when the value
    /// does not match `EMP-` followed by six code characters.
    pub fn parse(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let is_valid = raw.strip_prefix(PREFIX).is_some_and(|suffix| {
            suffix.len() == SUFFIX_LENGTH && suffix.bytes().all(|b| ALPHABET.contains(&b))
        });
        if !is_valid {
            return Err(IdentityDomainError::InvalidEmployeeCode(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the code as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
