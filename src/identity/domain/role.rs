//! Manager account roles.

use super::ParseManagerRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role held by a manager account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerRole {
    /// Administrator. Holds manager rights within its own ownership scope.
    Admin,
    /// Regular manager.
    #[default]
    Manager,
}

impl ManagerRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
        }
    }
}

impl fmt::Display for ManagerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ManagerRole {
    type Error = ParseManagerRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            _ => Err(ParseManagerRoleError(value.to_owned())),
        }
    }
}
