//! Manager aggregate root.

use super::{CredentialHash, EmailAddress, ManagerId, ManagerRole, PersonName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Manager account. Owns zero or more employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    id: ManagerId,
    name: PersonName,
    email: EmailAddress,
    #[serde(skip_serializing)]
    credential: CredentialHash,
    role: ManagerRole,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedManagerData {
    /// Persisted manager identifier.
    pub id: ManagerId,
    /// Persisted display name.
    pub name: PersonName,
    /// Persisted unique email.
    pub email: EmailAddress,
    /// Persisted credential hash.
    pub credential: CredentialHash,
    /// Persisted role.
    pub role: ManagerRole,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Manager {
    /// Registers a new manager account.
    #[must_use]
    pub fn register(
        name: PersonName,
        email: EmailAddress,
        credential: CredentialHash,
        role: ManagerRole,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ManagerId::new(),
            name,
            email,
            credential,
            role,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a manager from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedManagerData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            email: data.email,
            credential: data.credential,
            role: data.role,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the manager identifier.
    #[must_use]
    pub const fn id(&self) -> ManagerId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &PersonName {
        &self.name
    }

    /// Returns the unique email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the stored credential hash.
    #[must_use]
    pub const fn credential(&self) -> &CredentialHash {
        &self.credential
    }

    /// Returns the account role.
    #[must_use]
    pub const fn role(&self) -> ManagerRole {
        self.role
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the stored credential.
    pub fn change_credential(&mut self, credential: CredentialHash, clock: &impl Clock) {
        self.credential = credential;
        self.updated_at = clock.utc();
    }
}
