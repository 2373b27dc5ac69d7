//! Employee aggregate and its update parameter objects.

use super::{
    CredentialHash, EmailAddress, EmployeeCode, EmployeeId, IdentityDomainError, ManagerId,
    MobileNumber, PersonName,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Employee record owned by exactly one manager.
///
/// There is deliberately no mutator for `owner_id`: an employee cannot be
/// transferred between managers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    id: EmployeeId,
    code: EmployeeCode,
    owner_id: ManagerId,
    name: PersonName,
    email: EmailAddress,
    job_title: String,
    mobile: Option<MobileNumber>,
    address: Option<String>,
    salary: Option<u64>,
    has_login_access: bool,
    #[serde(skip_serializing, default)]
    credential: Option<CredentialHash>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for hiring a new employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    /// Owning manager.
    pub owner_id: ManagerId,
    /// Display name.
    pub name: PersonName,
    /// Unique email.
    pub email: EmailAddress,
    /// Role or title within the team.
    pub job_title: String,
    /// Optional phone number.
    pub mobile: Option<MobileNumber>,
    /// Optional postal address.
    pub address: Option<String>,
    /// Optional salary in minor currency units.
    pub salary: Option<u64>,
    /// Whether the employee may authenticate.
    pub has_login_access: bool,
    /// Credential required when `has_login_access` is set.
    pub credential: Option<CredentialHash>,
}

/// Fields the owning manager may change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeChanges {
    /// New display name.
    pub name: Option<PersonName>,
    /// New unique email.
    pub email: Option<EmailAddress>,
    /// New role or title.
    pub job_title: Option<String>,
    /// New phone number.
    pub mobile: Option<MobileNumber>,
    /// New postal address.
    pub address: Option<String>,
    /// New salary in minor currency units.
    pub salary: Option<u64>,
    /// New login access flag.
    pub has_login_access: Option<bool>,
    /// New credential.
    pub credential: Option<CredentialHash>,
}

/// Self-service fields an employee may change on its own record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    /// New display name.
    pub name: Option<PersonName>,
    /// New phone number.
    pub mobile: Option<MobileNumber>,
    /// New postal address.
    pub address: Option<String>,
}

/// Parameter object for reconstructing a persisted employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedEmployeeData {
    /// Persisted employee identifier.
    pub id: EmployeeId,
    /// Persisted human-readable code.
    pub code: EmployeeCode,
    /// Persisted owning manager.
    pub owner_id: ManagerId,
    /// Persisted display name.
    pub name: PersonName,
    /// Persisted unique email.
    pub email: EmailAddress,
    /// Persisted role or title.
    pub job_title: String,
    /// Persisted phone number.
    pub mobile: Option<MobileNumber>,
    /// Persisted postal address.
    pub address: Option<String>,
    /// Persisted salary.
    pub salary: Option<u64>,
    /// Persisted login access flag.
    pub has_login_access: bool,
    /// Persisted credential hash.
    pub credential: Option<CredentialHash>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Creates a new employee owned by `params.owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyJobTitle`] for a blank title or
    /// [`IdentityDomainError::LoginAccessRequiresCredential`] when login
    /// access is granted without a credential.
    pub fn hire(params: NewEmployee, clock: &impl Clock) -> Result<Self, IdentityDomainError> {
        let job_title = normalize_job_title(params.job_title)?;
        if params.has_login_access && params.credential.is_none() {
            return Err(IdentityDomainError::LoginAccessRequiresCredential);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: EmployeeId::new(),
            code: EmployeeCode::generate(),
            owner_id: params.owner_id,
            name: params.name,
            email: params.email,
            job_title,
            mobile: params.mobile,
            address: normalize_optional(params.address),
            salary: params.salary,
            has_login_access: params.has_login_access,
            credential: params.credential,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs an employee from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedEmployeeData) -> Self {
        Self {
            id: data.id,
            code: data.code,
            owner_id: data.owner_id,
            name: data.name,
            email: data.email,
            job_title: data.job_title,
            mobile: data.mobile,
            address: data.address,
            salary: data.salary,
            has_login_access: data.has_login_access,
            credential: data.credential,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the employee identifier.
    #[must_use]
    pub const fn id(&self) -> EmployeeId {
        self.id
    }

    /// Returns the human-readable code.
    #[must_use]
    pub const fn code(&self) -> &EmployeeCode {
        &self.code
    }

    /// Returns the owning manager.
    #[must_use]
    pub const fn owner_id(&self) -> ManagerId {
        self.owner_id
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

    /// Returns the role or title.
    #[must_use]
    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    /// Returns the phone number, if any.
    #[must_use]
    pub const fn mobile(&self) -> Option<&MobileNumber> {
        self.mobile.as_ref()
    }

    /// Returns the postal address, if any.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Returns the salary in minor currency units, if any.
    #[must_use]
    pub const fn salary(&self) -> Option<u64> {
        self.salary
    }

    /// Returns whether the employee may authenticate.
    #[must_use]
    pub const fn has_login_access(&self) -> bool {
        self.has_login_access
    }

    /// Returns the stored credential hash, if any.
    #[must_use]
    pub const fn credential(&self) -> Option<&CredentialHash> {
        self.credential.as_ref()
    }

    /// Returns `true` when login access is granted and a credential exists.
    #[must_use]
    pub const fn can_authenticate(&self) -> bool {
        self.has_login_access && self.credential.is_some()
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

    /// Applies manager-side changes.
    ///
    /// The record is left untouched when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyJobTitle`] for a blank title or
    /// [`IdentityDomainError::LoginAccessRequiresCredential`] when the
    /// result would grant login access without a credential.
    pub fn apply_changes(
        &mut self,
        changes: EmployeeChanges,
        clock: &impl Clock,
    ) -> Result<(), IdentityDomainError> {
        let job_title = changes.job_title.map(normalize_job_title).transpose()?;
        let has_login_access = changes.has_login_access.unwrap_or(self.has_login_access);
        let has_credential = changes.credential.is_some() || self.credential.is_some();
        if has_login_access && !has_credential {
            return Err(IdentityDomainError::LoginAccessRequiresCredential);
        }

        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(title) = job_title {
            self.job_title = title;
        }
        if let Some(mobile) = changes.mobile {
            self.mobile = Some(mobile);
        }
        if let Some(address) = changes.address {
            self.address = normalize_optional(Some(address));
        }
        if let Some(salary) = changes.salary {
            self.salary = Some(salary);
        }
        if let Some(credential) = changes.credential {
            self.credential = Some(credential);
        }
        self.has_login_access = has_login_access;
        self.touch(clock);
        Ok(())
    }

    /// Applies self-service profile changes.
    pub fn apply_profile_changes(&mut self, changes: ProfileChanges, clock: &impl Clock) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(mobile) = changes.mobile {
            self.mobile = Some(mobile);
        }
        if let Some(address) = changes.address {
            self.address = normalize_optional(Some(address));
        }
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn normalize_job_title(value: String) -> Result<String, IdentityDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IdentityDomainError::EmptyJobTitle);
    }
    Ok(trimmed.to_owned())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}
