//! User aggregate root and profile claims.

use super::{IdentityDomainError, Role, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated reference to the external identity provider's subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalIdentity(String);

impl ExternalIdentity {
    /// Creates a validated external identity reference.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::MissingExternalIdentity`] when the value
    /// is empty after trimming; an absent subject means the request carries no
    /// verified identity.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(IdentityDomainError::MissingExternalIdentity);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the reference as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ExternalIdentity {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ExternalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Profile claims snapshot supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    name: String,
    email: String,
    image: Option<String>,
}

impl UserProfile {
    /// Creates a validated profile snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyDisplayName`] when the name is
    /// blank, or [`IdentityDomainError::InvalidEmail`] when the email lacks a
    /// local part or domain.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, IdentityDomainError> {
        let raw_name = name.into();
        let trimmed_name = raw_name.trim();
        if trimmed_name.is_empty() {
            return Err(IdentityDomainError::EmptyDisplayName);
        }

        let raw_email = email.into();
        let trimmed_email = raw_email.trim();
        let mut parts = trimmed_email.split('@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() || parts.next().is_some() {
            return Err(IdentityDomainError::InvalidEmail(raw_email));
        }

        Ok(Self {
            name: trimmed_name.to_owned(),
            email: trimmed_email.to_owned(),
            image: None,
        })
    }

    /// Sets the profile image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the profile image URL, if any.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    external: ExternalIdentity,
    role: Role,
    profile: UserProfile,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted external identity reference.
    pub external: ExternalIdentity,
    /// Persisted role.
    pub role: Role,
    /// Persisted profile snapshot.
    pub profile: UserProfile,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user provisioned on first contact.
    ///
    /// First-contact users always start with [`Role::Client`]; role changes
    /// flow exclusively through role administration.
    #[must_use]
    pub fn provision(external: ExternalIdentity, profile: UserProfile, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: UserId::new(),
            external,
            role: Role::Client,
            profile,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            external: data.external,
            role: data.role,
            profile: data.profile,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the external identity reference.
    #[must_use]
    pub const fn external(&self) -> &ExternalIdentity {
        &self.external
    }

    /// Returns the user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the profile snapshot.
    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the user's role.
    pub fn change_role(&mut self, role: Role, clock: &impl Clock) {
        self.role = role;
        self.touch(clock);
    }

    /// Replaces the profile snapshot with fresh provider claims.
    pub fn refresh_profile(&mut self, profile: UserProfile, clock: &impl Clock) {
        self.profile = profile;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
