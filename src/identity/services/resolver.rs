//! Identity resolution: map a verified external subject to an internal user.

use crate::error::{Classify, ErrorKind};
use crate::identity::{
    domain::{ExternalIdentity, IdentityDomainError, User, UserProfile},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload carrying the verified subject and its profile claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveIdentityRequest {
    external: String,
    name: String,
    email: String,
    image: Option<String>,
}

impl ResolveIdentityRequest {
    /// Creates a request with required claim fields.
    #[must_use]
    pub fn new(
        external: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            external: external.into(),
            name: name.into(),
            email: email.into(),
            image: None,
        }
    }

    /// Sets the profile image claim.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Service-level errors for identity resolution.
#[derive(Debug, Error)]
pub enum IdentityResolutionError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

impl Classify for IdentityResolutionError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(err) => match err {
                UserRepositoryError::NotFound(_) => ErrorKind::NotFound,
                UserRepositoryError::DuplicateUser(_)
                | UserRepositoryError::DuplicateExternalIdentity(_) => ErrorKind::Conflict,
                UserRepositoryError::Persistence(_) => ErrorKind::Internal,
            },
        }
    }
}

/// Result type for identity resolution operations.
pub type IdentityResolutionResult<T> = Result<T, IdentityResolutionError>;

/// Identity resolution service.
///
/// Performs the lazy upsert keyed by external identity: first contact
/// provisions a `Client` user from the claims, repeat contact refreshes the
/// profile snapshot. The stored role is never touched here.
#[derive(Clone)]
pub struct IdentityService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> IdentityService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new identity service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Resolves a verified external subject to its internal user record,
    /// provisioning it on first contact.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityResolutionError`] when the claims fail validation or
    /// persistence fails. An empty subject classifies as unauthenticated.
    pub async fn resolve(&self, request: ResolveIdentityRequest) -> IdentityResolutionResult<User> {
        let ResolveIdentityRequest {
            external,
            name,
            email,
            image,
        } = request;

        let subject = ExternalIdentity::new(external)?;
        let mut profile = UserProfile::new(name, email)?;
        if let Some(image) = image {
            profile = profile.with_image(image);
        }

        if let Some(user) = self.repository.find_by_external(&subject).await? {
            return self.refresh(user, profile).await;
        }

        let user = User::provision(subject.clone(), profile.clone(), &*self.clock);
        match self.repository.store(&user).await {
            Ok(()) => Ok(user),
            // Lost a first-contact race: another request provisioned the
            // subject between lookup and store. Fall back to refreshing the
            // winner's record.
            Err(UserRepositoryError::DuplicateExternalIdentity(_)) => {
                let existing = self
                    .repository
                    .find_by_external(&subject)
                    .await?
                    .ok_or(UserRepositoryError::DuplicateExternalIdentity(subject))?;
                self.refresh(existing, profile).await
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Finds a user by external subject without provisioning.
    ///
    /// Returns `Ok(None)` when no user exists for the subject.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityResolutionError`] when the subject is empty or the
    /// lookup fails.
    pub async fn find_by_external(
        &self,
        external: &str,
    ) -> IdentityResolutionResult<Option<User>> {
        let subject = ExternalIdentity::new(external)?;
        Ok(self.repository.find_by_external(&subject).await?)
    }

    async fn refresh(
        &self,
        mut user: User,
        profile: UserProfile,
    ) -> IdentityResolutionResult<User> {
        if user.profile() != &profile {
            user.refresh_profile(profile, &*self.clock);
            self.repository.update(&user).await?;
        }
        Ok(user)
    }
}
