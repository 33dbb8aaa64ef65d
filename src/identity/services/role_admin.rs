//! Role administration: manager-gated role changes and provider
//! reconciliation.

use crate::access::{AccessError, Action, Actor, authorize};
use crate::error::{Classify, ErrorKind};
use crate::identity::{
    domain::{ParseRoleError, Role, User, UserId},
    ports::{IdentityProvider, UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Per-user failure recorded by the role sync batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSyncFailure {
    /// User whose role could not be propagated.
    pub user_id: UserId,
    /// Human-readable failure description.
    pub reason: String,
}

/// Outcome of the role sync batch.
///
/// Propagation is per-user: one user's failure is recorded and the batch
/// continues with the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSyncReport {
    /// Number of users whose role reached the provider.
    pub processed: usize,
    /// Users whose propagation failed.
    pub failures: Vec<RoleSyncFailure>,
}

/// Service-level errors for role administration.
#[derive(Debug, Error)]
pub enum RoleAdminError {
    /// The policy denied the actor.
    #[error(transparent)]
    Access(#[from] AccessError),
    /// The role string could not be parsed.
    #[error(transparent)]
    ParseRole(#[from] ParseRoleError),
    /// The target user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

impl Classify for RoleAdminError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Access(err) => err.kind(),
            Self::ParseRole(err) => err.kind(),
            Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::Repository(err) => match err {
                UserRepositoryError::NotFound(_) => ErrorKind::NotFound,
                UserRepositoryError::DuplicateUser(_)
                | UserRepositoryError::DuplicateExternalIdentity(_) => ErrorKind::Conflict,
                UserRepositoryError::Persistence(_) => ErrorKind::Internal,
            },
        }
    }
}

/// Result type for role administration operations.
pub type RoleAdminResult<T> = Result<T, RoleAdminError>;

/// Role administration service.
#[derive(Clone)]
pub struct RoleAdminService<R, P, C>
where
    R: UserRepository,
    P: IdentityProvider,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    provider: Arc<P>,
    clock: Arc<C>,
}

impl<R, P, C> RoleAdminService<R, P, C>
where
    R: UserRepository,
    P: IdentityProvider,
    C: Clock + Send + Sync,
{
    /// Creates a new role administration service.
    #[must_use]
    pub const fn new(repository: Arc<R>, provider: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            repository,
            provider,
            clock,
        }
    }

    /// Changes a user's role on behalf of a manager.
    ///
    /// The raw role string is normalized case-insensitively and validated
    /// against the closed role set before any authorization or storage work,
    /// so an unknown role never reaches the store.
    ///
    /// # Errors
    ///
    /// Returns [`RoleAdminError`] when the role string is unknown, the actor
    /// is not a manager, or the target user does not exist.
    pub async fn set_role(
        &self,
        actor: &Actor,
        target: UserId,
        role_input: &str,
    ) -> RoleAdminResult<User> {
        let role = Role::try_from(role_input)?;
        authorize(actor, &Action::ChangeRole)?;

        let mut user = self
            .repository
            .find_by_id(target)
            .await?
            .ok_or(RoleAdminError::UserNotFound(target))?;
        user.change_role(role, &*self.clock);
        self.repository.update(&user).await?;
        Ok(user)
    }

    /// Propagates every stored role into the identity provider's claims.
    ///
    /// Manager-only batch with partial-failure semantics: a user whose
    /// propagation fails is logged and recorded, and the batch moves on.
    ///
    /// # Errors
    ///
    /// Returns [`RoleAdminError`] when the actor is not a manager or the user
    /// listing itself fails.
    pub async fn sync_external_roles(&self, actor: &Actor) -> RoleAdminResult<RoleSyncReport> {
        authorize(actor, &Action::ChangeRole)?;

        let mut report = RoleSyncReport::default();
        for user in self.repository.list_all().await? {
            match self
                .provider
                .set_role_claim(user.external(), user.role())
                .await
            {
                Ok(()) => report.processed += 1,
                Err(err) => {
                    tracing::warn!(
                        user = %user.id(),
                        error = %err,
                        "role propagation failed, continuing batch"
                    );
                    report.failures.push(RoleSyncFailure {
                        user_id: user.id(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            processed = report.processed,
            failed = report.failures.len(),
            "role sync batch finished"
        );
        Ok(report)
    }
}
