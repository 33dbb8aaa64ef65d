//! Repository port for user persistence and lookup.

use crate::identity::domain::{ExternalIdentity, User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateUser`] when the user ID already
    /// exists or [`UserRepositoryError::DuplicateExternalIdentity`] when the
    /// external identity already maps to a user.
    async fn store(&self, user: &User) -> UserRepositoryResult<()>;

    /// Persists changes to an existing user (role, profile, timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist.
    async fn update(&self, user: &User) -> UserRepositoryResult<()>;

    /// Finds a user by internal identifier.
    ///
    /// Returns `None` when the user does not exist.
    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;

    /// Finds a user by external identity reference.
    ///
    /// Returns `None` when no user is provisioned for the reference.
    async fn find_by_external(
        &self,
        external: &ExternalIdentity,
    ) -> UserRepositoryResult<Option<User>>;

    /// Returns all stored users.
    async fn list_all(&self) -> UserRepositoryResult<Vec<User>>;

    /// Returns `true` when a user with the given identifier exists.
    async fn exists(&self, id: UserId) -> UserRepositoryResult<bool>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// A user with the same identifier already exists.
    #[error("duplicate user identifier: {0}")]
    DuplicateUser(UserId),

    /// A user for the external identity already exists.
    #[error("duplicate external identity: {0}")]
    DuplicateExternalIdentity(ExternalIdentity),

    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
