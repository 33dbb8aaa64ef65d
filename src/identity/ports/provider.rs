//! Port for propagating stored roles into the external identity provider.

use crate::identity::domain::{ExternalIdentity, Role};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity provider operations.
pub type IdentityProviderResult<T> = Result<T, IdentityProviderError>;

/// External identity provider contract.
///
/// The provider is a write-only collaborator from this core's perspective:
/// the boundary hands the core an already-verified external subject, and the
/// core only pushes role claims back during reconciliation.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Writes the stored role into the provider's profile claims for the
    /// given subject.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityProviderError`] when the provider rejects the update
    /// or the subject is unknown to it.
    async fn set_role_claim(
        &self,
        external: &ExternalIdentity,
        role: Role,
    ) -> IdentityProviderResult<()>;
}

/// Errors returned by identity provider implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityProviderError {
    /// The provider has no record of the subject.
    #[error("unknown subject: {0}")]
    UnknownSubject(ExternalIdentity),

    /// Provider-side failure.
    #[error("provider error: {0}")]
    Provider(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityProviderError {
    /// Wraps a provider-side error.
    pub fn provider(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Provider(Arc::new(err))
    }
}
