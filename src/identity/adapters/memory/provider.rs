//! Recording in-memory identity provider for role sync tests.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{ExternalIdentity, Role},
    ports::{IdentityProvider, IdentityProviderError, IdentityProviderResult},
};

/// In-memory identity provider that records propagated role claims.
///
/// Individual subjects can be scripted to fail with
/// [`RecordingIdentityProvider::fail_subject`] to exercise the batch's
/// partial-failure path.
#[derive(Debug, Clone, Default)]
pub struct RecordingIdentityProvider {
    claims: Arc<RwLock<Vec<(ExternalIdentity, Role)>>>,
    failing: Arc<RwLock<HashSet<ExternalIdentity>>>,
}

impl RecordingIdentityProvider {
    /// Creates a provider that accepts every propagation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts propagation failure for one subject.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityProviderError`] when the scripting lock is poisoned.
    pub fn fail_subject(&self, external: ExternalIdentity) -> IdentityProviderResult<()> {
        let mut failing = self
            .failing
            .write()
            .map_err(|err| IdentityProviderError::provider(std::io::Error::other(err.to_string())))?;
        failing.insert(external);
        Ok(())
    }

    /// Returns every claim propagated so far.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityProviderError`] when the recording lock is poisoned.
    pub fn claims(&self) -> IdentityProviderResult<Vec<(ExternalIdentity, Role)>> {
        let claims = self
            .claims
            .read()
            .map_err(|err| IdentityProviderError::provider(std::io::Error::other(err.to_string())))?;
        Ok(claims.clone())
    }
}

#[async_trait]
impl IdentityProvider for RecordingIdentityProvider {
    async fn set_role_claim(
        &self,
        external: &ExternalIdentity,
        role: Role,
    ) -> IdentityProviderResult<()> {
        let is_failing = {
            let failing = self.failing.read().map_err(|err| {
                IdentityProviderError::provider(std::io::Error::other(err.to_string()))
            })?;
            failing.contains(external)
        };
        if is_failing {
            return Err(IdentityProviderError::UnknownSubject(external.clone()));
        }

        let mut claims = self
            .claims
            .write()
            .map_err(|err| IdentityProviderError::provider(std::io::Error::other(err.to_string())))?;
        claims.push((external.clone(), role));
        Ok(())
    }
}
