//! Recording in-memory channel for dispatcher tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::notification::ports::{
    PushMessage, RealtimeChannel, RealtimeChannelError, RealtimeChannelResult,
};

/// In-memory channel that records published messages.
///
/// Failure can be scripted with [`InMemoryRealtimeChannel::set_failing`] to
/// exercise the dispatcher's drop-on-failure path.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRealtimeChannel {
    published: Arc<RwLock<Vec<(String, PushMessage)>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryRealtimeChannel {
    /// Creates a channel that accepts every publish.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts whether subsequent publishes fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns every message published so far with its channel name.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeChannelError`] when the recording lock is poisoned.
    pub fn published(&self) -> RealtimeChannelResult<Vec<(String, PushMessage)>> {
        let published = self
            .published
            .read()
            .map_err(|err| RealtimeChannelError::transport(std::io::Error::other(err.to_string())))?;
        Ok(published.clone())
    }
}

#[async_trait]
impl RealtimeChannel for InMemoryRealtimeChannel {
    async fn publish(&self, channel: &str, message: &PushMessage) -> RealtimeChannelResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RealtimeChannelError::transport(std::io::Error::other(
                "scripted channel failure",
            )));
        }
        let mut published = self
            .published
            .write()
            .map_err(|err| RealtimeChannelError::transport(std::io::Error::other(err.to_string())))?;
        published.push((channel.to_owned(), message.clone()));
        Ok(())
    }
}
