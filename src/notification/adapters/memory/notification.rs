//! In-memory repository for notification tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::domain::UserId;
use crate::notification::{
    domain::{Notification, NotificationId},
    ports::{NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult},
};

/// Thread-safe in-memory notification repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationRepository {
    state: Arc<RwLock<InMemoryNotificationState>>,
}

#[derive(Debug, Default)]
struct InMemoryNotificationState {
    notifications: HashMap<NotificationId, Notification>,
    recipient_index: HashMap<UserId, Vec<NotificationId>>,
}

impl InMemoryNotificationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn store(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            NotificationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.notifications.contains_key(&notification.id()) {
            return Err(NotificationRepositoryError::DuplicateNotification(
                notification.id(),
            ));
        }

        state
            .recipient_index
            .entry(notification.recipient())
            .or_default()
            .push(notification.id());
        state
            .notifications
            .insert(notification.id(), notification.clone());
        Ok(())
    }

    async fn update(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            NotificationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.notifications.contains_key(&notification.id()) {
            return Err(NotificationRepositoryError::NotFound(notification.id()));
        }
        state
            .notifications
            .insert(notification.id(), notification.clone());
        Ok(())
    }

    async fn find_owned(
        &self,
        id: NotificationId,
        recipient: UserId,
    ) -> NotificationRepositoryResult<Option<Notification>> {
        let state = self.state.read().map_err(|err| {
            NotificationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let notification = state
            .notifications
            .get(&id)
            .filter(|notification| notification.recipient() == recipient)
            .cloned();
        Ok(notification)
    }

    async fn list_for_recipient(
        &self,
        recipient: UserId,
    ) -> NotificationRepositoryResult<Vec<Notification>> {
        let state = self.state.read().map_err(|err| {
            NotificationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut notifications: Vec<Notification> = state
            .recipient_index
            .get(&recipient)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.notifications.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        notifications.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(notifications)
    }
}
