//! Service tests for the notification dispatcher.

use std::sync::Arc;

use crate::error::{Classify, ErrorKind};
use crate::identity::domain::UserId;
use crate::notification::{
    adapters::memory::{InMemoryNotificationRepository, InMemoryRealtimeChannel},
    domain::{Notification, NotificationId, NotificationKind},
    services::{DispatchError, DispatchRequest, NotificationDispatcher},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestDispatcher = NotificationDispatcher<
    InMemoryNotificationRepository,
    InMemoryRealtimeChannel,
    DefaultClock,
>;

struct Harness {
    channel: Arc<InMemoryRealtimeChannel>,
    dispatcher: TestDispatcher,
}

#[fixture]
fn harness() -> Harness {
    let repository = Arc::new(InMemoryNotificationRepository::new());
    let channel = Arc::new(InMemoryRealtimeChannel::new());
    let dispatcher = NotificationDispatcher::new(
        repository,
        Arc::clone(&channel),
        Arc::new(DefaultClock),
    );
    Harness {
        channel,
        dispatcher,
    }
}

fn assigned_request(recipient: UserId) -> DispatchRequest {
    DispatchRequest::new(
        NotificationKind::TaskAssigned,
        recipient,
        "Task assigned",
        "You have been assigned 'Demo'",
    )
    .with_link("/tasks/42")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatch_persists_and_publishes_to_the_recipient_channel(harness: Harness) {
    let recipient = UserId::new();

    let receipt = harness
        .dispatcher
        .dispatch(assigned_request(recipient))
        .await
        .expect("dispatch should succeed");

    assert!(receipt.published);
    assert_eq!(receipt.notification.recipient(), recipient);

    let published = harness.channel.published().expect("channel readable");
    let Some((channel, push)) = published.first() else {
        panic!("one message must be published");
    };
    assert_eq!(channel, &format!("user-{recipient}"));
    assert_eq!(push.notification_id, receipt.notification.id());
    assert_eq!(push.link.as_deref(), Some("/tasks/42"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn publish_failure_is_dropped_but_the_row_survives(harness: Harness) {
    let recipient = UserId::new();
    harness.channel.set_failing(true);

    let receipt = harness
        .dispatcher
        .dispatch(assigned_request(recipient))
        .await
        .expect("dispatch must not fail on a dead channel");

    assert!(!receipt.published);

    let rows = harness
        .dispatcher
        .list_for(recipient)
        .await
        .expect("listing should succeed");
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows.first().map(Notification::id),
        Some(receipt.notification.id())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mark_read_twice_converges_without_error(harness: Harness) {
    let recipient = UserId::new();
    let receipt = harness
        .dispatcher
        .dispatch(assigned_request(recipient))
        .await
        .expect("dispatch should succeed");

    let first = harness
        .dispatcher
        .mark_read(recipient, receipt.notification.id())
        .await
        .expect("first mark-read should succeed");
    assert!(first.is_read());

    let second = harness
        .dispatcher
        .mark_read(recipient, receipt.notification.id())
        .await
        .expect("second mark-read is a no-op success");
    assert!(second.is_read());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_notifications_read_as_not_found(harness: Harness) {
    let owner = UserId::new();
    let other = UserId::new();
    let receipt = harness
        .dispatcher
        .dispatch(assigned_request(owner))
        .await
        .expect("dispatch should succeed");

    let result = harness
        .dispatcher
        .mark_read(other, receipt.notification.id())
        .await;

    let Err(err) = result else {
        panic!("foreign notifications must not be reachable");
    };
    assert!(matches!(err, DispatchError::NotFound(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_ids_read_as_not_found(harness: Harness) {
    let result = harness
        .dispatcher
        .mark_read(UserId::new(), NotificationId::new())
        .await;

    assert!(matches!(result, Err(DispatchError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn push_payload_renders_snake_case_wire_fields(harness: Harness) {
    let recipient = UserId::new();
    harness
        .dispatcher
        .dispatch(assigned_request(recipient))
        .await
        .expect("dispatch should succeed");

    let published = harness.channel.published().expect("channel readable");
    let Some((_, push)) = published.first() else {
        panic!("one message must be published");
    };
    let payload = push.to_payload().expect("payload should serialize");

    assert_eq!(
        payload.get("kind").and_then(serde_json::Value::as_str),
        Some("task_assigned")
    );
    assert_eq!(
        payload.get("link").and_then(serde_json::Value::as_str),
        Some("/tasks/42")
    );
    assert!(payload.get("notification_id").is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_returns_newest_first(harness: Harness) {
    let recipient = UserId::new();
    for index in 0..3 {
        harness
            .dispatcher
            .dispatch(DispatchRequest::new(
                NotificationKind::StatusChanged,
                recipient,
                "Task status updated",
                format!("update {index}"),
            ))
            .await
            .expect("dispatch should succeed");
    }

    let rows = harness
        .dispatcher
        .list_for(recipient)
        .await
        .expect("listing should succeed");

    assert_eq!(rows.len(), 3);
    assert!(
        rows.windows(2)
            .all(|pair| pair[0].created_at() >= pair[1].created_at())
    );
}
