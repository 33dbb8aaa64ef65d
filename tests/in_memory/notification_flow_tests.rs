//! Notification ownership and idempotence across the full stack.

use super::helpers::{CoreHarness, acting_as, harness, resolve_user};
use gantt::error::{Classify, ErrorKind};
use gantt::identity::domain::Role;
use gantt::task::services::{AssignTaskRequest, CreateTaskRequest, NotificationOutcome};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recipients_read_their_rows_and_only_their_rows(harness: CoreHarness) {
    let leader = resolve_user(&harness, "leader").await;
    let employee = resolve_user(&harness, "employee").await;
    let outsider = resolve_user(&harness, "outsider").await;
    let leader_actor = acting_as(&leader, Role::TeamLeader);

    let task = harness
        .lifecycle
        .create(&leader_actor, CreateTaskRequest::new("Notify me"))
        .await
        .expect("task creation should succeed");
    let outcome = harness
        .lifecycle
        .assign(&leader_actor, AssignTaskRequest::new(task.id(), employee.id()))
        .await
        .expect("assignment should succeed");
    let NotificationOutcome::Delivered(receipt) = outcome.notification else {
        panic!("assignment must deliver a notification");
    };
    let notification_id = receipt.notification.id();

    // The owner's inbox holds the row, unread.
    let inbox = harness
        .dispatcher
        .list_for(employee.id())
        .await
        .expect("listing should succeed");
    assert_eq!(inbox.len(), 1);
    assert!(inbox.iter().all(|n| !n.is_read()));

    // A different user probing the id sees not-found, not forbidden.
    let probe = harness
        .dispatcher
        .mark_read(outsider.id(), notification_id)
        .await
        .expect_err("foreign rows are invisible");
    assert_eq!(probe.kind(), ErrorKind::NotFound);

    // The owner marks it read; a second call converges without error.
    let first = harness
        .dispatcher
        .mark_read(employee.id(), notification_id)
        .await
        .expect("mark-read should succeed");
    assert!(first.is_read());
    let second = harness
        .dispatcher
        .mark_read(employee.id(), notification_id)
        .await
        .expect("repeat mark-read is a no-op success");
    assert!(second.is_read());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_dead_channel_never_blocks_the_lifecycle(harness: CoreHarness) {
    let leader = resolve_user(&harness, "leader").await;
    let employee = resolve_user(&harness, "employee").await;
    let leader_actor = acting_as(&leader, Role::TeamLeader);
    let employee_actor = acting_as(&employee, Role::Employee);

    harness.channel.set_failing(true);

    let task = harness
        .lifecycle
        .create(&leader_actor, CreateTaskRequest::new("Offline flow"))
        .await
        .expect("task creation should succeed");
    let assigned = harness
        .lifecycle
        .assign(&leader_actor, AssignTaskRequest::new(task.id(), employee.id()))
        .await
        .expect("assignment should succeed");
    let accepted = harness
        .lifecycle
        .accept(&employee_actor, task.id())
        .await
        .expect("acceptance should succeed");

    // Both rows were persisted; neither live push went out.
    for outcome in [assigned.notification, accepted.notification] {
        let NotificationOutcome::Delivered(receipt) = outcome else {
            panic!("rows must persist while the channel is down");
        };
        assert!(!receipt.published);
    }
    assert!(harness.channel.published().expect("channel readable").is_empty());

    // The durable rows are the fallback the clients poll later.
    let employee_inbox = harness
        .dispatcher
        .list_for(employee.id())
        .await
        .expect("listing should succeed");
    let leader_inbox = harness
        .dispatcher
        .list_for(leader.id())
        .await
        .expect("listing should succeed");
    assert_eq!(employee_inbox.len(), 1);
    assert_eq!(leader_inbox.len(), 1);
}
