//! End-to-end lifecycle flow: create, assign, accept, and conflict on
//! repeat acceptance.

use super::helpers::{CoreHarness, acting_as, harness, resolve_user};
use chrono::{TimeZone, Utc};
use gantt::error::{Classify, ErrorKind};
use gantt::identity::domain::Role;
use gantt::notification::domain::NotificationKind;
use gantt::task::domain::{Priority, TaskStatus};
use gantt::task::services::{AssignTaskRequest, CreateTaskRequest, NotificationOutcome};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle_assign_accept_and_conflict(harness: CoreHarness) {
    let leader = resolve_user(&harness, "leader").await;
    let employee = resolve_user(&harness, "employee").await;
    let leader_actor = acting_as(&leader, Role::TeamLeader);
    let employee_actor = acting_as(&employee, Role::Employee);

    // Create: the task starts pending and unassigned.
    let task = harness
        .lifecycle
        .create(&leader_actor, CreateTaskRequest::new("Quarterly audit"))
        .await
        .expect("task creation should succeed");
    assert_eq!(task.status(), TaskStatus::Pending);

    // Assign: team leader hands the task to the employee.
    let deadline = Utc
        .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .expect("valid deadline");
    let assigned = harness
        .lifecycle
        .assign(
            &leader_actor,
            AssignTaskRequest::new(task.id(), employee.id())
                .with_deadline(deadline)
                .with_priority(Priority::High),
        )
        .await
        .expect("assignment should succeed");

    assert_eq!(assigned.task.status(), TaskStatus::Assigned);
    assert_eq!(assigned.task.assigned_to(), Some(employee.id()));
    assert_eq!(assigned.task.deadline(), Some(deadline));
    assert_eq!(assigned.task.priority(), Priority::High);

    let NotificationOutcome::Delivered(assign_receipt) = assigned.notification else {
        panic!("assignment must notify the assignee");
    };
    assert_eq!(
        assign_receipt.notification.kind(),
        NotificationKind::TaskAssigned
    );
    assert_eq!(assign_receipt.notification.recipient(), employee.id());

    // Accept: the assignee accepts; the creator hears about it live.
    let accepted = harness
        .lifecycle
        .accept(&employee_actor, task.id())
        .await
        .expect("acceptance should succeed");
    assert_eq!(accepted.task.status(), TaskStatus::Accepted);

    let NotificationOutcome::Delivered(accept_receipt) = accepted.notification else {
        panic!("acceptance must notify the creator");
    };
    assert_eq!(
        accept_receipt.notification.kind(),
        NotificationKind::TaskAccepted
    );
    assert_eq!(accept_receipt.notification.recipient(), leader.id());

    let published = harness.channel.published().expect("channel readable");
    let creator_channel = format!("user-{}", leader.id());
    assert!(
        published
            .iter()
            .any(|(channel, push)| channel == &creator_channel
                && push.kind == NotificationKind::TaskAccepted)
    );

    // Accept again: the task is no longer Assigned, so this is a conflict.
    let result = harness.lifecycle.accept(&employee_actor, task.id()).await;
    let Err(err) = result else {
        panic!("second accept must fail");
    };
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn forbidden_not_found_and_conflict_stay_distinct(harness: CoreHarness) {
    let leader = resolve_user(&harness, "leader").await;
    let employee = resolve_user(&harness, "employee").await;
    let outsider = resolve_user(&harness, "outsider").await;
    let leader_actor = acting_as(&leader, Role::TeamLeader);
    let employee_actor = acting_as(&employee, Role::Employee);
    let outsider_actor = acting_as(&outsider, Role::Employee);

    let task = harness
        .lifecycle
        .create(&leader_actor, CreateTaskRequest::new("Access probing"))
        .await
        .expect("task creation should succeed");
    harness
        .lifecycle
        .assign(&leader_actor, AssignTaskRequest::new(task.id(), employee.id()))
        .await
        .expect("assignment should succeed");

    // Wrong actor: 403, never 404 or 409.
    let forbidden = harness
        .lifecycle
        .accept(&outsider_actor, task.id())
        .await
        .expect_err("outsiders may not accept");
    assert_eq!(forbidden.kind(), ErrorKind::Forbidden);

    // Missing task: 404.
    let missing = harness
        .lifecycle
        .accept(&employee_actor, gantt::task::domain::TaskId::new())
        .await
        .expect_err("missing tasks are not found");
    assert_eq!(missing.kind(), ErrorKind::NotFound);

    // Wrong state: 409.
    harness
        .lifecycle
        .accept(&employee_actor, task.id())
        .await
        .expect("first accept should succeed");
    let conflict = harness
        .lifecycle
        .accept(&employee_actor, task.id())
        .await
        .expect_err("double accept conflicts");
    assert_eq!(conflict.kind(), ErrorKind::Conflict);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignee_dashboard_lists_their_tasks(harness: CoreHarness) {
    let leader = resolve_user(&harness, "leader").await;
    let employee = resolve_user(&harness, "employee").await;
    let leader_actor = acting_as(&leader, Role::TeamLeader);

    for index in 0..2 {
        let task = harness
            .lifecycle
            .create(
                &leader_actor,
                CreateTaskRequest::new(format!("Dashboard task {index}")),
            )
            .await
            .expect("task creation should succeed");
        harness
            .lifecycle
            .assign(&leader_actor, AssignTaskRequest::new(task.id(), employee.id()))
            .await
            .expect("assignment should succeed");
    }

    let mine = harness
        .lifecycle
        .list_for_assignee(employee.id())
        .await
        .expect("listing should succeed");
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|task| task.assigned_to() == Some(employee.id())));
}
