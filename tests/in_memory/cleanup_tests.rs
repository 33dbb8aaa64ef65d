//! Manager cleanup batch: tasks assigned to vanished users are released.

use super::helpers::{CoreHarness, acting_as, bootstrap_manager, harness, resolve_user};
use gantt::error::{Classify, ErrorKind};
use gantt::identity::domain::{Role, UserId};
use gantt::task::domain::{Priority, Task, TaskId, TaskStatus, TaskTitle};
use gantt::task::ports::TaskRepository;
use gantt::task::services::{AssignTaskRequest, CreateTaskRequest};
use mockable::DefaultClock;
use rstest::rstest;

/// Asserts a task has been fully released back to the pool.
///
/// # Errors
///
/// Returns an error when the task still holds a status or assignee.
fn assert_released(task: &Task) -> Result<(), eyre::Report> {
    eyre::ensure!(
        task.status() == TaskStatus::Pending,
        "expected pending, found {}",
        task.status()
    );
    eyre::ensure!(task.assigned_to().is_none(), "assignee was not cleared");
    Ok(())
}

/// Stores a task assigned to a user id the user store has never seen,
/// mirroring an assignee deleted outside this core.
async fn seed_ghost_task(harness: &CoreHarness, title: &str) -> TaskId {
    let clock = DefaultClock;
    let creator = resolve_user(harness, &format!("creator-of-{title}")).await;
    let mut task = Task::new(
        TaskTitle::new(title).expect("valid title"),
        creator.id(),
        &clock,
    );
    task.assign(UserId::new(), None, Priority::Medium, &clock)
        .expect("assignment should succeed");
    harness
        .tasks
        .store(&task)
        .await
        .expect("seeding task should succeed");
    task.id()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn exactly_the_ghost_assignments_are_released(harness: CoreHarness) {
    let leader = resolve_user(&harness, "leader").await;
    let employee = resolve_user(&harness, "employee").await;
    let leader_actor = acting_as(&leader, Role::TeamLeader);

    // N = 2 tasks assigned to users that no longer resolve.
    let ghost_a = seed_ghost_task(&harness, "ghost-a").await;
    let ghost_b = seed_ghost_task(&harness, "ghost-b").await;

    // M = 1 task assigned to a live user.
    let live_task = harness
        .lifecycle
        .create(&leader_actor, CreateTaskRequest::new("Live assignment"))
        .await
        .expect("task creation should succeed");
    harness
        .lifecycle
        .assign(
            &leader_actor,
            AssignTaskRequest::new(live_task.id(), employee.id()),
        )
        .await
        .expect("assignment should succeed");

    let report = harness
        .lifecycle
        .cleanup(&bootstrap_manager())
        .await
        .expect("cleanup should succeed");

    let mut reset = report.reset.clone();
    reset.sort_by_key(ToString::to_string);
    let mut expected = vec![ghost_a, ghost_b];
    expected.sort_by_key(ToString::to_string);
    assert_eq!(reset, expected);
    assert!(report.failures.is_empty());

    for ghost in [ghost_a, ghost_b] {
        let task = harness
            .tasks
            .find_by_id(ghost)
            .await
            .expect("lookup should succeed")
            .expect("task exists");
        assert_released(&task).expect("ghost task should be released");
    }

    let untouched = harness
        .tasks
        .find_by_id(live_task.id())
        .await
        .expect("lookup should succeed")
        .expect("task exists");
    assert_eq!(untouched.status(), TaskStatus::Assigned);
    assert_eq!(untouched.assigned_to(), Some(employee.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_tasks_are_never_resurrected(harness: CoreHarness) {
    let clock = DefaultClock;
    let creator = resolve_user(&harness, "creator").await;

    let mut done_task = Task::new(
        TaskTitle::new("Finished by a ghost").expect("valid title"),
        creator.id(),
        &clock,
    );
    done_task
        .assign(UserId::new(), None, Priority::Low, &clock)
        .expect("assignment should succeed");
    done_task
        .transition_to(TaskStatus::Done, &clock)
        .expect("transition should succeed");
    harness
        .tasks
        .store(&done_task)
        .await
        .expect("seeding task should succeed");

    let report = harness
        .lifecycle
        .cleanup(&bootstrap_manager())
        .await
        .expect("cleanup should succeed");

    assert!(report.reset.is_empty());
    let stored = harness
        .tasks
        .find_by_id(done_task.id())
        .await
        .expect("lookup should succeed")
        .expect("task exists");
    assert_eq!(stored.status(), TaskStatus::Done);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cleanup_is_manager_only(harness: CoreHarness) {
    let leader = resolve_user(&harness, "leader").await;
    let result = harness
        .lifecycle
        .cleanup(&acting_as(&leader, Role::TeamLeader))
        .await;

    let Err(err) = result else {
        panic!("cleanup is manager-only");
    };
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}
