//! Decision-table tests for the authorization policy.

use crate::access::{AccessError, Action, Actor, authorize};
use crate::identity::domain::{Role, UserId};
use rstest::rstest;

const ALL_ROLES: [Role; 4] = [Role::Manager, Role::TeamLeader, Role::Employee, Role::Client];

fn actor_with(role: Role) -> Actor {
    Actor::new(UserId::new(), role)
}

// ── role-gated actions ─────────────────────────────────────────────

#[rstest]
#[case(Role::Manager, false)]
#[case(Role::TeamLeader, true)]
#[case(Role::Employee, false)]
#[case(Role::Client, false)]
fn only_team_leaders_assign_tasks(#[case] role: Role, #[case] expected: bool) {
    let result = authorize(&actor_with(role), &Action::AssignTask);
    assert_eq!(result.is_ok(), expected);
}

#[rstest]
#[case(Role::Manager, true)]
#[case(Role::TeamLeader, false)]
#[case(Role::Employee, false)]
#[case(Role::Client, false)]
fn only_managers_change_roles(#[case] role: Role, #[case] expected: bool) {
    let result = authorize(&actor_with(role), &Action::ChangeRole);
    assert_eq!(result.is_ok(), expected);
}

#[rstest]
#[case(Role::Manager, true)]
#[case(Role::TeamLeader, false)]
#[case(Role::Employee, false)]
#[case(Role::Client, false)]
fn only_managers_run_cleanup(#[case] role: Role, #[case] expected: bool) {
    let result = authorize(&actor_with(role), &Action::CleanupTasks);
    assert_eq!(result.is_ok(), expected);
}

#[rstest]
fn dashboard_namespace_must_match_role() {
    for actor_role in ALL_ROLES {
        for namespace in ALL_ROLES {
            let result = authorize(
                &actor_with(actor_role),
                &Action::ReadOwnDashboard { namespace },
            );
            assert_eq!(result.is_ok(), actor_role == namespace);
        }
    }
}

// ── ownership-gated actions ────────────────────────────────────────

#[rstest]
fn assignee_may_accept_own_task() {
    let actor = actor_with(Role::Employee);
    let action = Action::AcceptTask {
        assigned_to: Some(actor.id()),
    };
    assert!(authorize(&actor, &action).is_ok());
}

#[rstest]
fn non_assignee_may_not_accept() {
    let actor = actor_with(Role::Employee);
    let action = Action::AcceptTask {
        assigned_to: Some(UserId::new()),
    };
    assert!(authorize(&actor, &action).is_err());
}

#[rstest]
fn unassigned_task_cannot_be_accepted_by_anyone() {
    for role in ALL_ROLES {
        let result = authorize(&actor_with(role), &Action::AcceptTask { assigned_to: None });
        assert!(result.is_err());
    }
}

#[rstest]
fn team_leader_of_task_may_update_progress() {
    let actor = actor_with(Role::TeamLeader);
    let action = Action::UpdateProgress {
        team_leader: Some(actor.id()),
    };
    assert!(authorize(&actor, &action).is_ok());
}

#[rstest]
fn leader_of_another_team_may_not_update_progress() {
    let actor = actor_with(Role::TeamLeader);
    let action = Action::UpdateProgress {
        team_leader: Some(UserId::new()),
    };
    assert!(authorize(&actor, &action).is_err());
}

#[rstest]
fn teamless_task_progress_is_denied() {
    let actor = actor_with(Role::TeamLeader);
    let result = authorize(&actor, &Action::UpdateProgress { team_leader: None });
    assert!(result.is_err());
}

// ── denial shape ───────────────────────────────────────────────────

#[rstest]
fn denial_names_the_action_and_role() {
    let actor = actor_with(Role::Client);
    let Err(AccessError::Forbidden { role, action }) = authorize(&actor, &Action::AssignTask)
    else {
        panic!("client must not assign tasks");
    };
    assert_eq!(role, Role::Client);
    assert_eq!(action, "assign_task");
}
