//! Role administration and provider reconciliation across the stack.

use super::helpers::{CoreHarness, acting_as, bootstrap_manager, harness, resolve_user};
use gantt::error::{Classify, ErrorKind};
use gantt::identity::domain::Role;
use gantt::identity::ports::UserRepository;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resolved_users_start_as_clients_until_a_manager_promotes_them(harness: CoreHarness) {
    let user = resolve_user(&harness, "alice").await;
    assert_eq!(user.role(), Role::Client);

    let promoted = harness
        .roles
        .set_role(&bootstrap_manager(), user.id(), "team_leader")
        .await
        .expect("promotion should succeed");
    assert_eq!(promoted.role(), Role::TeamLeader);

    // The stored role survives the next sign-in.
    let re_resolved = resolve_user(&harness, "alice").await;
    assert_eq!(re_resolved.role(), Role::TeamLeader);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_managers_cannot_promote_even_themselves(harness: CoreHarness) {
    let user = resolve_user(&harness, "bob").await;
    let actor = acting_as(&user, Role::Employee);

    let result = harness.roles.set_role(&actor, user.id(), "manager").await;

    let Err(err) = result else {
        panic!("self-promotion must fail");
    };
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let stored = harness
        .users
        .find_by_id(user.id())
        .await
        .expect("lookup should succeed")
        .expect("user exists");
    assert_eq!(stored.role(), Role::Client);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sync_reports_counts_and_per_user_failures(harness: CoreHarness) {
    let alice = resolve_user(&harness, "alice").await;
    let bob = resolve_user(&harness, "bob").await;
    let carol = resolve_user(&harness, "carol").await;
    harness
        .roles
        .set_role(&bootstrap_manager(), alice.id(), "employee")
        .await
        .expect("role change should succeed");
    harness
        .provider
        .fail_subject(bob.external().clone())
        .expect("scripting should succeed");

    let report = harness
        .roles
        .sync_external_roles(&bootstrap_manager())
        .await
        .expect("sync should succeed");

    assert_eq!(report.processed, 2);
    assert_eq!(
        report.failures.iter().map(|f| f.user_id).collect::<Vec<_>>(),
        vec![bob.id()]
    );

    let claims = harness.provider.claims().expect("claims readable");
    assert!(claims.contains(&(alice.external().clone(), Role::Employee)));
    assert!(claims.contains(&(carol.external().clone(), Role::Client)));
}
