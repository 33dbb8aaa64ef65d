//! Shared test helpers wiring the full in-memory service stack.

use std::sync::Arc;

use gantt::access::Actor;
use gantt::identity::{
    adapters::memory::{InMemoryUserRepository, RecordingIdentityProvider},
    domain::{Role, User},
    services::{IdentityService, ResolveIdentityRequest, RoleAdminService},
};
use gantt::notification::{
    adapters::memory::{InMemoryNotificationRepository, InMemoryRealtimeChannel},
    services::NotificationDispatcher,
};
use gantt::task::{adapters::memory::InMemoryTaskRepository, services::TaskLifecycleService};
use mockable::DefaultClock;
use rstest::fixture;

/// Type of the fully-wired lifecycle service under test.
pub type TestLifecycleService = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryUserRepository,
    InMemoryNotificationRepository,
    InMemoryRealtimeChannel,
    DefaultClock,
>;

/// Type of the identity service under test.
pub type TestIdentityService = IdentityService<InMemoryUserRepository, DefaultClock>;

/// Type of the role administration service under test.
pub type TestRoleAdminService =
    RoleAdminService<InMemoryUserRepository, RecordingIdentityProvider, DefaultClock>;

/// Type of the dispatcher under test.
pub type TestDispatcher = NotificationDispatcher<
    InMemoryNotificationRepository,
    InMemoryRealtimeChannel,
    DefaultClock,
>;

/// Full in-memory service stack sharing one set of stores.
pub struct CoreHarness {
    /// Shared user store.
    pub users: Arc<InMemoryUserRepository>,
    /// Shared task store.
    pub tasks: Arc<InMemoryTaskRepository>,
    /// Shared notification store.
    pub notifications: Arc<InMemoryNotificationRepository>,
    /// Shared recording push channel.
    pub channel: Arc<InMemoryRealtimeChannel>,
    /// Shared recording identity provider.
    pub provider: Arc<RecordingIdentityProvider>,
    /// Identity resolution service.
    pub identity: TestIdentityService,
    /// Role administration service.
    pub roles: TestRoleAdminService,
    /// Task lifecycle service.
    pub lifecycle: TestLifecycleService,
    /// Notification dispatcher.
    pub dispatcher: TestDispatcher,
}

/// Provides a fresh fully-wired harness for each test.
#[fixture]
pub fn harness() -> CoreHarness {
    let users = Arc::new(InMemoryUserRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let notifications = Arc::new(InMemoryNotificationRepository::new());
    let channel = Arc::new(InMemoryRealtimeChannel::new());
    let provider = Arc::new(RecordingIdentityProvider::new());
    let clock = Arc::new(DefaultClock);

    let identity = IdentityService::new(Arc::clone(&users), Arc::clone(&clock));
    let roles = RoleAdminService::new(
        Arc::clone(&users),
        Arc::clone(&provider),
        Arc::clone(&clock),
    );
    let dispatcher = NotificationDispatcher::new(
        Arc::clone(&notifications),
        Arc::clone(&channel),
        Arc::clone(&clock),
    );
    let lifecycle = TaskLifecycleService::new(
        Arc::clone(&tasks),
        Arc::clone(&users),
        NotificationDispatcher::new(
            Arc::clone(&notifications),
            Arc::clone(&channel),
            Arc::clone(&clock),
        ),
        Arc::clone(&clock),
    );

    CoreHarness {
        users,
        tasks,
        notifications,
        channel,
        provider,
        identity,
        roles,
        lifecycle,
        dispatcher,
    }
}

/// Resolves a user through the identity service, as the boundary would.
///
/// # Panics
///
/// Panics when resolution fails; test setup treats that as a bug.
pub async fn resolve_user(harness: &CoreHarness, handle: &str) -> User {
    harness
        .identity
        .resolve(ResolveIdentityRequest::new(
            format!("auth0|{handle}"),
            handle,
            format!("{handle}@example.com"),
        ))
        .await
        .expect("identity resolution should succeed")
}

/// Builds an actor for a resolved user acting under the given role.
#[must_use]
pub fn acting_as(user: &User, role: Role) -> Actor {
    Actor::new(user.id(), role)
}

/// Builds a manager actor not backed by a stored user.
#[must_use]
pub fn bootstrap_manager() -> Actor {
    Actor::new(gantt::identity::domain::UserId::new(), Role::Manager)
}
