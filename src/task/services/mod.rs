//! Application services for task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    AssignTaskRequest, CleanupFailure, CleanupReport, CreateTaskRequest, NotificationOutcome,
    TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService, TransitionOutcome,
};
