//! In-memory integration tests for the project-management core.
//!
//! Tests are organized into modules by functionality:
//! - `task_flow_tests`: The assign → accept lifecycle with notifications
//! - `cleanup_tests`: Manager batch releasing tasks with vanished assignees
//! - `role_sync_tests`: Role administration and provider reconciliation
//! - `notification_flow_tests`: Mark-as-read ownership and idempotence

mod in_memory {
    pub mod helpers;

    mod cleanup_tests;
    mod notification_flow_tests;
    mod role_sync_tests;
    mod task_flow_tests;
}
