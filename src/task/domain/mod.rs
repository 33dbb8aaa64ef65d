//! Domain model for the task lifecycle engine.
//!
//! The task domain models the status state machine, assignment and progress
//! bookkeeping, and the invariants tying them together, while keeping all
//! infrastructure concerns outside of the domain boundary.

mod error;
mod ids;
mod task;

pub use error::{ParsePriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::{Progress, ProjectId, TaskId, TaskTitle, TeamId};
pub use task::{PersistedTaskData, Priority, Task, TaskStatus, TeamRef};
