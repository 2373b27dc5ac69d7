//! Domain model for task assignment and the task lifecycle.
//!
//! Tasks are created by a manager for one of its own employees and then move
//! strictly forward through `Pending → In Progress → Completed → Reviewed`.
//! The assignee drives the first two steps; the assigner reviews. Infrastructure
//! concerns stay outside this boundary.

mod content;
mod error;
mod ids;
mod priority;
mod status;
mod task;

pub use content::{Attachment, MAX_TITLE_LENGTH, Rating, TaskReview, TaskTitle};
pub use error::{ParsePriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use priority::Priority;
pub use status::TaskStatus;
pub use task::{NewTask, PersistedTaskData, Task, TaskRevision};
