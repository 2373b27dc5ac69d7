//! Application services for task assignment and lifecycle transitions.

mod lifecycle;

pub use lifecycle::{
    CreateTaskRequest, EditTaskRequest, ReviewTaskRequest, TaskLifecycleError,
    TaskLifecycleResult, TaskLifecycleService, UpdateStatusRequest,
};
