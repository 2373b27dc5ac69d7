//! Task statistics for managers and employees.
//!
//! Counts are recomputed on every request from the caller's task list; nothing
//! is cached, so they always reconcile with the task store.

mod aggregate;
mod service;

pub use aggregate::{
    EmployeeTaskStats, ManagerTaskStats, TaskStatistics, summarize_assigned, summarize_received,
};
pub use service::{StatisticsError, StatisticsService};

#[cfg(test)]
mod tests;
