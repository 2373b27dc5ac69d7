//! In-memory task adapters for tests and single-instance deployments.

mod task;

pub use task::InMemoryTaskRepository;
