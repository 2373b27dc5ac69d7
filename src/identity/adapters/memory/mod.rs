//! In-memory identity adapters for tests and single-instance deployments.

mod employee;
mod manager;

pub use employee::InMemoryEmployeeRepository;
pub use manager::InMemoryManagerRepository;
