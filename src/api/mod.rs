//! Caller-facing facade.
//!
//! [`Backend`] resolves bearer tokens, dispatches to the context services,
//! bounds every store access with a timeout, and translates service errors
//! into the [`ApiError`] taxonomy. Transport bindings sit on top of it.

mod backend;
mod error;

pub use backend::{Backend, BackendParts, EmployeeRemoval, InMemoryBackend};
pub use error::ApiError;

#[cfg(test)]
mod tests;
