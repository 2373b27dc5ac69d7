//! Application services for the advisory side-call.

mod advice;

pub use advice::{AdvisoryError, AdvisoryService, AdvisorySettings};
