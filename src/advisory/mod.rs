//! Best-effort advisory side-call.
//!
//! Managers can ask an external text-generation capability for suggestions
//! about a task. Suggestions are never authoritative and nothing here writes
//! to the task store. The call is gated by the authorization guard, a
//! feature toggle, a per-principal rate limiter, and a timeout, in that
//! order, and each gate fails with its own [`AdvisoryError`] variant.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
