//! Task assignment and lifecycle management.
//!
//! A manager assigns tasks to its own employees; the assignee moves them
//! forward one step at a time and the assigner reviews completed work. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
