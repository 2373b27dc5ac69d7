//! Identity store for managers and employees.
//!
//! Managers own employee records; employees optionally hold login
//! credentials. The employee `owner_id` is the first edge of the ownership
//! graph used by every authorization decision. The module follows hexagonal
//! architecture:
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
pub(crate) mod tests;
