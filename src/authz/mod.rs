//! Authorization guard over the ownership graph.
//!
//! Every entity access path asks [`decide`] whether a principal may perform
//! an operation on a target. The guard is a pure function of its inputs: it
//! performs no I/O and caches nothing, so each request is evaluated afresh.
//!
//! Two checks compose. The role check rejects principals whose role is not in
//! the operation's allowed set and names the required roles. The ownership
//! check rejects targets outside the principal's scope with a uniform
//! "not found or unauthorized" reason that does not confirm existence.

mod guard;
mod operation;
mod principal;

pub use guard::{AccessDenied, Decision, DenyReason, authorize_role, decide};
pub use operation::{EmployeeScope, Operation, Target, TaskScope};
pub use principal::{Principal, Role};

#[cfg(test)]
mod tests;
