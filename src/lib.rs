//! Overseer: employee and task management backend.
//!
//! Managers own employee records and assign tasks exclusively to employees
//! they own. Tasks move strictly forward through
//! `Pending → In Progress → Completed → Reviewed`; the assignee drives the
//! first steps and the assigner reviews. Every entity access is decided by a
//! single authorization guard over the ownership graph.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//! - **Services**: Orchestration over ports, guarded by [`authz`]
//!
//! # Modules
//!
//! - [`identity`]: Managers, employees, and credentials
//! - [`authz`]: Principals, guarded operations, and the decision function
//! - [`auth`]: Bearer tokens and password login
//! - [`task`]: Task assignment and the lifecycle state machine
//! - [`stats`]: Per-caller task statistics
//! - [`advisory`]: Best-effort suggestions from an external provider
//! - [`api`]: Caller-facing facade and error taxonomy
//! - [`config`]: Environment configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod advisory;
pub mod api;
pub mod auth;
pub mod authz;
pub mod config;
pub mod identity;
pub mod stats;
pub mod task;
pub mod telemetry;
