//! `PostgreSQL` adapters for the identity store.

mod models;
mod repository;
mod schema;

pub use repository::{IdentityPgPool, PostgresEmployeeRepository, PostgresManagerRepository};
