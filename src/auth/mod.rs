//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs whose subject is the principal's UUID. The role is
//! always resolved from the identity store, so a token never grants more than
//! the account currently holds.

mod service;
mod token;

pub use service::{AuthenticationError, Authenticator, Session};
pub use token::{Claims, MIN_SECRET_LENGTH, TokenConfig, TokenError, TokenService};

#[cfg(test)]
mod tests;
