//! Adapter implementations for the advisory ports.

mod heuristic;
mod rate_limit;

pub use heuristic::HeuristicAdvisor;
pub use rate_limit::{SlidingWindow, SlidingWindowRateLimiter};
