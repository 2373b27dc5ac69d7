//! In-process sliding-window rate limiter.

use crate::advisory::ports::RateLimiter;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Window parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlidingWindow {
    /// Attempts admitted per window.
    pub max_requests: usize,
    /// Window length.
    pub length: Duration,
}

/// Sliding-window limiter keyed by principal.
///
/// State lives in process memory and is lost on restart; it is not shared
/// between instances. Keys with no attempt inside the window are dropped at
/// most once per window length, during a check.
#[derive(Clone)]
pub struct SlidingWindowRateLimiter<C: Clock + Send + Sync> {
    window: SlidingWindow,
    clock: Arc<C>,
    state: Arc<Mutex<WindowState>>,
}

#[derive(Default)]
struct WindowState {
    attempts: HashMap<String, VecDeque<DateTime<Utc>>>,
    swept_at: Option<DateTime<Utc>>,
}

impl WindowState {
    fn sweep_idle(&mut self, now: DateTime<Utc>, cutoff: DateTime<Utc>, every: Duration) {
        if self.swept_at.is_some_and(|at| now - at < every) {
            return;
        }
        self.attempts
            .retain(|_, recent| recent.back().is_some_and(|at| *at > cutoff));
        self.swept_at = Some(now);
    }
}

impl<C: Clock + Send + Sync> SlidingWindowRateLimiter<C> {
    /// Creates an empty limiter.
    #[must_use]
    pub fn new(window: SlidingWindow, clock: Arc<C>) -> Self {
        Self {
            window,
            clock,
            state: Arc::new(Mutex::new(WindowState::default())),
        }
    }

    /// Records an attempt for `key` at `now`.
    ///
    /// Rejected attempts are not recorded, so a caller that backs off
    /// regains capacity once older attempts leave the window.
    pub async fn check_at(&self, key: &str, now: DateTime<Utc>) -> bool {
        let cutoff = now - self.window.length;
        let mut state = self.state.lock().await;
        state.sweep_idle(now, cutoff, self.window.length);
        let recent = state.attempts.entry(key.to_owned()).or_default();
        while recent.front().is_some_and(|at| *at <= cutoff) {
            recent.pop_front();
        }
        if recent.len() >= self.window.max_requests {
            return false;
        }
        recent.push_back(now);
        true
    }

    #[cfg(test)]
    pub(crate) async fn tracked_keys(&self) -> usize {
        self.state.lock().await.attempts.len()
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> RateLimiter for SlidingWindowRateLimiter<C> {
    async fn check(&self, key: &str) -> bool {
        self.check_at(key, self.clock.utc()).await
    }
}
