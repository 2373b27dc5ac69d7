//! Offline provider that derives suggestions from the task's own fields.

use crate::advisory::{
    domain::{AdvisoryRequest, Suggestion},
    ports::{AdvisoryProvider, AdvisoryProviderError},
};
use crate::task::domain::Priority;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Deadline-driven provider for single-instance deployments without an
/// external model.
#[derive(Debug, Clone)]
pub struct HeuristicAdvisor<C: Clock + Send + Sync> {
    clock: Arc<C>,
}

impl<C: Clock + Send + Sync> HeuristicAdvisor<C> {
    /// Creates the advisor.
    #[must_use]
    pub const fn new(clock: Arc<C>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> AdvisoryProvider for HeuristicAdvisor<C> {
    async fn suggest(
        &self,
        request: &AdvisoryRequest,
    ) -> Result<Suggestion, AdvisoryProviderError> {
        Ok(assess(request, self.clock.utc()))
    }
}

const DAY_HOURS: i64 = 24;
const WEEK_HOURS: i64 = 7 * DAY_HOURS;

fn assess(request: &AdvisoryRequest, now: DateTime<Utc>) -> Suggestion {
    let hours_left = (request.deadline - now).num_hours();
    let (hint, feasibility) = if hours_left < 0 {
        (
            Priority::High,
            "the deadline has passed; agree a new date with the assignee",
        )
    } else if hours_left < DAY_HOURS {
        (
            Priority::High,
            "due within a day; feasible only if work is already under way",
        )
    } else if hours_left < WEEK_HOURS {
        (
            Priority::Medium,
            "due this week; feasible with steady progress",
        )
    } else {
        (Priority::Low, "ample time remains before the deadline")
    };

    let title = &request.title;
    let summary = request.description.as_deref().map_or_else(
        || format!("Break \"{title}\" into smaller steps and agree a first milestone."),
        |description| format!("Start \"{title}\" by clarifying scope: {description}"),
    );

    Suggestion {
        summary,
        priority_hint: Some(hint).filter(|suggested| *suggested != request.priority),
        feasibility: feasibility.to_owned(),
    }
}
