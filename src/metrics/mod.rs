//! Per-run interview metrics: the JSONL log and the `stats` report built from it.

pub mod stats;
pub mod store;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::interview::SessionMetrics;
use crate::profile::UserProfile;

pub use stats::{Aggregate, StatsReport};
pub use store::MetricsLog;

/// Profile sizes captured around a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileCounts {
    pub stable_facts: usize,
    pub pending: usize,
    pub conflicts: usize,
}

impl ProfileCounts {
    pub fn of(profile: &UserProfile) -> Self {
        Self {
            stable_facts: profile.stable_facts.len(),
            pending: profile.pending_confirmations.len(),
            conflicts: profile.conflicts.len(),
        }
    }
}

/// One line of the metrics log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub date: NaiveDate,
    pub recorded_at: DateTime<Utc>,
    #[serde(default)]
    pub session_id: String,
    #[serde(flatten)]
    pub session: SessionMetrics,
    #[serde(default)]
    pub stable_facts_before: usize,
    #[serde(default)]
    pub stable_facts_after: usize,
    #[serde(default)]
    pub pending_before: usize,
    #[serde(default)]
    pub pending_after: usize,
    #[serde(default)]
    pub conflicts_before: usize,
    #[serde(default)]
    pub conflicts_after: usize,
}

impl RunMetrics {
    pub fn new(
        date: NaiveDate,
        session: SessionMetrics,
        before: ProfileCounts,
        after: ProfileCounts,
    ) -> Self {
        Self {
            date,
            recorded_at: Utc::now(),
            session_id: uuid::Uuid::new_v4().to_string(),
            session,
            stable_facts_before: before.stable_facts,
            stable_facts_after: after.stable_facts,
            pending_before: before.pending,
            pending_after: after.pending,
            conflicts_before: before.conflicts,
            conflicts_after: after.conflicts,
        }
    }
}
