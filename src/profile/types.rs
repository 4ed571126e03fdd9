use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::history::ConfirmationHistory;
use super::lenient::{item_status, null_as_default, optional_date, optional_timestamp};
use super::pending::PendingBook;

/// Schema version stamped on every persisted profile.
pub const CURRENT_VERSION: u32 = 1;

/// Confidence substituted when a candidate arrives with an unset (zero) score.
pub const UNSET_CONFIDENCE: f64 = 0.5;

// ProfileCategory: the four durable item collections of a profile
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProfileCategory {
    StableFacts,
    OngoingTopics,
    EffectivePatterns,
    SensitiveTopics,
}

impl ProfileCategory {
    pub const ALL: [Self; 4] = [
        Self::StableFacts,
        Self::OngoingTopics,
        Self::EffectivePatterns,
        Self::SensitiveTopics,
    ];

    /// Parse a free-form category label (`" Stable_Facts "` -> `StableFacts`).
    pub fn parse(raw: &str) -> Option<Self> {
        normalize_key(raw).parse().ok()
    }
}

// ItemStatus: ordered by evidence strength; merges keep the max
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemStatus {
    Inferred,
    #[default]
    Observed,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
    #[serde(
        default,
        deserialize_with = "optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "item_status")]
    pub status: ItemStatus,
}

impl ProfileItem {
    pub fn new(value: impl Into<String>, confidence: f64, status: ItemStatus) -> Self {
        Self {
            value: value.into(),
            confidence,
            last_seen: None,
            source_date: None,
            status,
        }
    }

    pub fn key(&self) -> String {
        normalize_key(&self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub empathy_style: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub question_depth: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub avoid_topics: Vec<String>,
}

impl UserPreferences {
    pub fn is_empty(&self) -> bool {
        self.empathy_style.is_empty()
            && self.question_depth.is_empty()
            && self.avoid_topics.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConflict {
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub existing_value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub incoming_value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
    #[serde(
        default,
        deserialize_with = "optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub detected_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resolved: bool,
}

impl ProfileConflict {
    pub fn new(
        category: impl Into<String>,
        existing_value: impl Into<String>,
        incoming_value: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            category: category.into(),
            existing_value: existing_value.into(),
            incoming_value: incoming_value.into(),
            confidence,
            source_date: None,
            detected_at: None,
            resolved: false,
        }
    }

    pub fn key(&self) -> (String, String, String) {
        (
            normalize_key(&self.category),
            normalize_key(&self.existing_value),
            normalize_key(&self.incoming_value),
        )
    }
}

/// The durable per-user profile document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stable_facts: Vec<ProfileItem>,
    pub preferences: UserPreferences,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ongoing_topics: Vec<ProfileItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub effective_patterns: Vec<ProfileItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sensitive_topics: Vec<ProfileItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<ProfileConflict>,
    #[serde(skip_serializing_if = "PendingBook::is_empty")]
    pub pending_confirmations: PendingBook,
    #[serde(skip_serializing_if = "ConfirmationHistory::is_empty")]
    pub confirmation_history: ConfirmationHistory,
}

impl UserProfile {
    pub fn new() -> Self {
        Self {
            version: CURRENT_VERSION,
            ..Self::default()
        }
    }

    pub fn items(&self, category: ProfileCategory) -> &[ProfileItem] {
        match category {
            ProfileCategory::StableFacts => &self.stable_facts,
            ProfileCategory::OngoingTopics => &self.ongoing_topics,
            ProfileCategory::EffectivePatterns => &self.effective_patterns,
            ProfileCategory::SensitiveTopics => &self.sensitive_topics,
        }
    }

    /// Borrow one item collection together with the pending book, which every
    /// item upsert has to touch.
    pub(crate) fn items_and_pending_mut(
        &mut self,
        category: ProfileCategory,
    ) -> (&mut Vec<ProfileItem>, &mut PendingBook) {
        let items = match category {
            ProfileCategory::StableFacts => &mut self.stable_facts,
            ProfileCategory::OngoingTopics => &mut self.ongoing_topics,
            ProfileCategory::EffectivePatterns => &mut self.effective_patterns,
            ProfileCategory::SensitiveTopics => &mut self.sensitive_topics,
        };
        (items, &mut self.pending_confirmations)
    }

    pub(crate) fn all_items_mut(&mut self) -> impl Iterator<Item = &mut ProfileItem> {
        self.stable_facts
            .iter_mut()
            .chain(self.ongoing_topics.iter_mut())
            .chain(self.effective_patterns.iter_mut())
            .chain(self.sensitive_topics.iter_mut())
    }
}

/// Candidate updates proposed by the extraction step for one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateUpdates {
    #[serde(deserialize_with = "null_as_default")]
    pub stable_facts: Vec<ProfileItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub preferences: UserPreferences,
    #[serde(deserialize_with = "null_as_default")]
    pub ongoing_topics: Vec<ProfileItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub effective_patterns: Vec<ProfileItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub sensitive_topics: Vec<ProfileItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub conflicts: Vec<ProfileConflict>,
}

impl CandidateUpdates {
    pub fn items(&self, category: ProfileCategory) -> &[ProfileItem] {
        match category {
            ProfileCategory::StableFacts => &self.stable_facts,
            ProfileCategory::OngoingTopics => &self.ongoing_topics,
            ProfileCategory::EffectivePatterns => &self.effective_patterns,
            ProfileCategory::SensitiveTopics => &self.sensitive_topics,
        }
    }

    pub(crate) fn items_mut(&mut self, category: ProfileCategory) -> &mut Vec<ProfileItem> {
        match category {
            ProfileCategory::StableFacts => &mut self.stable_facts,
            ProfileCategory::OngoingTopics => &mut self.ongoing_topics,
            ProfileCategory::EffectivePatterns => &mut self.effective_patterns,
            ProfileCategory::SensitiveTopics => &mut self.sensitive_topics,
        }
    }

    pub fn is_empty(&self) -> bool {
        ProfileCategory::ALL
            .iter()
            .all(|category| self.items(*category).is_empty())
            && self.preferences.is_empty()
            && self.conflicts.is_empty()
    }
}

/// Identity normalization shared by items, pending entries and conflicts.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Clamp an incoming confidence into `[0, 1]`, reading exactly `0` as unset.
pub fn clamp_confidence(value: f64) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return UNSET_CONFIDENCE;
    }
    value.clamp(0.0, 1.0)
}
