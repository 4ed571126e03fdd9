use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Maximum number of confirmation records retained on a profile.
pub const MAX_HISTORY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConfirmationResult {
    Confirmed,
    Denied,
    PartialConfirmed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRecord {
    pub category: String,
    pub value: String,
    pub result: ConfirmationResult,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub question: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Append-only log of the most recent confirmation records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmationHistory {
    records: VecDeque<ConfirmationRecord>,
}

impl ConfirmationHistory {
    pub fn push(&mut self, record: ConfirmationRecord) {
        self.records.push_back(record);
        while self.records.len() > MAX_HISTORY {
            self.records.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ConfirmationRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&ConfirmationRecord> {
        self.records.back()
    }
}
