use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::types::normalize_key;

/// A candidate fact awaiting corroboration before it enters a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingConfirmation {
    pub category: String,
    pub value: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_date: Option<NaiveDate>,
    #[serde(default)]
    pub confirmations: u32,
}

impl PendingConfirmation {
    pub fn key(&self) -> PendingKey {
        PendingKey::new(&self.category, &self.value)
    }
}

/// Normalized `(category, value)` identity of a pending entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingKey {
    category: String,
    value: String,
}

impl PendingKey {
    pub fn new(category: &str, value: &str) -> Self {
        Self {
            category: normalize_key(category),
            value: normalize_key(value),
        }
    }
}

/// Evidence observed for a pending hypothesis during a merge.
#[derive(Debug, Clone, Copy)]
pub struct Evidence<'a> {
    pub category: &'a str,
    pub value: &'a str,
    pub confidence: f64,
    pub source_date: NaiveDate,
    pub now: DateTime<Utc>,
}

/// Pending confirmations keyed by normalized identity.
///
/// Insertion order is preserved because the session offers hypotheses in the
/// order they were first recorded. The book is small (a handful of entries),
/// so lookups scan linearly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingBook {
    entries: Vec<PendingConfirmation>,
}

impl PendingBook {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingConfirmation> {
        self.entries.iter()
    }

    fn position(&self, key: &PendingKey) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key() == *key)
    }

    pub fn get(&self, key: &PendingKey) -> Option<&PendingConfirmation> {
        self.position(key).map(|idx| &self.entries[idx])
    }

    pub fn contains(&self, key: &PendingKey) -> bool {
        self.position(key).is_some()
    }

    /// Count one more piece of evidence for a hypothesis, inserting it with a
    /// single confirmation when it is new.
    pub fn record_evidence(&mut self, evidence: Evidence<'_>) {
        let key = PendingKey::new(evidence.category, evidence.value);
        if let Some(idx) = self.position(&key) {
            let entry = &mut self.entries[idx];
            entry.confidence = entry.confidence.max(evidence.confidence);
            entry.last_seen = Some(evidence.now);
            entry.source_date = Some(evidence.source_date);
            entry.confirmations += 1;
            return;
        }

        self.entries.push(PendingConfirmation {
            category: evidence.category.to_string(),
            value: evidence.value.to_string(),
            confidence: evidence.confidence,
            first_seen: Some(evidence.now),
            last_seen: Some(evidence.now),
            source_date: Some(evidence.source_date),
            confirmations: 1,
        });
    }

    /// Overwrite an entry in place, or append it when absent.
    pub fn replace(&mut self, entry: PendingConfirmation) {
        match self.position(&entry.key()) {
            Some(idx) => self.entries[idx] = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn remove(&mut self, key: &PendingKey) -> Option<PendingConfirmation> {
        self.position(key).map(|idx| self.entries.remove(idx))
    }

    /// The first `limit` hypotheses as `(category, value)` pairs.
    pub fn hypotheses(&self, limit: usize) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter(|entry| !entry.category.trim().is_empty() && !entry.value.trim().is_empty())
            .take(limit)
            .map(|entry| (entry.category.clone(), entry.value.clone()))
            .collect()
    }
}
