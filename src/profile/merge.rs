use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::pending::{Evidence, PendingBook, PendingKey};
use super::types::{
    CURRENT_VERSION, CandidateUpdates, ItemStatus, ProfileCategory, ProfileConflict, ProfileItem,
    UserPreferences, UserProfile, clamp_confidence, normalize_key,
};

/// Items unseen for longer than this lose confidence on every merge.
pub const DECAY_AFTER_DAYS: i64 = 30;
pub const DECAY_FACTOR: f64 = 0.95;

/// Clock and calendar inputs for a merge; injected so tests stay deterministic.
#[derive(Debug, Clone, Copy)]
pub struct MergeContext {
    pub source_date: NaiveDate,
    pub now: DateTime<Utc>,
}

impl MergeContext {
    pub fn new(source_date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self { source_date, now }
    }

    pub fn today(source_date: NaiveDate) -> Self {
        Self::new(source_date, Utc::now())
    }
}

/// Tally of what a merge did, for logging and the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added: usize,
    pub reinforced: usize,
    pub pending: usize,
    pub conflicts: usize,
    pub decayed: usize,
}

type BlockedSet = HashSet<(ProfileCategory, String)>;

/// Fold one day's candidate updates into the profile.
pub fn merge_candidates(
    profile: &mut UserProfile,
    updates: &CandidateUpdates,
    ctx: &MergeContext,
) -> MergeReport {
    let mut report = MergeReport::default();

    let blocked = merge_conflicts(&mut profile.conflicts, &updates.conflicts, ctx, &mut report);

    for category in ProfileCategory::ALL {
        let (items, pending) = profile.items_and_pending_mut(category);
        for candidate in updates.items(category) {
            merge_item(category, items, pending, candidate, &blocked, ctx, &mut report);
        }
    }

    merge_preferences(&mut profile.preferences, &updates.preferences);
    report.decayed = apply_decay(profile, ctx.now);

    profile.version = CURRENT_VERSION;
    profile.updated_at = Some(ctx.now);

    tracing::debug!(
        added = report.added,
        reinforced = report.reinforced,
        pending = report.pending,
        conflicts = report.conflicts,
        decayed = report.decayed,
        "merged candidate updates"
    );
    report
}

fn merge_conflicts(
    conflicts: &mut Vec<ProfileConflict>,
    incoming: &[ProfileConflict],
    ctx: &MergeContext,
    report: &mut MergeReport,
) -> BlockedSet {
    let mut blocked = BlockedSet::new();

    for conflict in incoming {
        let category = conflict.category.trim();
        let incoming_value = conflict.incoming_value.trim();
        if category.is_empty() || incoming_value.is_empty() {
            continue;
        }

        let mut fresh = ProfileConflict::new(
            category,
            conflict.existing_value.trim(),
            incoming_value,
            clamp_confidence(conflict.confidence),
        );
        fresh.source_date = Some(conflict.source_date.unwrap_or(ctx.source_date));
        fresh.detected_at = Some(ctx.now);

        let key = fresh.key();
        match conflicts.iter_mut().find(|c| c.key() == key) {
            Some(existing) => {
                existing.confidence = existing.confidence.max(fresh.confidence);
                existing.source_date = fresh.source_date;
                existing.detected_at = fresh.detected_at;
            }
            None => conflicts.push(fresh),
        }
        report.conflicts += 1;

        match ProfileCategory::parse(category) {
            Some(parsed) => {
                blocked.insert((parsed, normalize_key(incoming_value)));
            }
            None => tracing::warn!(category, "conflict names an unknown category"),
        }
    }

    blocked
}

fn merge_item(
    category: ProfileCategory,
    items: &mut Vec<ProfileItem>,
    pending: &mut PendingBook,
    candidate: &ProfileItem,
    blocked: &BlockedSet,
    ctx: &MergeContext,
    report: &mut MergeReport,
) {
    let key = normalize_key(&candidate.value);
    if key.is_empty() {
        return;
    }

    let category_name = category.to_string();
    let value = candidate.value.trim();
    let confidence = clamp_confidence(candidate.confidence);
    let source_date = candidate.source_date.unwrap_or(ctx.source_date);

    let existing = items.iter_mut().find(|item| item.key() == key);
    let needs_confirmation =
        candidate.status == ItemStatus::Inferred || blocked.contains(&(category, key.clone()));

    // A value already held as an item is reinforced, never re-queued.
    if needs_confirmation && existing.is_none() {
        pending.record_evidence(Evidence {
            category: &category_name,
            value,
            confidence,
            source_date: ctx.source_date,
            now: ctx.now,
        });
        report.pending += 1;
        return;
    }

    match existing {
        Some(existing) => {
            existing.confidence = existing.confidence.max(confidence);
            existing.last_seen = Some(ctx.now);
            existing.source_date = Some(source_date);
            existing.status = existing.status.max(candidate.status);
            report.reinforced += 1;
        }
        None => {
            items.push(ProfileItem {
                value: value.to_string(),
                confidence,
                last_seen: Some(ctx.now),
                source_date: Some(source_date),
                status: candidate.status,
            });
            report.added += 1;
        }
    }
    pending.remove(&PendingKey::new(&category_name, value));
}

fn merge_preferences(current: &mut UserPreferences, incoming: &UserPreferences) {
    if !incoming.empathy_style.is_empty() {
        current.empathy_style.clone_from(&incoming.empathy_style);
    }
    if !incoming.question_depth.is_empty() {
        current.question_depth.clone_from(&incoming.question_depth);
    }
    if incoming.avoid_topics.is_empty() {
        return;
    }

    let topics: BTreeSet<String> = current
        .avoid_topics
        .iter()
        .chain(incoming.avoid_topics.iter())
        .map(|topic| topic.trim())
        .filter(|topic| !topic.is_empty())
        .map(str::to_string)
        .collect();
    current.avoid_topics = topics.into_iter().collect();
}

fn apply_decay(profile: &mut UserProfile, now: DateTime<Utc>) -> usize {
    let cutoff = now - Duration::days(DECAY_AFTER_DAYS);
    let mut decayed = 0;
    for item in profile.all_items_mut() {
        if item.last_seen.is_some_and(|seen| seen < cutoff) {
            item.confidence = (item.confidence * DECAY_FACTOR).clamp(0.0, 1.0);
            decayed += 1;
        }
    }
    decayed
}
