use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::history::{ConfirmationRecord, ConfirmationResult};
use super::merge::MergeContext;
use super::pending::PendingKey;
use super::types::{ItemStatus, ProfileCategory, ProfileItem, UserProfile, normalize_key};

/// Pending entries with fewer confirmations than this stay pending unless
/// their confidence already clears [`PROMOTE_CONFIDENCE`].
///
/// The count compared is the one held *before* the current "yes". A single
/// extraction plus one "yes" therefore stays `partial_confirmed` and the
/// second "yes" promotes. Comparing the incremented count instead would
/// promote on the first "yes", which skips the partial step.
pub const PROMOTE_CONFIRMATIONS: u32 = 2;
pub const PROMOTE_CONFIDENCE: f64 = 0.75;
/// Confidence floor for a promoted item.
pub const PROMOTED_MIN_CONFIDENCE: f64 = 0.8;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Verdict {
    Confirmed,
    Denied,
    Uncertain,
}

/// How a verdict was reached.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JudgeMethod {
    Rule,
    Llm,
}

/// The user's answer to a confirmation question, as judged during a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationOutcome {
    pub question_num: usize,
    pub category: String,
    pub value: String,
    pub question: String,
    pub answer: String,
    pub verdict: Verdict,
    pub method: JudgeMethod,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfirmationReport {
    pub promoted: usize,
    pub partial: usize,
    pub denied: usize,
    pub skipped: usize,
}

/// Apply session confirmation outcomes to the profile's pending hypotheses.
pub fn apply_confirmations(
    profile: &mut UserProfile,
    outcomes: &[ConfirmationOutcome],
    ctx: &MergeContext,
) -> ConfirmationReport {
    let mut report = ConfirmationReport::default();
    if outcomes.is_empty() {
        return report;
    }

    for outcome in outcomes {
        let category = outcome.category.trim();
        let value = outcome.value.trim();
        if category.is_empty() || value.is_empty() {
            report.skipped += 1;
            continue;
        }
        let key = PendingKey::new(category, value);

        let result = match outcome.verdict {
            Verdict::Uncertain => {
                report.skipped += 1;
                continue;
            }
            Verdict::Denied => {
                profile.pending_confirmations.remove(&key);
                report.denied += 1;
                ConfirmationResult::Denied
            }
            Verdict::Confirmed => {
                let Some(mut pending) = profile.pending_confirmations.get(&key).cloned() else {
                    tracing::debug!(category, value, "confirmed hypothesis is no longer pending");
                    report.skipped += 1;
                    continue;
                };
                let prior = pending.confirmations;
                pending.confirmations += 1;
                pending.last_seen = Some(ctx.now);
                pending.source_date = Some(ctx.source_date);

                if prior < PROMOTE_CONFIRMATIONS && pending.confidence < PROMOTE_CONFIDENCE {
                    profile.pending_confirmations.replace(pending);
                    report.partial += 1;
                    ConfirmationResult::PartialConfirmed
                } else {
                    promote(profile, category, value, pending.confidence, ctx);
                    profile.pending_confirmations.remove(&key);
                    report.promoted += 1;
                    ConfirmationResult::Confirmed
                }
            }
        };

        profile.confirmation_history.push(ConfirmationRecord {
            category: category.to_string(),
            value: value.to_string(),
            result,
            question: outcome.question.clone(),
            answer: outcome.answer.clone(),
            recorded_at: Some(ctx.now),
        });
    }

    profile.updated_at = Some(ctx.now);
    report
}

fn promote(
    profile: &mut UserProfile,
    category: &str,
    value: &str,
    confidence: f64,
    ctx: &MergeContext,
) {
    let Some(parsed) = ProfileCategory::parse(category) else {
        tracing::warn!(category, value, "cannot promote hypothesis with unknown category");
        return;
    };

    let confidence = PROMOTED_MIN_CONFIDENCE.max(confidence.clamp(0.0, 1.0));
    let key = normalize_key(value);
    let (items, _) = profile.items_and_pending_mut(parsed);
    match items.iter_mut().find(|item| item.key() == key) {
        Some(existing) => {
            existing.confidence = existing.confidence.max(confidence);
            existing.last_seen = Some(ctx.now);
            existing.source_date = Some(ctx.source_date);
            existing.status = ItemStatus::Confirmed;
        }
        None => items.push(ProfileItem {
            value: value.to_string(),
            confidence,
            last_seen: Some(ctx.now),
            source_date: Some(ctx.source_date),
            status: ItemStatus::Confirmed,
        }),
    }
}
