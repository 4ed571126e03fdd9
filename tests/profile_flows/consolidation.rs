use chrono::{Duration, NaiveDate, TimeZone, Utc};

use tsuzuri::profile::{
    CandidateUpdates, ConfirmationOutcome, ConfirmationResult, ItemStatus, JudgeMethod,
    MergeContext, PendingConfirmation, ProfileConflict, ProfileItem, UserProfile, Verdict,
    apply_confirmations, merge_candidates, pending_hypotheses,
};

fn ctx() -> MergeContext {
    MergeContext::new(
        NaiveDate::from_ymd_opt(2026, 2, 20).unwrap(),
        Utc.with_ymd_and_hms(2026, 2, 20, 21, 0, 0).unwrap(),
    )
}

fn confirmed(category: &str, value: &str) -> ConfirmationOutcome {
    ConfirmationOutcome {
        question_num: 4,
        category: category.into(),
        value: value.into(),
        question: format!("{value}で合っていますか？"),
        answer: "はい".into(),
        verdict: Verdict::Confirmed,
        method: JudgeMethod::Rule,
        reason: "positive token matched: はい".into(),
    }
}

#[test]
fn conflicting_fact_is_parked_as_pending() {
    let mut profile = UserProfile::new();
    profile
        .stable_facts
        .push(ProfileItem::new("在宅勤務", 0.8, ItemStatus::Observed));

    let updates = CandidateUpdates {
        stable_facts: vec![ProfileItem::new("出社中心", 0.7, ItemStatus::Observed)],
        conflicts: vec![ProfileConflict::new("stable_facts", "在宅勤務", "出社中心", 0.7)],
        ..CandidateUpdates::default()
    };
    let report = merge_candidates(&mut profile, &updates, &ctx());

    assert_eq!(profile.stable_facts.len(), 1);
    assert_eq!(profile.stable_facts[0].value, "在宅勤務");
    assert_eq!(profile.conflicts.len(), 1);
    assert_eq!(profile.pending_confirmations.len(), 1);
    let pending = profile.pending_confirmations.iter().next().unwrap();
    assert_eq!(pending.value, "出社中心");
    assert_eq!(pending.confirmations, 1);
    assert_eq!(report.pending, 1);
    assert_eq!(
        pending_hypotheses(&profile, 5),
        vec![("stable_facts".to_string(), "出社中心".to_string())]
    );
}

#[test]
fn merging_the_same_candidates_twice_is_idempotent() {
    let mut profile = UserProfile::new();
    let updates = CandidateUpdates {
        stable_facts: vec![ProfileItem::new("猫を飼っている", 0.9, ItemStatus::Confirmed)],
        ongoing_topics: vec![ProfileItem::new("資格勉強", 0.0, ItemStatus::Observed)],
        ..CandidateUpdates::default()
    };

    merge_candidates(&mut profile, &updates, &ctx());
    let first = profile.clone();
    merge_candidates(&mut profile, &updates, &ctx());

    assert_eq!(profile.stable_facts.len(), first.stable_facts.len());
    assert_eq!(profile.stable_facts[0].status, ItemStatus::Confirmed);
    assert!((profile.stable_facts[0].confidence - first.stable_facts[0].confidence).abs() < 1e-12);
    assert!((profile.ongoing_topics[0].confidence - 0.5).abs() < 1e-12);
}

#[test]
fn stale_items_decay_on_merge() {
    let mut profile = UserProfile::new();
    let mut stale = ProfileItem::new("ギター練習", 0.8, ItemStatus::Observed);
    stale.last_seen = Some(ctx().now - Duration::days(45));
    profile.ongoing_topics.push(stale);

    merge_candidates(&mut profile, &CandidateUpdates::default(), &ctx());

    assert!((profile.ongoing_topics[0].confidence - 0.76).abs() < 1e-9);
}

#[test]
fn partial_confirmation_then_promotion() {
    let mut profile = UserProfile::new();
    profile.pending_confirmations.replace(PendingConfirmation {
        category: "stable_facts".into(),
        value: "朝型".into(),
        confidence: 0.6,
        first_seen: None,
        last_seen: None,
        source_date: None,
        confirmations: 1,
    });

    let report = apply_confirmations(&mut profile, &[confirmed("stable_facts", "朝型")], &ctx());
    assert_eq!(report.partial, 1);
    assert!(profile.stable_facts.is_empty());
    let pending = profile.pending_confirmations.iter().next().unwrap();
    assert_eq!(pending.confirmations, 2);
    assert_eq!(
        profile.confirmation_history.last().unwrap().result,
        ConfirmationResult::PartialConfirmed
    );

    let report = apply_confirmations(&mut profile, &[confirmed("stable_facts", "朝型")], &ctx());
    assert_eq!(report.promoted, 1);
    assert!(profile.pending_confirmations.is_empty());
    assert_eq!(profile.stable_facts.len(), 1);
    assert_eq!(profile.stable_facts[0].status, ItemStatus::Confirmed);
    assert!((profile.stable_facts[0].confidence - 0.8).abs() < 1e-12);
    assert_eq!(profile.confirmation_history.len(), 2);
}

#[test]
fn denial_removes_pending_without_creating_items() {
    let mut profile = UserProfile::new();
    let updates = CandidateUpdates {
        ongoing_topics: vec![ProfileItem::new("引っ越し検討", 0.6, ItemStatus::Inferred)],
        ..CandidateUpdates::default()
    };
    merge_candidates(&mut profile, &updates, &ctx());
    assert_eq!(profile.pending_confirmations.len(), 1);

    let mut denied = confirmed("ongoing_topics", "引っ越し検討");
    denied.verdict = Verdict::Denied;
    denied.answer = "いいえ".into();
    let report = apply_confirmations(&mut profile, &[denied], &ctx());

    assert_eq!(report.denied, 1);
    assert!(profile.pending_confirmations.is_empty());
    assert!(profile.ongoing_topics.is_empty());
    assert_eq!(
        profile.confirmation_history.last().unwrap().result,
        ConfirmationResult::Denied
    );
}
