use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::Config;
use crate::interview::{AnswerSource, Hypothesis, NoteMode, Session, SessionOptions, SessionTranscript};
use crate::llm::ChatProvider;
use crate::metrics::{MetricsLog, ProfileCounts, RunMetrics};
use crate::profile::{
    ConfirmationReport, MergeContext, MergeReport, ProfileLearner, ProfileStore, UserProfile,
    apply_confirmations, merge_candidates, pending_hypotheses, summary_for_prompt,
};
use crate::ui::style;

/// Inputs of one `tsuzuri run`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub notes_path: PathBuf,
    /// Overrides the number of non-empty lines in the notes file.
    pub note_count: Option<usize>,
    pub date: NaiveDate,
    pub transcript_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub transcript: SessionTranscript,
    pub merge: Option<MergeReport>,
    pub confirmations: Option<ConfirmationReport>,
    pub profile_saved: bool,
}

pub fn count_notes(notes: &str) -> usize {
    notes.lines().filter(|l| !l.trim().is_empty()).count()
}

/// Interview the user about `options.date`, then fold what was learned into the profile.
pub async fn run_interview(
    config: &Config,
    locale: &str,
    provider: &dyn ChatProvider,
    io: &mut dyn AnswerSource,
    options: &RunOptions,
) -> Result<RunSummary> {
    let notes = fs::read_to_string(&options.notes_path)
        .with_context(|| format!("Failed to read notes {}", options.notes_path.display()))?;
    if notes.trim().is_empty() {
        println!("{}", style::notice(t!("run.no_notes", locale = locale)));
        return Ok(RunSummary::default());
    }

    let note_count = options.note_count.unwrap_or_else(|| count_notes(&notes));
    let interview = &config.interview;
    let store = ProfileStore::new(config.profile_path());
    let profile = load_profile(config, locale, &store);
    let before = ProfileCounts::of(&profile);

    let session_options = SessionOptions {
        profile_summary: summary_for_prompt(&profile, config.profile.summary_max_items),
        summary_every: interview.summary_every,
        max_unknowns_before_confirm: interview.max_unknowns_before_confirm,
        empathy_style: interview.empathy_style.clone(),
        few_notes_threshold: interview.few_notes_threshold,
        pending_hypotheses: pending_hypotheses(&profile, interview.max_pending_hypotheses)
            .into_iter()
            .map(|(category, value)| Hypothesis::new(category, value))
            .collect(),
        locale: locale.to_string(),
    };
    let mut session = Session::new(
        &notes,
        note_count,
        interview.max_questions,
        interview.min_questions,
        session_options,
    );
    let mode_label = match session.mode() {
        NoteMode::Normal => t!("run.mode_normal", locale = locale),
        NoteMode::FewNotes => t!("run.mode_few_notes", locale = locale),
    };
    println!(
        "{}",
        t!("run.notes_loaded", locale = locale, count = note_count, mode = mode_label)
    );

    println!();
    println!("{}", style::header(t!("session.started", locale = locale)));
    println!(
        "{}",
        style::dim(t!("session.usage", locale = locale, max = interview.max_questions))
    );
    let transcript = session
        .run(provider, io)
        .await
        .context("Interview session failed")?;
    println!();
    println!("{}", style::header(t!("session.finished", locale = locale)));

    let mut summary = RunSummary {
        transcript,
        ..RunSummary::default()
    };
    let mut current = profile;
    if config.profile.enabled
        && let Some(updated) =
            learn(locale, provider, &store, &current, options.date, &mut summary).await
    {
        current = updated;
    }

    if let Some(path) = &options.transcript_path {
        write_transcript(path, &summary.transcript)?;
        println!(
            "{}",
            t!("run.transcript_saved", locale = locale, path = style::value(path.display()))
        );
    }

    if config.metrics.enabled {
        let run = RunMetrics::new(
            options.date,
            summary.transcript.metrics.clone(),
            before,
            ProfileCounts::of(&current),
        );
        if let Err(err) = MetricsLog::new(config.metrics_path()).append(&run) {
            warn!("metrics append failed: {err}");
            eprintln!(
                "{}",
                style::notice(t!("run.metrics_failed", locale = locale, error = err))
            );
        }
    }

    println!(
        "{}",
        t!(
            "run.questions_asked",
            locale = locale,
            count = summary.transcript.metrics.questions_total
        )
    );
    info!(
        date = %options.date,
        questions = summary.transcript.metrics.questions_total,
        profile_saved = summary.profile_saved,
        "run complete"
    );
    Ok(summary)
}

fn load_profile(config: &Config, locale: &str, store: &ProfileStore) -> UserProfile {
    if !config.profile.enabled {
        println!("{}", style::dim(t!("run.profile_disabled", locale = locale)));
        return UserProfile::new();
    }
    let loaded = store.load();
    if let Some(err) = loaded.warning {
        warn!(path = %store.path().display(), "profile reset: {err}");
        eprintln!(
            "{}",
            style::notice(t!("run.profile_warning", locale = locale, error = err))
        );
    }
    loaded.profile
}

/// Extract, merge, apply confirmations and save. Returns the saved profile.
async fn learn(
    locale: &str,
    provider: &dyn ChatProvider,
    store: &ProfileStore,
    current: &UserProfile,
    date: NaiveDate,
    summary: &mut RunSummary,
) -> Option<UserProfile> {
    println!("{}", style::dim(t!("run.learning", locale = locale)));

    let learner = ProfileLearner::new(provider, locale);
    let updates = match learner.extract(&summary.transcript.history, date, current).await {
        Ok(updates) => updates,
        Err(err) => {
            warn!("profile extraction failed: {err}");
            eprintln!(
                "{}",
                style::notice(t!("run.learning_failed", locale = locale, error = err))
            );
            return None;
        }
    };

    let mut updated = current.clone();
    let ctx = MergeContext::today(date);
    let merge = merge_candidates(&mut updated, &updates, &ctx);
    let confirmations = apply_confirmations(&mut updated, &summary.transcript.outcomes, &ctx);
    println!(
        "{}",
        t!(
            "run.merge_summary",
            locale = locale,
            added = merge.added,
            reinforced = merge.reinforced,
            pending = merge.pending,
            conflicts = merge.conflicts
        )
    );
    if !summary.transcript.outcomes.is_empty() {
        println!(
            "{}",
            t!(
                "run.confirmation_summary",
                locale = locale,
                promoted = confirmations.promoted,
                partial = confirmations.partial,
                denied = confirmations.denied
            )
        );
    }
    summary.merge = Some(merge);
    summary.confirmations = Some(confirmations);

    match store.save(&mut updated) {
        Ok(()) => {
            summary.profile_saved = true;
            println!(
                "{}",
                style::success(t!(
                    "run.profile_saved",
                    locale = locale,
                    path = store.path().display()
                ))
            );
            Some(updated)
        }
        Err(err) => {
            warn!("profile save failed: {err}");
            eprintln!(
                "{}",
                style::notice(t!("run.profile_save_failed", locale = locale, error = err))
            );
            None
        }
    }
}

fn write_transcript(path: &std::path::Path, transcript: &SessionTranscript) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&transcript.history)
        .context("Failed to serialize transcript")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
