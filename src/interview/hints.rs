use strum::{Display, EnumString};

use super::phase::{NoteMode, Phase};
use super::turn::Hypothesis;

/// Tone directive appended to every turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EmpathyStyle {
    Light,
    #[default]
    Balanced,
    Deep,
}

impl EmpathyStyle {
    /// Unknown or empty styles fall back to `balanced`.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.trim().parse().unwrap_or_default()
    }
}

pub fn phase_hint(locale: &str, mode: NoteMode, phase: Phase) -> String {
    let key = match (mode, phase) {
        (NoteMode::Normal, Phase::FactFinding) => "interview.phase.normal.fact_finding",
        (NoteMode::Normal, Phase::Deepening) => "interview.phase.normal.deepening",
        (NoteMode::Normal, Phase::Closing) => "interview.phase.normal.closing",
        (NoteMode::FewNotes, Phase::FactFinding) => "interview.phase.few_notes.fact_finding",
        (NoteMode::FewNotes, Phase::Deepening) => "interview.phase.few_notes.deepening",
        (NoteMode::FewNotes, Phase::Closing) => "interview.phase.few_notes.closing",
    };
    t!(key, locale = locale).into_owned()
}

pub fn empathy_hint(locale: &str, style: EmpathyStyle) -> String {
    let key = match style {
        EmpathyStyle::Light => "interview.empathy.light",
        EmpathyStyle::Balanced => "interview.empathy.balanced",
        EmpathyStyle::Deep => "interview.empathy.deep",
    };
    t!(key, locale = locale).into_owned()
}

pub fn summary_check_hint(locale: &str) -> String {
    t!("interview.summary_check", locale = locale).into_owned()
}

pub fn unknowns_hint(locale: &str, unknowns: usize) -> String {
    t!("interview.unknowns", locale = locale, count = unknowns).into_owned()
}

pub fn pending_hint(locale: &str, hypothesis: &Hypothesis) -> String {
    t!(
        "interview.pending",
        locale = locale,
        category = hypothesis.category,
        value = hypothesis.value
    )
    .into_owned()
}
