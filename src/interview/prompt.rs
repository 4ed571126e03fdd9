//! Locale-specific prompt text for the interviewer.

use super::phase::NoteMode;
use super::turn::turn_schema_instruction;

/// Interviewer system prompt with phase budgets, notes and the optional profile section.
pub fn system_prompt(
    locale: &str,
    mode: NoteMode,
    counts: (usize, usize, usize),
    notes: &str,
    profile_summary: &str,
) -> String {
    let (p1, p2, p3) = counts;
    let key = match mode {
        NoteMode::Normal => "interview.system.normal",
        NoteMode::FewNotes => "interview.system.few_notes",
    };
    let mut prompt = t!(key, locale = locale, p1 = p1, p2 = p2, p3 = p3).into_owned();
    prompt.push_str(notes);

    let summary = profile_summary.trim();
    if !summary.is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(&t!("interview.system.profile_header", locale = locale));
        prompt.push('\n');
        prompt.push_str(summary);
    }
    prompt
}

/// First-turn request naming the opening phase.
pub fn opening_instruction(locale: &str, mode: NoteMode, empathy: &str) -> String {
    let key = match mode {
        NoteMode::Normal => "interview.opening.normal",
        NoteMode::FewNotes => "interview.opening.few_notes",
    };
    format!(
        "{} {empathy}\n{}",
        t!(key, locale = locale),
        turn_schema_instruction(locale)
    )
}

/// Request for question `num` of `max` carrying the phase and interaction hints.
pub fn next_turn_instruction(
    locale: &str,
    phase_hint: &str,
    interaction_hint: &str,
    num: usize,
    max: usize,
) -> String {
    format!(
        "{}\n{}",
        t!(
            "interview.next_turn",
            locale = locale,
            phase = phase_hint,
            interaction = interaction_hint,
            num = num,
            max = max
        ),
        turn_schema_instruction(locale)
    )
}
