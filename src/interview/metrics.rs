use serde::{Deserialize, Serialize};

use crate::llm::{ChatMessage, MessageRole};
use crate::profile::{ConfirmationOutcome, Verdict};

const TRAILING_PUNCTUATION: &[char] = &['。', '、', '？', '?', '！', '!', '.', ','];

/// Per-session interview quality counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionMetrics {
    pub questions_total: usize,
    pub summary_check_turns: usize,
    pub structured_turns: usize,
    pub fallback_turns: usize,
    pub confirmation_attempts: usize,
    #[serde(rename = "confirmation_confirmed")]
    pub confirmed: usize,
    #[serde(rename = "confirmation_denied")]
    pub denied: usize,
    #[serde(rename = "confirmation_uncertain")]
    pub uncertain: usize,
    pub avg_answer_length: f64,
    pub duplicate_question_rate: f64,
}

/// Turn counters the session accumulates while asking questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnCounters {
    pub questions: usize,
    pub summary_checks: usize,
    pub structured: usize,
    pub fallback: usize,
}

impl SessionMetrics {
    pub fn collect(
        counters: TurnCounters,
        history: &[ChatMessage],
        outcomes: &[ConfirmationOutcome],
    ) -> Self {
        let mut metrics = Self {
            questions_total: counters.questions,
            summary_check_turns: counters.summary_checks,
            structured_turns: counters.structured,
            fallback_turns: counters.fallback,
            confirmation_attempts: outcomes.len(),
            ..Self::default()
        };

        for outcome in outcomes {
            match outcome.verdict {
                Verdict::Confirmed => metrics.confirmed += 1,
                Verdict::Denied => metrics.denied += 1,
                Verdict::Uncertain => metrics.uncertain += 1,
            }
        }

        let answer_chars: usize = history
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .map(|m| m.content.chars().count())
            .sum();
        if metrics.questions_total > 0 {
            metrics.avg_answer_length = answer_chars as f64 / metrics.questions_total as f64;
        }
        metrics.duplicate_question_rate = duplicate_rate(
            history
                .iter()
                .filter(|m| m.role == MessageRole::Assistant)
                .map(|m| m.content.as_str()),
        );
        metrics
    }
}

/// Lower-cased, whitespace-free form used to spot repeated questions.
pub fn normalize_question_key(question: &str) -> String {
    let collapsed: String = question
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    collapsed.trim_end_matches(TRAILING_PUNCTUATION).to_string()
}

fn duplicate_rate<'a>(questions: impl Iterator<Item = &'a str>) -> f64 {
    let mut seen = std::collections::HashSet::new();
    let mut asked = 0usize;
    for key in questions.map(normalize_question_key).filter(|k| !k.is_empty()) {
        asked += 1;
        seen.insert(key);
    }
    if asked == 0 {
        return 0.0;
    }
    ((asked - seen.len()) as f64 / asked as f64).clamp(0.0, 1.0)
}
