use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::profile::Verdict;
use crate::profile::learn::strip_code_fence;
use crate::profile::lenient::null_as_default;
use crate::profile::types::normalize_key;

/// What the model says a turn is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TurnIntent {
    FactCheck,
    DeepDive,
    SummaryCheck,
    ConfirmHypothesis,
    Closing,
}

/// A pending `(category, value)` pair the session may ask about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hypothesis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

impl Hypothesis {
    pub fn new(category: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, other: &Self) -> bool {
        normalize_key(&self.category) == normalize_key(&other.category)
            && normalize_key(&self.value) == normalize_key(&other.value)
    }
}

/// Structured reply requested from the model each turn. Only `question`
/// reaches the user; `null` in any other field reads as unset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TurnResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub intent: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary_check: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub empathy_line: String,
    #[serde(deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(deserialize_with = "null_as_default")]
    pub reasoning_note: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state_update_hint: String,
    pub confirmation_target: Option<Hypothesis>,
}

impl TurnResponse {
    pub fn intent(&self) -> Option<TurnIntent> {
        self.intent.trim().to_lowercase().parse().ok()
    }
}

#[derive(Debug, Error)]
pub enum TurnParseError {
    #[error("reply is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reply has no question")]
    EmptyQuestion,
}

/// Schema instruction appended to every question request.
pub fn turn_schema_instruction(locale: &str) -> String {
    t!("interview.turn_schema", locale = locale).into_owned()
}

fn parse_json_object<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    let text = strip_code_fence(raw);
    serde_json::from_str(text).or_else(|err| match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => serde_json::from_str(&text[start..=end]),
        _ => Err(err),
    })
}

pub fn parse_turn_response(raw: &str) -> Result<TurnResponse, TurnParseError> {
    let mut turn: TurnResponse = parse_json_object(raw)?;
    turn.question = normalize_question(&turn.question);
    if turn.question.is_empty() {
        return Err(TurnParseError::EmptyQuestion);
    }
    Ok(turn)
}

/// First non-empty line, cut right after the first question mark.
pub fn normalize_question(raw: &str) -> String {
    let Some(line) = raw.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return String::new();
    };
    match line.find(['？', '?']) {
        Some(idx) => {
            let mark_len = line[idx..].chars().next().map_or(0, char::len_utf8);
            line[..idx + mark_len].to_string()
        }
        None => line.to_string(),
    }
}

/// Question to show when the model ignored the schema.
pub fn fallback_question(raw: &str) -> String {
    normalize_question(strip_code_fence(raw))
}

/// Heuristic summary-check detection for unstructured questions.
pub fn looks_like_summary_check(question: &str) -> bool {
    question.contains("つまり") || question.to_lowercase().contains("in other words")
}

#[derive(Debug, Deserialize)]
struct JudgeResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    result: String,
    #[serde(default, deserialize_with = "null_as_default")]
    reason: String,
}

/// Parse a `{result, reason}` judge reply; unknown results read as uncertain.
pub fn parse_judge_response(raw: &str) -> Result<(Verdict, String), serde_json::Error> {
    let judge: JudgeResponse = parse_json_object(raw)?;
    let verdict = judge
        .result
        .trim()
        .to_lowercase()
        .parse()
        .unwrap_or(Verdict::Uncertain);
    Ok((verdict, judge.reason.trim().to_string()))
}
