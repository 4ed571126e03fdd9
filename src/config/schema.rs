use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Lower bound on `interview.max_questions`; fewer turns cannot fit all three phases.
pub const MIN_MAX_QUESTIONS: usize = 3;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path the config was loaded from (not serialized).
    #[serde(skip)]
    pub config_path: PathBuf,
    /// UI and prompt locale: "ja" | "en". Empty means auto-detect.
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub interview: InterviewConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let interview = &self.interview;
        if interview.max_questions < MIN_MAX_QUESTIONS {
            return Err(ConfigError::Validation(format!(
                "interview.max_questions must be at least {MIN_MAX_QUESTIONS}, got {}",
                interview.max_questions
            )));
        }
        if interview.min_questions > interview.max_questions {
            return Err(ConfigError::Validation(format!(
                "interview.min_questions ({}) exceeds interview.max_questions ({})",
                interview.min_questions, interview.max_questions
            )));
        }
        Ok(())
    }

    pub fn profile_path(&self) -> PathBuf {
        expand_path(&self.profile.path, &default_profile_path())
    }

    pub fn metrics_path(&self) -> PathBuf {
        expand_path(&self.metrics.path, &default_metrics_path())
    }
}

fn expand_path(raw: &str, fallback: &str) -> PathBuf {
    let raw = raw.trim();
    let raw = if raw.is_empty() { fallback } else { raw };
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

// ── LLM ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Only "anthropic" is bundled.
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_provider() -> String {
    "anthropic".into()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            api_key: None,
            base_url: None,
        }
    }
}

// ── Interview ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewConfig {
    #[serde(default = "default_max_questions")]
    pub max_questions: usize,
    /// `/done` is refused once while the turn count is at or below this.
    #[serde(default = "default_min_questions")]
    pub min_questions: usize,
    /// Ask a summary-check question every N turns.
    #[serde(default = "default_summary_every")]
    pub summary_every: usize,
    #[serde(default = "default_max_unknowns_before_confirm")]
    pub max_unknowns_before_confirm: usize,
    /// "light" | "balanced" | "deep"
    #[serde(default = "default_empathy_style")]
    pub empathy_style: String,
    /// Below this many notes the session runs in few-notes mode.
    #[serde(default = "default_few_notes_threshold")]
    pub few_notes_threshold: usize,
    #[serde(default = "default_max_pending_hypotheses")]
    pub max_pending_hypotheses: usize,
}

fn default_max_questions() -> usize {
    8
}
fn default_min_questions() -> usize {
    3
}
fn default_summary_every() -> usize {
    2
}
fn default_max_unknowns_before_confirm() -> usize {
    3
}
fn default_empathy_style() -> String {
    "balanced".into()
}
fn default_few_notes_threshold() -> usize {
    10
}
fn default_max_pending_hypotheses() -> usize {
    5
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            max_questions: default_max_questions(),
            min_questions: default_min_questions(),
            summary_every: default_summary_every(),
            max_unknowns_before_confirm: default_max_unknowns_before_confirm(),
            empathy_style: default_empathy_style(),
            few_notes_threshold: default_few_notes_threshold(),
            max_pending_hypotheses: default_max_pending_hypotheses(),
        }
    }
}

// ── Profile ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_profile_path")]
    pub path: String,
    #[serde(default = "default_summary_max_items")]
    pub summary_max_items: usize,
}

fn default_true() -> bool {
    true
}
fn default_profile_path() -> String {
    crate::profile::store::DEFAULT_PROFILE_PATH.into()
}
fn default_summary_max_items() -> usize {
    8
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_profile_path(),
            summary_max_items: default_summary_max_items(),
        }
    }
}

// ── Metrics ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

fn default_metrics_path() -> String {
    "~/.tsuzuri/metrics.jsonl".into()
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_metrics_path(),
        }
    }
}
