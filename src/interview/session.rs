use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::llm::{ChatMessage, ChatProvider};
use crate::profile::ConfirmationOutcome;

use super::confirmation::{ConfirmationClassifier, ConfirmationVerdict};
use super::hints::{
    EmpathyStyle, empathy_hint, pending_hint, phase_hint, summary_check_hint, unknowns_hint,
};
use super::input::{AnswerSource, EXIT_TOKEN};
use super::metrics::{SessionMetrics, TurnCounters};
use super::phase::{NoteMode, Phase, PhaseBoundaries};
use super::prompt::{next_turn_instruction, opening_instruction, system_prompt};
use super::state::TurnState;
use super::turn::{
    Hypothesis, TurnIntent, fallback_question, looks_like_summary_check, parse_turn_response,
};

pub const DEFAULT_SUMMARY_EVERY: usize = 2;
pub const DEFAULT_MAX_UNKNOWNS: usize = 3;
pub const DEFAULT_FEW_NOTES_THRESHOLD: usize = 10;

/// Knobs that shape how the interview adapts to the user.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub profile_summary: String,
    pub summary_every: usize,
    pub max_unknowns_before_confirm: usize,
    pub empathy_style: String,
    pub few_notes_threshold: usize,
    pub pending_hypotheses: Vec<Hypothesis>,
    pub locale: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            profile_summary: String::new(),
            summary_every: DEFAULT_SUMMARY_EVERY,
            max_unknowns_before_confirm: DEFAULT_MAX_UNKNOWNS,
            empathy_style: EmpathyStyle::default().to_string(),
            few_notes_threshold: DEFAULT_FEW_NOTES_THRESHOLD,
            pending_hypotheses: Vec::new(),
            locale: "ja".into(),
        }
    }
}

/// Everything needed to request one question, computed without mutating the session.
#[derive(Debug, Clone)]
pub struct TurnPlan {
    pub messages: Vec<ChatMessage>,
    /// 1-based number of the question being requested.
    pub question_num: usize,
    pub phase: Phase,
    pub confirmation_target: Option<Hypothesis>,
    pub summary_check_due: bool,
}

/// Result of a finished interview.
#[derive(Debug, Clone, Default)]
pub struct SessionTranscript {
    pub history: Vec<ChatMessage>,
    pub outcomes: Vec<ConfirmationOutcome>,
    pub metrics: SessionMetrics,
}

pub struct Session {
    system_prompt: String,
    locale: String,
    mode: NoteMode,
    boundaries: PhaseBoundaries,
    max_questions: usize,
    min_questions: usize,
    summary_every: usize,
    max_unknowns_before_confirm: usize,
    empathy: EmpathyStyle,
    pending: Vec<Hypothesis>,
    state: TurnState,
    counters: TurnCounters,
    history: Vec<ChatMessage>,
    outcomes: Vec<ConfirmationOutcome>,
}

impl Session {
    pub fn new(
        notes: &str,
        note_count: usize,
        max_questions: usize,
        min_questions: usize,
        options: SessionOptions,
    ) -> Self {
        let threshold = non_zero_or(options.few_notes_threshold, DEFAULT_FEW_NOTES_THRESHOLD);
        let mode = NoteMode::from_note_count(note_count, threshold);
        let boundaries = PhaseBoundaries::compute(max_questions, mode);
        let locale = if options.locale.trim().is_empty() {
            "ja".to_string()
        } else {
            options.locale
        };
        let system_prompt = system_prompt(
            &locale,
            mode,
            boundaries.counts(max_questions),
            notes,
            &options.profile_summary,
        );

        Self {
            system_prompt,
            locale,
            mode,
            boundaries,
            max_questions,
            min_questions,
            summary_every: non_zero_or(options.summary_every, DEFAULT_SUMMARY_EVERY),
            max_unknowns_before_confirm: non_zero_or(
                options.max_unknowns_before_confirm,
                DEFAULT_MAX_UNKNOWNS,
            ),
            empathy: EmpathyStyle::parse_lenient(&options.empathy_style),
            pending: options.pending_hypotheses,
            state: TurnState::default(),
            counters: TurnCounters::default(),
            history: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn mode(&self) -> NoteMode {
        self.mode
    }

    pub fn boundaries(&self) -> PhaseBoundaries {
        self.boundaries
    }

    pub fn questions_asked(&self) -> usize {
        self.counters.questions
    }

    pub fn unknowns(&self) -> usize {
        self.state.unknowns
    }

    pub fn pending_hypotheses(&self) -> &[Hypothesis] {
        &self.pending
    }

    fn summary_check_due(&self) -> bool {
        let asked = self.counters.questions;
        asked > 0 && asked % self.summary_every == 0
    }

    fn unknowns_confirmation_due(&self) -> bool {
        self.state.unknowns >= self.max_unknowns_before_confirm
    }

    pub fn plan_turn(&self) -> TurnPlan {
        let asked = self.counters.questions;
        let phase = self.boundaries.phase_at(asked);
        let empathy = empathy_hint(&self.locale, self.empathy);
        let mut messages = self.history.clone();

        if self.history.is_empty() {
            messages.push(ChatMessage::user(opening_instruction(
                &self.locale,
                self.mode,
                &empathy,
            )));
            return TurnPlan {
                messages,
                question_num: asked + 1,
                phase,
                confirmation_target: None,
                summary_check_due: false,
            };
        }

        let summary_check_due = self.summary_check_due();
        let unknowns_due = self.unknowns_confirmation_due();
        let confirmation_target = if summary_check_due || unknowns_due {
            self.pending.first().cloned()
        } else {
            None
        };

        let mut hints = Vec::with_capacity(4);
        if let Some(target) = &confirmation_target {
            hints.push(pending_hint(&self.locale, target));
        }
        if summary_check_due {
            hints.push(summary_check_hint(&self.locale));
        }
        if unknowns_due {
            hints.push(unknowns_hint(&self.locale, self.state.unknowns));
        }
        hints.push(empathy);

        messages.push(ChatMessage::user(next_turn_instruction(
            &self.locale,
            &phase_hint(&self.locale, self.mode, phase),
            &hints.join(" "),
            asked + 1,
            self.max_questions,
        )));

        TurnPlan {
            messages,
            question_num: asked + 1,
            phase,
            confirmation_target,
            summary_check_due,
        }
    }

    /// Turn a raw model reply into the question shown to the user.
    pub fn accept_question(&mut self, raw: &str) -> String {
        self.counters.questions += 1;
        match parse_turn_response(raw) {
            Ok(turn) => {
                self.counters.structured += 1;
                if turn.summary_check || turn.intent() == Some(TurnIntent::SummaryCheck) {
                    self.counters.summary_checks += 1;
                }
                debug!(
                    turn = self.counters.questions,
                    intent = %turn.intent,
                    note = %turn.reasoning_note,
                    "structured question"
                );
                turn.question
            }
            Err(err) => {
                warn!(turn = self.counters.questions, "falling back to raw question: {err}");
                self.counters.fallback += 1;
                let question = fallback_question(raw);
                if looks_like_summary_check(&question) {
                    self.counters.summary_checks += 1;
                }
                question
            }
        }
    }

    /// Record an answered turn.
    pub fn complete_turn(
        &mut self,
        plan: &TurnPlan,
        question: String,
        answer: String,
        verdict: Option<ConfirmationVerdict>,
    ) {
        self.state.update_from_answer(&answer);

        if let (Some(target), Some(verdict)) = (&plan.confirmation_target, verdict) {
            debug!(
                category = %target.category,
                verdict = %verdict.verdict,
                method = %verdict.method,
                "confirmation answered"
            );
            if verdict.is_decisive() {
                self.pending.retain(|h| !h.matches(target));
            }
            self.outcomes.push(ConfirmationOutcome {
                question_num: plan.question_num,
                category: target.category.clone(),
                value: target.value.clone(),
                question: question.clone(),
                answer: answer.clone(),
                verdict: verdict.verdict,
                method: verdict.method,
                reason: verdict.reason,
            });
        }

        self.history.push(ChatMessage::assistant(question));
        self.history.push(ChatMessage::user(answer));
    }

    /// Run the interview until the question budget, an honored exit, or end of input.
    pub async fn run(
        &mut self,
        provider: &dyn ChatProvider,
        io: &mut dyn AnswerSource,
    ) -> Result<SessionTranscript, SessionError> {
        let locale = self.locale.clone();
        let classifier = ConfirmationClassifier::new(Some(provider), &locale);
        info!(
            mode = %self.mode,
            max_questions = self.max_questions,
            pending = self.pending.len(),
            "interview started"
        );

        while self.counters.questions < self.max_questions {
            let plan = self.plan_turn();
            let raw = provider
                .chat(&self.system_prompt, &plan.messages)
                .await
                .map_err(|source| SessionError::QuestionGeneration {
                    turn: plan.question_num,
                    source,
                })?;
            let question = self.accept_question(&raw);
            debug!(turn = plan.question_num, phase = %plan.phase, "asking");
            io.present_question(plan.question_num, &question)?;

            let Some(mut answer) = io.read_answer()? else {
                break;
            };
            if answer == EXIT_TOKEN {
                if plan.question_num > self.min_questions {
                    break;
                }
                let remaining = self.min_questions - plan.question_num + 1;
                io.notice(&t!(
                    "session.min_questions_notice",
                    locale = locale.as_str(),
                    min = self.min_questions,
                    remaining = remaining
                ))?;
                match io.read_answer()? {
                    Some(retry) if retry != EXIT_TOKEN => answer = retry,
                    _ => break,
                }
            }

            let verdict = match &plan.confirmation_target {
                Some(target) => Some(classifier.classify(&question, &answer, target).await),
                None => None,
            };
            self.complete_turn(&plan, question, answer, verdict);
        }

        info!(
            questions = self.counters.questions,
            confirmations = self.outcomes.len(),
            "interview finished"
        );
        Ok(self.transcript())
    }

    pub fn transcript(&self) -> SessionTranscript {
        SessionTranscript {
            history: self.history.clone(),
            outcomes: self.outcomes.clone(),
            metrics: SessionMetrics::collect(self.counters, &self.history, &self.outcomes),
        }
    }
}

fn non_zero_or(value: usize, default: usize) -> usize {
    if value == 0 { default } else { value }
}
