//! Adaptive diary interview: phase pacing, per-turn hints, the structured turn
//! protocol and confirmation of pending profile hypotheses.

pub mod confirmation;
pub mod hints;
pub mod input;
pub mod metrics;
pub mod phase;
pub mod prompt;
pub mod session;
pub mod state;
pub mod turn;

pub use confirmation::{ConfirmationClassifier, ConfirmationVerdict, classify_answer};
pub use hints::EmpathyStyle;
pub use input::{AnswerSource, EXIT_TOKEN, ScriptedAnswers, TerminalIo};
pub use metrics::SessionMetrics;
pub use phase::{NoteMode, Phase, PhaseBoundaries};
pub use session::{Session, SessionOptions, SessionTranscript, TurnPlan};
pub use state::TurnState;
pub use turn::{Hypothesis, TurnIntent, TurnResponse, parse_turn_response};
