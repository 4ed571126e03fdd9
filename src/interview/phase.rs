use serde::{Deserialize, Serialize};
use strum::Display;

/// Weight of each phase out of 8 (`fact-finding : deepening : closing`).
const TOTAL_WEIGHT: usize = 8;

/// Whether the day's notes are sparse enough to shift weight to deepening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NoteMode {
    Normal,
    FewNotes,
}

impl NoteMode {
    pub fn from_note_count(note_count: usize, threshold: usize) -> Self {
        if note_count < threshold {
            Self::FewNotes
        } else {
            Self::Normal
        }
    }

    /// `(fact-finding, fact-finding + deepening)` weights.
    fn weights(self) -> (usize, usize) {
        match self {
            Self::Normal => (3, 6),
            Self::FewNotes => (2, 6),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    FactFinding,
    Deepening,
    Closing,
}

/// Turn indices where the interview moves to the next phase.
///
/// Questions `[0, phase1_end)` are fact-finding, `[phase1_end, phase2_end)`
/// deepening and the rest closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseBoundaries {
    pub phase1_end: usize,
    pub phase2_end: usize,
}

impl PhaseBoundaries {
    pub fn compute(max_questions: usize, mode: NoteMode) -> Self {
        let (w1, w12) = mode.weights();
        let mut phase1_end = max_questions * w1 / TOTAL_WEIGHT;
        let mut phase2_end = max_questions * w12 / TOTAL_WEIGHT;

        phase1_end = phase1_end.max(1);
        if phase2_end <= phase1_end {
            phase2_end = phase1_end + 1;
        }
        if phase2_end >= max_questions {
            phase2_end = max_questions.saturating_sub(1);
        }

        Self {
            phase1_end,
            phase2_end,
        }
    }

    pub fn phase_at(self, question_num: usize) -> Phase {
        if question_num < self.phase1_end {
            Phase::FactFinding
        } else if question_num < self.phase2_end {
            Phase::Deepening
        } else {
            Phase::Closing
        }
    }

    /// Question budget per phase.
    pub fn counts(self, max_questions: usize) -> (usize, usize, usize) {
        (
            self.phase1_end,
            self.phase2_end.saturating_sub(self.phase1_end),
            max_questions.saturating_sub(self.phase2_end),
        )
    }
}
