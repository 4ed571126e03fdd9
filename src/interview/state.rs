/// Answers shorter than this many characters count as leaving something unclear.
const SHORT_ANSWER_CHARS: usize = 20;

/// Rough per-session signal of how much is still unclear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnState {
    pub unknowns: usize,
}

impl TurnState {
    pub fn update_from_answer(&mut self, answer: &str) {
        let answer = answer.trim();
        if answer.is_empty() || answer.chars().count() < SHORT_ANSWER_CHARS {
            self.unknowns += 1;
        } else {
            self.unknowns = self.unknowns.saturating_sub(1);
        }
    }
}
