use std::io::{self, BufRead, Write};

use crate::ui::style;

/// Answer that asks to end the interview.
pub const EXIT_TOKEN: &str = "/done";

/// Where questions are shown and answers come from.
pub trait AnswerSource {
    fn present_question(&mut self, num: usize, question: &str) -> io::Result<()>;

    /// Next trimmed answer, or `None` once input is exhausted.
    fn read_answer(&mut self) -> io::Result<Option<String>>;

    fn notice(&mut self, message: &str) -> io::Result<()>;
}

/// Line-based terminal interaction.
pub struct TerminalIo<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> TerminalIo<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.writer, "> ")?;
        self.writer.flush()
    }
}

impl<R: BufRead, W: Write> AnswerSource for TerminalIo<R, W> {
    fn present_question(&mut self, _num: usize, question: &str) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", style::question(question))?;
        writeln!(self.writer)?;
        self.prompt()
    }

    fn read_answer(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", style::notice(message))?;
        self.prompt()
    }
}

/// Replays a fixed list of answers; exhausted input reads as EOF.
#[derive(Debug, Default)]
pub struct ScriptedAnswers {
    answers: std::collections::VecDeque<String>,
    pub questions: Vec<String>,
    pub notices: Vec<String>,
}

impl ScriptedAnswers {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl AnswerSource for ScriptedAnswers {
    fn present_question(&mut self, _num: usize, question: &str) -> io::Result<()> {
        self.questions.push(question.to_string());
        Ok(())
    }

    fn read_answer(&mut self) -> io::Result<Option<String>> {
        Ok(self.answers.pop_front().map(|a| a.trim().to_string()))
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        self.notices.push(message.to_string());
        Ok(())
    }
}
