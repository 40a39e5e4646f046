//! Terminal driver for quiz sessions and inline checks.

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::time::Instant;

use coursequiz_core::inline_check::InlineCheck;
use coursequiz_core::session::{QuizSession, SessionEvent, SessionObserver, SessionState};
use coursequiz_render::text;

/// One parsed line of learner input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Zero-based option index.
    Choose(usize),
    Next,
    Back,
    Flag,
    /// Jump to the next flagged question.
    NextFlagged,
    Submit,
    Unknown(String),
}

/// Options are typed 1-based; everything else is a single letter.
pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" | "n" => Input::Next,
        "p" => Input::Back,
        "f" => Input::Flag,
        "g" => Input::NextFlagged,
        "s" => Input::Submit,
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 => Input::Choose(n - 1),
            _ => Input::Unknown(line.to_string()),
        },
    }
}

/// What the next read produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Line {
    Text(String),
    Eof,
    TimedOut,
}

/// Line reader with an optional deadline shared by every read.
pub struct Console<R> {
    lines: Lines<R>,
    deadline: Option<Instant>,
    closed: bool,
}

impl<R: AsyncBufRead + Unpin> Console<R> {
    pub fn new(reader: R, deadline: Option<Instant>) -> Self {
        Self {
            lines: reader.lines(),
            deadline,
            closed: false,
        }
    }

    /// Input has reached EOF; later reads return `Line::Eof` immediately.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub async fn read_line(&mut self) -> Result<Line> {
        if self.closed {
            return Ok(Line::Eof);
        }
        let next = self.lines.next_line();
        let line = match self.deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, next).await {
                Ok(line) => line?,
                Err(_) => return Ok(Line::TimedOut),
            },
            None => next.await?,
        };
        match line {
            Some(text) => Ok(Line::Text(text)),
            None => {
                self.closed = true;
                Ok(Line::Eof)
            }
        }
    }
}

/// How an interactive quiz ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Advanced past the last question.
    Completed,
    /// Submitted early with `s` or by closing input.
    Submitted,
    TimedOut,
}

fn hint(session: &QuizSession, index: usize) -> String {
    let options = session
        .questions()
        .get(index)
        .map(|q| q.options.len())
        .unwrap_or(0);
    let flagged = if session.summary().flagged > 0 {
        "  [g] next flagged"
    } else {
        ""
    };
    if session.is_revealed(index) {
        format!("[Enter] next  [p] back  [f] flag{flagged}  [s] submit > ")
    } else {
        format!("[1-{options}] answer  [p] back  [f] flag{flagged}  [s] submit > ")
    }
}

/// Drive `session` from `console` until it finishes.
pub async fn run_quiz<R, W>(
    session: &mut QuizSession,
    console: &mut Console<R>,
    out: &mut W,
) -> Result<Ending>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    while let SessionState::InProgress(index) = session.state() {
        write!(out, "{}", text::question_card(session, index))?;
        write!(out, "{}", hint(session, index))?;
        out.flush()?;

        let line = match console.read_line().await? {
            Line::Text(line) => line,
            Line::Eof => {
                writeln!(out)?;
                session.finish();
                return Ok(Ending::Submitted);
            }
            Line::TimedOut => {
                writeln!(out, "\nTime is up. Your answers have been submitted.")?;
                session.finish();
                return Ok(Ending::TimedOut);
            }
        };

        match parse_input(&line) {
            Input::Choose(option) => {
                if !session.select_option(index, option) {
                    if session.is_revealed(index) {
                        writeln!(out, "This question has already been answered.")?;
                    } else {
                        let options = session.questions()[index].options.len();
                        writeln!(out, "Choose an option between 1 and {options}.")?;
                    }
                }
            }
            Input::Next => {
                if !session.advance() {
                    writeln!(out, "Answer the question first, or press s to submit.")?;
                }
            }
            Input::Back => {
                if !session.previous() {
                    writeln!(out, "This is the first question.")?;
                }
            }
            Input::Flag => {
                session.toggle_flag(index);
            }
            Input::NextFlagged => {
                if !session.jump_to_next_flagged() {
                    writeln!(out, "No other flagged question to go to.")?;
                }
            }
            Input::Submit => {
                session.finish();
                return Ok(Ending::Submitted);
            }
            Input::Unknown(input) => {
                writeln!(out, "Unrecognised input: {input}")?;
            }
        }
    }
    Ok(Ending::Completed)
}

/// Ask one inline check. Enter skips it.
pub async fn run_check<R, W>(
    check: &mut InlineCheck,
    console: &mut Console<R>,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let options = check.question().options.len();
    write!(out, "{}", text::check_card(check))?;
    loop {
        write!(out, "[1-{options}] answer  [Enter] skip > ")?;
        out.flush()?;
        let line = match console.read_line().await? {
            Line::Text(line) => line,
            Line::Eof | Line::TimedOut => {
                writeln!(out)?;
                return Ok(());
            }
        };
        match parse_input(&line) {
            Input::Choose(option) if check.select_option(option) => {
                write!(out, "{}", text::check_card(check))?;
                return Ok(());
            }
            Input::Next => return Ok(()),
            _ => writeln!(out, "Choose an option between 1 and {options}.")?,
        }
    }
}

/// Forwards session events to the log.
pub struct TracingObserver {
    pub source: String,
}

impl SessionObserver for TracingObserver {
    fn on_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Answered {
                question_id,
                correct,
                ..
            } => tracing::debug!(source = %self.source, %question_id, correct, "answered"),
            SessionEvent::Finished { score, total } => {
                tracing::info!(source = %self.source, score, total, "quiz finished")
            }
            other => tracing::trace!(source = %self.source, ?other, "session event"),
        }
    }
}
