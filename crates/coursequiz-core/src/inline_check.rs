//! Single-question "quick check" embedded in article prose.
//!
//! An inline check is a one-question [`QuizSession`] that never advances:
//! answering reveals the explanation and the check stays in its answered
//! state for as long as it lives.

use crate::error::QuestionError;
use crate::model::Question;
use crate::session::{QuizSession, SessionObserver};

/// Display state of an inline check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unanswered,
    Answered { selected: usize, correct: bool },
}

#[derive(Debug)]
pub struct InlineCheck {
    session: QuizSession,
}

impl InlineCheck {
    pub fn new(question: Question) -> Result<Self, QuestionError> {
        Ok(Self {
            session: QuizSession::new(vec![question])?,
        })
    }

    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.session.subscribe(observer);
    }

    pub fn question(&self) -> &Question {
        &self.session.questions()[0]
    }

    /// Answer the check. Only the first call has any effect.
    pub fn select_option(&mut self, option_index: usize) -> bool {
        self.session.select_option(0, option_index)
    }

    pub fn selected(&self) -> Option<usize> {
        self.session.answer_for(0)
    }

    pub fn is_answered(&self) -> bool {
        self.selected().is_some()
    }

    /// The explanation is visible once answered.
    pub fn is_revealed(&self) -> bool {
        self.session.is_revealed(0)
    }

    pub fn is_correct(&self) -> Option<bool> {
        self.selected().map(|s| self.question().is_correct(s))
    }

    pub fn state(&self) -> CheckState {
        match self.selected() {
            Some(selected) => CheckState::Answered {
                selected,
                correct: self.question().is_correct(selected),
            },
            None => CheckState::Unanswered,
        }
    }
}
