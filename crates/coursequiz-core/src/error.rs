//! Question authoring errors.
//!
//! These represent malformed question data: a bank or page that breaks the
//! question invariants. They are raised when content is loaded or a session
//! is constructed, never by the session operations themselves.

use thiserror::Error;

use crate::model::QuestionId;

/// Errors raised when a question (or a list of them) breaks an invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    /// A question needs at least two options to be a choice.
    #[error("question {id} has {count} option(s), at least 2 required")]
    TooFewOptions { id: QuestionId, count: usize },

    /// The correct answer index does not point at an option.
    #[error("question {id}: correct_index {index} is out of range for {count} options")]
    CorrectIndexOutOfRange {
        id: QuestionId,
        index: usize,
        count: usize,
    },

    /// The prompt text is blank.
    #[error("question {0} has an empty prompt")]
    EmptyPrompt(QuestionId),

    /// Two questions in the same list share an id.
    #[error("duplicate question id: {0}")]
    DuplicateId(QuestionId),

    /// A quiz was built from an empty question list.
    #[error("a quiz needs at least one question")]
    EmptyQuiz,
}

