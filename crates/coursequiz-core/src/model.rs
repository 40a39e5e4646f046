//! Core data model types for coursequiz.
//!
//! Questions are authored once and never mutated; sessions and pages only
//! ever hold them behind shared references.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuestionError;

/// Identifier of a question, unique within its containing list.
///
/// Course content uses both numeric ids (question banks) and string ids
/// (inline checks such as `"pf-1-1-check1"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(u64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{n}"),
            QuestionId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for QuestionId {
    fn from(n: u64) -> Self {
        QuestionId::Number(n)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        QuestionId::Text(s.to_string())
    }
}

impl From<String> for QuestionId {
    fn from(s: String) -> Self {
        QuestionId::Text(s)
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within the containing list.
    pub id: QuestionId,
    /// Display text.
    #[serde(alias = "question")]
    pub prompt: String,
    /// Ordered option texts.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    #[serde(alias = "correct_answer", alias = "correctIndex", alias = "correctAnswer")]
    pub correct_index: usize,
    /// Shown once the question has been answered.
    #[serde(default)]
    pub explanation: String,
    /// Course section the question belongs to (e.g. "1.1").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Question {
    /// Build a question with no metadata.
    pub fn new(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            options,
            correct_index,
            explanation: explanation.into(),
            section: None,
            difficulty: None,
            topic: None,
            category: None,
        }
    }

    /// Check the question invariants: a non-empty prompt, at least two
    /// options, and a correct index that points at one of them.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt(self.id.clone()));
        }
        if self.options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                id: self.id.clone(),
                count: self.options.len(),
            });
        }
        if self.correct_index >= self.options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                id: self.id.clone(),
                index: self.correct_index,
                count: self.options.len(),
            });
        }
        Ok(())
    }

    /// Whether `option` is the correct answer.
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index
    }

    /// The text of the correct option.
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }
}

/// Validate every question in a list and check that ids are unique.
pub fn validate_questions(questions: &[Question]) -> Result<(), QuestionError> {
    let mut seen = HashSet::new();
    for question in questions {
        question.validate()?;
        if !seen.insert(&question.id) {
            return Err(QuestionError::DuplicateId(question.id.clone()));
        }
    }
    Ok(())
}

/// Difficulty level attached to bank questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Basic,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Basic => write!(f, "basic"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" | "easy" => Ok(Difficulty::Basic),
            "intermediate" | "medium" => Ok(Difficulty::Intermediate),
            "advanced" | "hard" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A named collection of questions, e.g. a module's question bank or a
/// mock exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// The questions in authoring order.
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Time allowed for a full attempt, if the bank is a timed exam.
    #[serde(default)]
    pub time_limit_secs: Option<u64>,
    /// Percentage needed to pass, overriding the configured default.
    #[serde(default)]
    pub pass_mark: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Basic.to_string(), "basic");
        assert_eq!(Difficulty::Advanced.to_string(), "advanced");
        assert_eq!(
            "Intermediate".parse::<Difficulty>().unwrap(),
            Difficulty::Intermediate
        );
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn question_validation() {
        let ok = Question::new(1, "Pick one", options(4), 3, "");
        assert!(ok.validate().is_ok());

        let too_few = Question::new(2, "Pick one", options(1), 0, "");
        assert!(matches!(
            too_few.validate(),
            Err(QuestionError::TooFewOptions { count: 1, .. })
        ));

        let out_of_range = Question::new(3, "Pick one", options(4), 4, "");
        assert!(matches!(
            out_of_range.validate(),
            Err(QuestionError::CorrectIndexOutOfRange { index: 4, .. })
        ));

        let blank = Question::new("blank", "   ", options(2), 0, "");
        assert_eq!(
            blank.validate(),
            Err(QuestionError::EmptyPrompt(QuestionId::from("blank")))
        );
    }

    #[test]
    fn duplicate_ids_rejected() {
        let questions = vec![
            Question::new(1, "First", options(2), 0, ""),
            Question::new(1, "Second", options(2), 1, ""),
        ];
        assert_eq!(
            validate_questions(&questions),
            Err(QuestionError::DuplicateId(QuestionId::Number(1)))
        );
    }

    #[test]
    fn question_id_deserializes_numbers_and_strings() {
        let json = r#"[{"id": 7, "prompt": "a", "options": ["x", "y"], "correct_index": 0},
                       {"id": "pf-1-1-check1", "question": "b", "options": ["x", "y"], "correctIndex": 1}]"#;
        let questions: Vec<Question> = serde_json::from_str(json).unwrap();
        assert_eq!(questions[0].id, QuestionId::Number(7));
        assert_eq!(questions[1].id, QuestionId::from("pf-1-1-check1"));
        assert_eq!(questions[1].prompt, "b");
        assert_eq!(questions[1].correct_index, 1);
        assert_eq!(questions[1].correct_option(), Some("y"));
    }
}
