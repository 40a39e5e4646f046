//! Score outcome and grade bands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Final (or running) result of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Questions answered correctly.
    pub correct: usize,
    /// Questions in the quiz.
    pub total: usize,
    /// `correct / total` as a whole percentage, rounded half-up.
    pub percentage: u8,
}

impl Outcome {
    pub fn new(correct: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            ((correct as f64 / total as f64) * 100.0).round().min(100.0) as u8
        };
        Self {
            correct,
            total,
            percentage,
        }
    }

    /// Whether the percentage reaches `pass_mark`.
    pub fn passed(&self, pass_mark: u8) -> bool {
        self.percentage >= pass_mark
    }

    pub fn grade(&self) -> Grade {
        Grade::from_percentage(self.percentage)
    }
}

/// Feedback band for a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    NeedsReview,
}

impl Grade {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            80.. => Grade::Excellent,
            60..=79 => Grade::Good,
            40..=59 => Grade::Fair,
            _ => Grade::NeedsReview,
        }
    }

    /// Feedback shown alongside the final score.
    pub fn message(&self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent! You have a strong understanding of this section.",
            Grade::Good => "Good work! You have a solid grasp of the basics with room for improvement.",
            Grade::Fair => "Fair effort. Consider reviewing the material to strengthen your understanding.",
            Grade::NeedsReview => {
                "You may need to review the content more thoroughly before proceeding."
            }
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Excellent => write!(f, "excellent"),
            Grade::Good => write!(f, "good"),
            Grade::Fair => write!(f, "fair"),
            Grade::NeedsReview => write!(f, "needs review"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(Outcome::new(2, 3).percentage, 67);
        assert_eq!(Outcome::new(1, 8).percentage, 13);
        assert_eq!(Outcome::new(1, 3).percentage, 33);
        assert_eq!(Outcome::new(3, 3).percentage, 100);
    }

    #[test]
    fn empty_outcome_is_zero() {
        let outcome = Outcome::new(0, 0);
        assert_eq!(outcome.percentage, 0);
        assert!(!outcome.passed(1));
    }

    #[test]
    fn grade_bands() {
        assert_eq!(Grade::from_percentage(100), Grade::Excellent);
        assert_eq!(Grade::from_percentage(80), Grade::Excellent);
        assert_eq!(Grade::from_percentage(79), Grade::Good);
        assert_eq!(Grade::from_percentage(60), Grade::Good);
        assert_eq!(Grade::from_percentage(40), Grade::Fair);
        assert_eq!(Grade::from_percentage(39), Grade::NeedsReview);
        assert_eq!(Grade::from_percentage(0), Grade::NeedsReview);
    }

    #[test]
    fn pass_mark() {
        let outcome = Outcome::new(8, 10);
        assert!(outcome.passed(80));
        assert!(!outcome.passed(81));
        assert_eq!(outcome.grade(), Grade::Excellent);
    }
}
