//! Quiz session state machine.
//!
//! A [`QuizSession`] walks a learner through an ordered list of questions one
//! at a time. The first answer to a question is final and immediately reveals
//! its explanation. The score is always derived from the recorded answers.
//!
//! Invalid calls (answering a question that is not current, an option out of
//! range, advancing past an unanswered question) are ignored and reported via
//! the `bool` return value; they never change state.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::QuestionError;
use crate::model::{validate_questions, Question, QuestionId};
use crate::scoring::Outcome;

/// Where the session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Showing the question at this index.
    InProgress(usize),
    /// Every question has been passed (or the quiz was submitted early).
    Finished,
}

/// Per-question result as seen from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Unanswered,
    Correct,
    Incorrect,
}

/// Filter for reviewing questions after (or during) an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewFilter {
    #[default]
    All,
    Correct,
    Incorrect,
    Unanswered,
    Flagged,
}

impl fmt::Display for ReviewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewFilter::All => write!(f, "all"),
            ReviewFilter::Correct => write!(f, "correct"),
            ReviewFilter::Incorrect => write!(f, "incorrect"),
            ReviewFilter::Unanswered => write!(f, "unanswered"),
            ReviewFilter::Flagged => write!(f, "flagged"),
        }
    }
}

impl FromStr for ReviewFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ReviewFilter::All),
            "correct" => Ok(ReviewFilter::Correct),
            "incorrect" | "wrong" => Ok(ReviewFilter::Incorrect),
            "unanswered" => Ok(ReviewFilter::Unanswered),
            "flagged" => Ok(ReviewFilter::Flagged),
            other => Err(format!("unknown review filter: {other}")),
        }
    }
}

impl ReviewFilter {
    /// Whether a question with this status and flag passes the filter.
    pub fn matches(&self, status: QuestionStatus, flagged: bool) -> bool {
        match self {
            ReviewFilter::All => true,
            ReviewFilter::Correct => status == QuestionStatus::Correct,
            ReviewFilter::Incorrect => status == QuestionStatus::Incorrect,
            ReviewFilter::Unanswered => status == QuestionStatus::Unanswered,
            ReviewFilter::Flagged => flagged,
        }
    }
}

/// Counts describing a session at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    pub correct: usize,
    pub flagged: usize,
}

/// A state change, delivered to every subscribed observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// An answer was recorded and the explanation revealed.
    Answered {
        index: usize,
        question_id: QuestionId,
        selected: usize,
        correct_index: usize,
        correct: bool,
    },
    Advanced { from: usize, to: usize },
    MovedBack { from: usize, to: usize },
    Jumped { from: usize, to: usize },
    Flagged { index: usize, flagged: bool },
    Finished { score: usize, total: usize },
    Restarted,
}

/// Receives session events so a presentation layer can re-render.
pub trait SessionObserver {
    fn on_event(&self, event: &SessionEvent);
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_event(&self, _: &SessionEvent) {}
}

/// Mutable progress through an immutable question list.
pub struct QuizSession {
    questions: Arc<[Question]>,
    current_index: usize,
    answers: HashMap<QuestionId, usize>,
    revealed: HashSet<QuestionId>,
    flagged: HashSet<QuestionId>,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions", &self.questions.len())
            .field("current_index", &self.current_index)
            .field("answers", &self.answers)
            .field("revealed", &self.revealed)
            .field("flagged", &self.flagged)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl QuizSession {
    /// Start a session in `InProgress(0)`.
    ///
    /// Fails if the list is empty, if any question breaks its invariants, or
    /// if two questions share an id.
    pub fn new(questions: impl Into<Arc<[Question]>>) -> Result<Self, QuestionError> {
        let questions = questions.into();
        if questions.is_empty() {
            return Err(QuestionError::EmptyQuiz);
        }
        validate_questions(&questions)?;

        Ok(Self {
            questions,
            current_index: 0,
            answers: HashMap::new(),
            revealed: HashSet::new(),
            flagged: HashSet::new(),
            observers: Vec::new(),
        })
    }

    /// Register an observer for all subsequent events.
    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    fn emit(&self, event: SessionEvent) {
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn state(&self) -> SessionState {
        if self.current_index >= self.questions.len() {
            SessionState::Finished
        } else {
            SessionState::InProgress(self.current_index)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state() == SessionState::Finished
    }

    /// Current pointer; equals `len()` once finished.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Record `option_index` as the answer to the current question.
    ///
    /// Returns `true` only when a new answer was recorded. The first answer
    /// is final: later calls for the same question are ignored.
    pub fn select_option(&mut self, question_index: usize, option_index: usize) -> bool {
        if question_index != self.current_index {
            tracing::debug!(
                question_index,
                current = self.current_index,
                "ignoring answer for a question that is not current"
            );
            return false;
        }
        let Some(question) = self.questions.get(question_index) else {
            tracing::debug!(question_index, "ignoring answer after the quiz finished");
            return false;
        };
        if option_index >= question.options.len() {
            tracing::debug!(
                question_id = %question.id,
                option_index,
                options = question.options.len(),
                "ignoring out-of-range option"
            );
            return false;
        }
        if self.answers.contains_key(&question.id) {
            tracing::debug!(question_id = %question.id, "question already answered");
            return false;
        }

        let question_id = question.id.clone();
        let correct_index = question.correct_index;
        self.answers.insert(question_id.clone(), option_index);
        self.revealed.insert(question_id.clone());

        self.emit(SessionEvent::Answered {
            index: question_index,
            question_id,
            selected: option_index,
            correct_index,
            correct: option_index == correct_index,
        });
        true
    }

    /// Move to the next question. A no-op until the current question is
    /// answered. Advancing from the last question finishes the session.
    pub fn advance(&mut self) -> bool {
        let Some(question) = self.current_question() else {
            return false;
        };
        if !self.revealed.contains(&question.id) {
            tracing::debug!(question_id = %question.id, "cannot advance past an unanswered question");
            return false;
        }

        let from = self.current_index;
        self.current_index += 1;
        self.emit(SessionEvent::Advanced {
            from,
            to: self.current_index,
        });
        if self.is_finished() {
            self.emit_finished();
        }
        true
    }

    /// Step back one question. Answers already given stay final.
    pub fn previous(&mut self) -> bool {
        if self.is_finished() || self.current_index == 0 {
            return false;
        }
        let from = self.current_index;
        self.current_index -= 1;
        self.emit(SessionEvent::MovedBack {
            from,
            to: self.current_index,
        });
        true
    }

    /// Submit the attempt now, leaving unanswered questions unanswered.
    pub fn finish(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.current_index = self.questions.len();
        self.emit_finished();
        true
    }

    fn emit_finished(&self) {
        self.emit(SessionEvent::Finished {
            score: self.score(),
            total: self.questions.len(),
        });
    }

    /// Discard all progress and return to `InProgress(0)`.
    pub fn restart(&mut self) {
        self.current_index = 0;
        self.answers.clear();
        self.revealed.clear();
        self.flagged.clear();
        self.emit(SessionEvent::Restarted);
    }

    /// Number of recorded answers that match the correct index.
    pub fn score(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| self.answers.get(&q.id) == Some(&q.correct_index))
            .count()
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::new(self.score(), self.questions.len())
    }

    /// The recorded answer for the question at `index`.
    pub fn answer_for(&self, index: usize) -> Option<usize> {
        let question = self.questions.get(index)?;
        self.answers.get(&question.id).copied()
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.questions
            .get(index)
            .is_some_and(|q| self.revealed.contains(&q.id))
    }

    pub fn status(&self, index: usize) -> QuestionStatus {
        match (self.questions.get(index), self.answer_for(index)) {
            (Some(question), Some(selected)) if question.is_correct(selected) => {
                QuestionStatus::Correct
            }
            (Some(_), Some(_)) => QuestionStatus::Incorrect,
            _ => QuestionStatus::Unanswered,
        }
    }

    /// Flag or unflag a question for later review. Returns the new flag.
    pub fn toggle_flag(&mut self, index: usize) -> bool {
        let Some(question) = self.questions.get(index) else {
            return false;
        };
        let id = question.id.clone();
        let flagged = if self.flagged.remove(&id) {
            false
        } else {
            self.flagged.insert(id);
            true
        };
        self.emit(SessionEvent::Flagged { index, flagged });
        flagged
    }

    pub fn is_flagged(&self, index: usize) -> bool {
        self.questions
            .get(index)
            .is_some_and(|q| self.flagged.contains(&q.id))
    }

    /// The next flagged question after `from`, wrapping round to the start.
    ///
    /// Only questions the learner has reached count: every question before
    /// the target must already be answered.
    pub fn next_flagged(&self, from: usize) -> Option<usize> {
        let len = self.questions.len();
        (1..len)
            .map(|step| (from + step) % len)
            .find(|&i| self.is_flagged(i) && (0..i).all(|j| self.is_revealed(j)))
    }

    /// Move to [`next_flagged`](Self::next_flagged) from the current question.
    pub fn jump_to_next_flagged(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        let from = self.current_index;
        let Some(to) = self.next_flagged(from) else {
            tracing::debug!(from, "no other reachable flagged question");
            return false;
        };
        self.current_index = to;
        self.emit(SessionEvent::Jumped { from, to });
        true
    }

    /// Indices of questions matching `filter`, in quiz order.
    pub fn review(&self, filter: ReviewFilter) -> Vec<usize> {
        (0..self.questions.len())
            .filter(|&i| filter.matches(self.status(i), self.is_flagged(i)))
            .collect()
    }

    pub fn summary(&self) -> SessionSummary {
        let answered = self.answers.len();
        SessionSummary {
            total: self.questions.len(),
            answered,
            unanswered: self.questions.len() - answered,
            correct: self.score(),
            flagged: self.flagged.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn question(id: u64, correct_index: usize) -> Question {
        Question::new(
            id,
            format!("Question {id}"),
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_index,
            format!("Explanation {id}"),
        )
    }

    fn three_questions() -> QuizSession {
        QuizSession::new(vec![question(1, 0), question(2, 1), question(3, 2)]).unwrap()
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<SessionEvent>>>);

    impl SessionObserver for Recorder {
        fn on_event(&self, event: &SessionEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    #[test]
    fn starts_in_progress_at_zero() {
        let session = three_questions();
        assert_eq!(session.state(), SessionState::InProgress(0));
        assert_eq!(session.score(), 0);
        assert!(!session.is_revealed(0));
    }

    #[test]
    fn empty_and_invalid_lists_rejected() {
        assert_eq!(
            QuizSession::new(Vec::<Question>::new()).unwrap_err(),
            QuestionError::EmptyQuiz
        );
        assert!(matches!(
            QuizSession::new(vec![question(1, 9)]),
            Err(QuestionError::CorrectIndexOutOfRange { .. })
        ));
        assert!(matches!(
            QuizSession::new(vec![question(1, 0), question(1, 1)]),
            Err(QuestionError::DuplicateId(_))
        ));
    }

    #[test]
    fn first_answer_is_final() {
        let mut session = three_questions();
        assert!(session.select_option(0, 2));
        assert!(!session.select_option(0, 0));
        assert_eq!(session.answer_for(0), Some(2));
        assert!(session.is_revealed(0));
        assert_eq!(session.status(0), QuestionStatus::Incorrect);
    }

    #[test]
    fn non_current_and_out_of_range_selections_ignored() {
        let mut session = three_questions();
        assert!(!session.select_option(1, 1));
        assert!(!session.select_option(0, 4));
        assert_eq!(session.answer_for(0), None);
        assert_eq!(session.answer_for(1), None);
        assert!(!session.is_revealed(0));
    }

    #[test]
    fn advance_requires_answer() {
        let mut session = three_questions();
        assert!(!session.advance());
        assert_eq!(session.current_index(), 0);

        session.select_option(0, 0);
        assert!(session.advance());
        assert_eq!(session.state(), SessionState::InProgress(1));
    }

    #[test]
    fn three_question_walkthrough_scores_two() {
        let mut session = three_questions();
        session.select_option(0, 0);
        session.advance();
        session.select_option(1, 3);
        session.advance();
        session.select_option(2, 2);
        session.advance();

        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.current_index(), session.len());
        assert_eq!(session.score(), 2);
        assert_eq!(session.outcome().percentage, 67);

        // Nothing moves once finished.
        assert!(!session.advance());
        assert!(!session.select_option(3, 0));
        assert_eq!(session.current_index(), 3);
    }

    #[test]
    fn score_is_available_mid_quiz() {
        let mut session = three_questions();
        session.select_option(0, 0);
        assert_eq!(session.score(), 1);
        assert_eq!(session.state(), SessionState::InProgress(0));
    }

    #[test]
    fn restart_mid_quiz_clears_everything() {
        let mut session = three_questions();
        session.select_option(0, 0);
        session.toggle_flag(0);
        session.advance();

        session.restart();
        assert_eq!(session.state(), SessionState::InProgress(0));
        assert_eq!(session.score(), 0);
        assert_eq!(session.answer_for(0), None);
        assert!((0..session.len()).all(|i| !session.is_revealed(i)));
        assert_eq!(session.summary().flagged, 0);

        // A fresh answer is accepted after restart.
        assert!(session.select_option(0, 1));
    }

    #[test]
    fn restart_from_finished() {
        let mut session = three_questions();
        session.finish();
        assert!(session.is_finished());
        session.restart();
        assert_eq!(session.state(), SessionState::InProgress(0));
    }

    #[test]
    fn previous_keeps_answers_final() {
        let mut session = three_questions();
        assert!(!session.previous());
        session.select_option(0, 1);
        session.advance();
        assert!(session.previous());
        assert_eq!(session.current_index(), 0);
        assert!(!session.select_option(0, 0));
        assert_eq!(session.answer_for(0), Some(1));
        // Already answered, so the learner can move forward again.
        assert!(session.advance());
    }

    #[test]
    fn finish_early_leaves_unanswered() {
        let mut session = three_questions();
        session.select_option(0, 0);
        assert!(session.finish());
        assert!(!session.finish());
        let summary = session.summary();
        assert_eq!(summary.answered, 1);
        assert_eq!(summary.unanswered, 2);
        assert_eq!(session.review(ReviewFilter::Unanswered), vec![1, 2]);
    }

    #[test]
    fn review_filters() {
        let mut session = three_questions();
        session.select_option(0, 0);
        session.toggle_flag(0);
        session.advance();
        session.select_option(1, 0);
        session.advance();
        session.toggle_flag(2);
        session.finish();

        assert_eq!(session.review(ReviewFilter::All), vec![0, 1, 2]);
        assert_eq!(session.review(ReviewFilter::Correct), vec![0]);
        assert_eq!(session.review(ReviewFilter::Incorrect), vec![1]);
        assert_eq!(session.review(ReviewFilter::Unanswered), vec![2]);
        assert_eq!(session.review(ReviewFilter::Flagged), vec![0, 2]);
    }

    #[test]
    fn toggle_flag_twice_unflags() {
        let mut session = three_questions();
        assert!(session.toggle_flag(1));
        assert!(session.is_flagged(1));
        assert!(!session.toggle_flag(1));
        assert!(!session.is_flagged(1));
    }

    #[test]
    fn next_flagged_wraps_and_skips_unreached() {
        let mut session = three_questions();
        session.toggle_flag(0);
        session.select_option(0, 0);
        session.advance();
        session.toggle_flag(1);
        session.toggle_flag(2);

        // Question 2 is not reachable until question 1 is answered.
        assert_eq!(session.next_flagged(1), Some(0));
        assert!(session.jump_to_next_flagged());
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.next_flagged(0), Some(1));

        session.advance();
        session.select_option(1, 1);
        assert_eq!(session.next_flagged(1), Some(2));
        assert!(session.jump_to_next_flagged());
        assert_eq!(session.state(), SessionState::InProgress(2));
    }

    #[test]
    fn jump_without_other_flags_is_ignored() {
        let mut session = three_questions();
        assert!(!session.jump_to_next_flagged());
        session.toggle_flag(0);
        assert_eq!(session.next_flagged(0), None);
        assert!(!session.jump_to_next_flagged());
        session.finish();
        assert!(!session.jump_to_next_flagged());
        assert_eq!(session.current_index(), 3);
    }

    #[test]
    fn noop_observer_leaves_behaviour_unchanged() {
        let mut session = three_questions();
        session.subscribe(Box::new(NoopObserver));
        assert!(session.select_option(0, 0));
        assert!(session.advance());
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn observers_see_transitions() {
        let recorder = Recorder::default();
        let mut session = QuizSession::new(vec![question(1, 0)]).unwrap();
        session.subscribe(Box::new(recorder.clone()));

        session.advance();
        session.select_option(0, 0);
        session.select_option(0, 1);
        session.advance();
        session.restart();

        let events = recorder.0.borrow();
        assert_eq!(
            *events,
            vec![
                SessionEvent::Answered {
                    index: 0,
                    question_id: QuestionId::Number(1),
                    selected: 0,
                    correct_index: 0,
                    correct: true,
                },
                SessionEvent::Advanced { from: 0, to: 1 },
                SessionEvent::Finished { score: 1, total: 1 },
                SessionEvent::Restarted,
            ]
        );
    }

    #[test]
    fn review_filter_parse() {
        assert_eq!("wrong".parse::<ReviewFilter>().unwrap(), ReviewFilter::Incorrect);
        assert_eq!(ReviewFilter::Flagged.to_string(), "flagged");
        assert!("maybe".parse::<ReviewFilter>().is_err());
    }
}
