//! Attempt reports with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::QuestionId;
use crate::scoring::{Grade, Outcome};
use crate::session::{QuestionStatus, QuizSession, ReviewFilter};

/// The record of one finished (or abandoned) quiz attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// What was attempted.
    pub source: SourceSummary,
    /// One record per question, in quiz order.
    pub answers: Vec<AnswerRecord>,
    pub outcome: Outcome,
    pub grade: Grade,
    pub pass_mark: u8,
    pub passed: bool,
    /// Wall-clock duration of the attempt in milliseconds.
    pub duration_ms: u64,
    /// The attempt was submitted by the time limit rather than the learner.
    #[serde(default)]
    pub timed_out: bool,
}

/// Summary of the bank or page quiz (without the full questions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSummary {
    pub id: String,
    pub name: String,
    /// Questions available in the source before selection.
    pub question_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub prompt: String,
    pub selected: Option<usize>,
    pub correct_index: usize,
    pub status: QuestionStatus,
    #[serde(default)]
    pub flagged: bool,
}

impl AttemptReport {
    /// Snapshot a session into a report.
    pub fn from_session(
        session: &QuizSession,
        source: SourceSummary,
        pass_mark: u8,
        duration_ms: u64,
        timed_out: bool,
    ) -> Self {
        let answers = session
            .questions()
            .iter()
            .enumerate()
            .map(|(i, q)| AnswerRecord {
                question_id: q.id.clone(),
                prompt: q.prompt.clone(),
                selected: session.answer_for(i),
                correct_index: q.correct_index,
                status: session.status(i),
                flagged: session.is_flagged(i),
            })
            .collect();
        let outcome = session.outcome();

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            source,
            answers,
            outcome,
            grade: outcome.grade(),
            pass_mark,
            passed: outcome.passed(pass_mark),
            duration_ms,
            timed_out,
        }
    }

    /// Default file name for this report inside an output directory.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.json",
            self.source.id,
            self.created_at.format("%Y%m%dT%H%M%S")
        )
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AttemptReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Records matching a review filter.
    pub fn filter(&self, filter: ReviewFilter) -> Vec<&AnswerRecord> {
        self.answers
            .iter()
            .filter(|a| filter.matches(a.status, a.flagged))
            .collect()
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## {}\n\n", self.source.name));
        md.push_str(&format!(
            "**Score:** {}/{} ({}%), {}{}\n\n",
            self.outcome.correct,
            self.outcome.total,
            self.outcome.percentage,
            if self.passed { "passed" } else { "not passed" },
            if self.timed_out { ", time expired" } else { "" }
        ));
        md.push_str(&format!("{}\n\n", self.grade.message()));

        md.push_str("| # | Question | Answer | Correct | Result |\n");
        md.push_str("|---|----------|--------|---------|--------|\n");
        for (i, a) in self.answers.iter().enumerate() {
            let answer = a
                .selected
                .map(|s| (s + 1).to_string())
                .unwrap_or_else(|| "-".to_string());
            let result = match a.status {
                QuestionStatus::Correct => "correct",
                QuestionStatus::Incorrect => "incorrect",
                QuestionStatus::Unanswered => "unanswered",
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} | {}{} |\n",
                i + 1,
                a.prompt.replace('|', "\\|"),
                answer,
                a.correct_index + 1,
                result,
                if a.flagged { " (flagged)" } else { "" }
            ));
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    fn session() -> QuizSession {
        let questions: Vec<Question> = (1..=4u64)
            .map(|i| {
                Question::new(
                    i,
                    format!("Question {i}"),
                    vec!["a".into(), "b".into(), "c".into()],
                    (i % 3) as usize,
                    "",
                )
            })
            .collect();
        let mut session = QuizSession::new(questions).unwrap();
        session.select_option(0, 1); // correct
        session.advance();
        session.select_option(1, 0); // incorrect
        session.toggle_flag(1);
        session.advance();
        session.select_option(2, 0); // correct
        session.finish();
        session
    }

    fn make_report() -> AttemptReport {
        AttemptReport::from_session(
            &session(),
            SourceSummary {
                id: "test".into(),
                name: "Test".into(),
                question_count: 10,
            },
            50,
            1234,
            false,
        )
    }

    #[test]
    fn report_from_session() {
        let report = make_report();
        assert_eq!(report.outcome.correct, 2);
        assert_eq!(report.outcome.total, 4);
        assert_eq!(report.outcome.percentage, 50);
        assert!(report.passed);
        assert_eq!(report.grade, Grade::Fair);
        assert_eq!(report.answers[3].status, QuestionStatus::Unanswered);
        assert_eq!(report.answers[1].selected, Some(0));
        assert!(report.answers[1].flagged);
    }

    #[test]
    fn filter_records() {
        let report = make_report();
        assert_eq!(report.filter(ReviewFilter::All).len(), 4);
        assert_eq!(report.filter(ReviewFilter::Correct).len(), 2);
        assert_eq!(report.filter(ReviewFilter::Incorrect).len(), 1);
        assert_eq!(report.filter(ReviewFilter::Unanswered).len(), 1);
        let flagged = report.filter(ReviewFilter::Flagged);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].question_id, QuestionId::Number(2));
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(report.file_name());

        report.save_json(&path).unwrap();
        let loaded = AttemptReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.source.id, "test");
        assert_eq!(loaded.answers.len(), 4);
        assert_eq!(loaded.outcome, report.outcome);
    }

    #[test]
    fn markdown_output() {
        let md = make_report().to_markdown();
        assert!(md.contains("## Test"));
        assert!(md.contains("2/4 (50%)"));
        assert!(md.contains("(flagged)"));
        assert!(md.contains("unanswered"));
    }
}
