//! Course page content: the static shell around inline checks and the
//! section quiz.
//!
//! A page is pure data. It owns its questions; the presentation layer builds
//! an [`InlineCheck`] per referenced check and one [`QuizSession`] for the
//! quiz, each independent of the others.

use serde::{Deserialize, Serialize};

use crate::error::QuestionError;
use crate::inline_check::InlineCheck;
use crate::model::{Question, QuestionId};
use crate::session::QuizSession;

/// A single course page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    #[serde(rename = "page")]
    pub meta: PageMeta,
    /// "In 30 seconds" style summary boxes at the top of the page.
    #[serde(default)]
    pub summary: Vec<SummaryBox>,
    /// Learning outcomes checklist.
    #[serde(default)]
    pub outcomes: Vec<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Quick-check questions referenced from sections by id.
    #[serde(default)]
    pub checks: Vec<Question>,
    #[serde(default)]
    pub worked_examples: Vec<WorkedExample>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub quiz: Option<PageQuiz>,
    #[serde(default)]
    pub nav: Navigation,
}

/// Page identity and the title/description pair used for document metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryBox {
    pub title: String,
    #[serde(default)]
    pub points: Vec<String>,
}

/// A numbered prose section, optionally followed by an inline check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub number: u32,
    pub title: String,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    /// Id of an entry in `Page::checks` shown after the prose.
    #[serde(default)]
    pub check: Option<QuestionId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkedExample {
    pub title: String,
    #[serde(default)]
    pub scenario: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub result: String,
}

/// FAQ entries are always shown expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageQuiz {
    #[serde(default = "default_quiz_title")]
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

fn default_quiz_title() -> String {
    "Knowledge Check".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Navigation {
    #[serde(default)]
    pub previous: Option<NavLink>,
    #[serde(default)]
    pub next: Option<NavLink>,
}

/// A plain route link to another page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub path: String,
}

impl Page {
    /// Look up an inline check question by id.
    pub fn check(&self, id: &QuestionId) -> Option<&Question> {
        self.checks.iter().find(|q| &q.id == id)
    }

    /// Build a fresh inline check for a section, if it references one.
    pub fn inline_check_for(&self, section: &Section) -> Option<Result<InlineCheck, QuestionError>> {
        let id = section.check.as_ref()?;
        let question = self.check(id)?;
        Some(InlineCheck::new(question.clone()))
    }

    /// Build a fresh session for the page quiz, if the page has one.
    pub fn quiz_session(&self) -> Option<Result<QuizSession, QuestionError>> {
        let quiz = self.quiz.as_ref()?;
        Some(QuizSession::new(quiz.questions.clone()))
    }
}
