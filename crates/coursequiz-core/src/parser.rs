//! TOML content parser.
//!
//! Loads question banks and course pages from TOML files and directories,
//! and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Question, QuestionBank};
use crate::page::Page;

/// Intermediate TOML structure for parsing question bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    time_limit_secs: Option<u64>,
    #[serde(default)]
    pass_mark: Option<u8>,
}

/// A parsed content file.
#[derive(Debug, Clone)]
pub enum Content {
    Bank(QuestionBank),
    Page(Box<Page>),
}

impl Content {
    pub fn name(&self) -> &str {
        match self {
            Content::Bank(bank) => &bank.name,
            Content::Page(page) => &page.meta.title,
        }
    }
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    if let Some(mark) = parsed.bank.pass_mark {
        anyhow::ensure!(
            mark <= 100,
            "{}: pass_mark must be between 0 and 100, got {mark}",
            source_path.display()
        );
    }

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions: parsed.questions,
        time_limit_secs: parsed.bank.time_limit_secs,
        pass_mark: parsed.bank.pass_mark,
    })
}

/// Parse a single TOML file into a `Page`.
pub fn parse_page(path: &Path) -> Result<Page> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read page: {}", path.display()))?;

    parse_page_str(&content, path)
}

/// Parse a TOML string into a `Page`.
pub fn parse_page_str(content: &str, source_path: &Path) -> Result<Page> {
    toml::from_str(content).with_context(|| format!("failed to parse TOML: {}", source_path.display()))
}

/// Parse a file that may hold either a bank (`[bank]`) or a page (`[page]`).
pub fn parse_content(path: &Path) -> Result<Content> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read content file: {}", path.display()))?;

    parse_content_str(&content, path)
}

pub fn parse_content_str(content: &str, source_path: &Path) -> Result<Content> {
    let value: toml::Table = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    if value.contains_key("bank") {
        Ok(Content::Bank(parse_bank_str(content, source_path)?))
    } else if value.contains_key("page") {
        Ok(Content::Page(Box::new(parse_page_str(content, source_path)?)))
    } else {
        anyhow::bail!(
            "{}: expected a [bank] or [page] table",
            source_path.display()
        )
    }
}

/// Recursively load all `.toml` banks and pages from a directory.
pub fn load_content_directory(dir: &Path) -> Result<Vec<Content>> {
    let mut items = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            items.extend(load_content_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_content(&path) {
                Ok(item) => items.push(item),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    tracing::info!("loaded {} content file(s) from {}", items.len(), dir.display());
    Ok(items)
}

/// A warning from content validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question or section the warning is about (if applicable).
    pub subject: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn about(subject: impl ToString, message: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.to_string()),
            message: message.into(),
        }
    }

    fn general(message: impl Into<String>) -> Self {
        Self {
            subject: None,
            message: message.into(),
        }
    }
}

/// Per-question checks shared by banks, page checks and page quizzes.
fn validate_question_list(questions: &[Question], warnings: &mut Vec<ValidationWarning>) {
    let mut seen_ids = HashSet::new();
    for question in questions {
        if let Err(e) = question.validate() {
            warnings.push(ValidationWarning::about(&question.id, e.to_string()));
        }
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning::about(
                &question.id,
                format!("duplicate question ID: {}", question.id),
            ));
        }
        if question.explanation.trim().is_empty() {
            warnings.push(ValidationWarning::about(&question.id, "explanation is empty"));
        }
    }
}

/// Validate a question bank for common issues.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning::general("bank has no questions"));
    }

    validate_question_list(&bank.questions, &mut warnings);

    if bank.time_limit_secs == Some(0) {
        warnings.push(ValidationWarning::general(
            "time_limit_secs is 0; the exam would end immediately",
        ));
    }

    warnings
}

/// Validate a course page for common issues.
pub fn validate_page(page: &Page) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    validate_question_list(&page.checks, &mut warnings);

    // Section numbering and check references
    let mut numbers = HashSet::new();
    let mut referenced = HashSet::new();
    for section in &page.sections {
        if !numbers.insert(section.number) {
            warnings.push(ValidationWarning::about(
                format!("section {}", section.number),
                format!("duplicate section number: {}", section.number),
            ));
        }
        if let Some(id) = &section.check {
            referenced.insert(id);
            if page.check(id).is_none() {
                warnings.push(ValidationWarning::about(
                    format!("section {}", section.number),
                    format!("references unknown inline check: {id}"),
                ));
            }
        }
    }

    for check in &page.checks {
        if !referenced.contains(&check.id) {
            warnings.push(ValidationWarning::about(
                &check.id,
                "inline check is not referenced by any section",
            ));
        }
    }

    match &page.quiz {
        Some(quiz) if quiz.questions.is_empty() => {
            warnings.push(ValidationWarning::general("quiz has no questions"));
        }
        Some(quiz) => validate_question_list(&quiz.questions, &mut warnings),
        None => warnings.push(ValidationWarning::general("page has no quiz")),
    }

    if page.meta.description.trim().is_empty() {
        warnings.push(ValidationWarning::general("page description is empty"));
    }

    warnings
}
