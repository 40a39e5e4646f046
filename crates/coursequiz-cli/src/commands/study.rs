//! The `coursequiz study` command.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::BufReader;

use coursequiz_core::config::load_config_from;
use coursequiz_core::parser;
use coursequiz_render::text;

use crate::interact::{run_check, run_quiz, Console, TracingObserver};

pub async fn execute(page_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let page = parser::parse_page(&page_path)?;

    let mut out = std::io::stdout();
    let mut console = Console::new(BufReader::new(tokio::io::stdin()), None);

    write!(out, "{}", text::page_header(&page))?;
    write!(out, "{}", text::page_intro(&page))?;

    for section in &page.sections {
        write!(out, "{}", text::section_text(section))?;
        let Some(check) = page.inline_check_for(section) else {
            continue;
        };
        let mut check = check.with_context(|| {
            format!("invalid inline check in section {}", section.number)
        })?;
        if console.is_closed() {
            write!(out, "{}", text::check_card(&check))?;
        } else {
            run_check(&mut check, &mut console, &mut out).await?;
        }
    }

    write!(out, "{}", text::worked_examples_text(&page.worked_examples))?;
    write!(out, "{}", text::faqs_text(&page.faqs))?;

    if let Some(session) = page.quiz_session() {
        let mut session = session.context("invalid page quiz")?;
        let title = page
            .quiz
            .as_ref()
            .map(|q| q.title.as_str())
            .unwrap_or_default();
        writeln!(out, "\n{title}")?;

        if console.is_closed() {
            writeln!(out, "Input closed; skipping the quiz.")?;
        } else {
            session.subscribe(Box::new(TracingObserver {
                source: page.meta.id.clone(),
            }));
            run_quiz(&mut session, &mut console, &mut out).await?;
            write!(out, "{}", text::outcome_text(&session.outcome(), config.pass_mark))?;
        }
    }

    write!(out, "{}", text::nav_text(&page))?;
    out.flush()?;
    Ok(())
}
