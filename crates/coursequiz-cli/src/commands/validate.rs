//! The `coursequiz validate` command.

use std::path::PathBuf;

use anyhow::Result;

use coursequiz_core::parser::{self, Content};

pub fn execute(path: PathBuf) -> Result<()> {
    let items = if path.is_dir() {
        parser::load_content_directory(&path)?
    } else {
        vec![parser::parse_content(&path)?]
    };

    anyhow::ensure!(
        !items.is_empty(),
        "no banks or pages found in {}",
        path.display()
    );

    let mut total_warnings = 0;

    for item in &items {
        let warnings = match item {
            Content::Bank(bank) => {
                println!("Bank: {} ({} questions)", bank.name, bank.questions.len());
                parser::validate_bank(bank)
            }
            Content::Page(page) => {
                println!(
                    "Page: {} ({} sections, {} checks, {} quiz questions)",
                    page.meta.title,
                    page.sections.len(),
                    page.checks.len(),
                    page.quiz.as_ref().map_or(0, |q| q.questions.len())
                );
                parser::validate_page(page)
            }
        };

        for w in &warnings {
            let prefix = w
                .subject
                .as_ref()
                .map(|subject| format!("  [{subject}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All content valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
