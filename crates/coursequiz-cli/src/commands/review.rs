//! The `coursequiz review` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use coursequiz_core::report::AttemptReport;
use coursequiz_core::session::{QuestionStatus, ReviewFilter};
use coursequiz_render::html::write_attempt_html;

pub fn execute(
    report_path: PathBuf,
    filter: String,
    format: String,
    html: Option<PathBuf>,
) -> Result<()> {
    let report = AttemptReport::load_json(&report_path)?;
    let filter: ReviewFilter = filter.parse().map_err(anyhow::Error::msg)?;

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report.filter(filter))?);
        }
        "text" => print_table(&report, filter),
        other => anyhow::bail!("unknown format: {other} (expected text, markdown or json)"),
    }

    if let Some(path) = html {
        write_attempt_html(&report, &path)?;
        eprintln!("HTML report: {}", path.display());
    }

    Ok(())
}

fn print_table(report: &AttemptReport, filter: ReviewFilter) {
    println!(
        "{}: {}/{} ({}%) {}{}",
        report.source.name,
        report.outcome.correct,
        report.outcome.total,
        report.outcome.percentage,
        if report.passed { "passed" } else { "not passed" },
        if report.timed_out { ", time expired" } else { "" }
    );
    println!("{}", report.grade.message());

    // Numbering follows the attempt, not the filtered list.
    let rows: Vec<(usize, _)> = report
        .answers
        .iter()
        .enumerate()
        .filter(|(_, a)| filter.matches(a.status, a.flagged))
        .collect();

    if rows.is_empty() {
        println!("\nNo {filter} questions.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Answer", "Correct", "Result", "Flag"]);
    for (i, answer) in rows {
        let result = match answer.status {
            QuestionStatus::Correct => "correct",
            QuestionStatus::Incorrect => "incorrect",
            QuestionStatus::Unanswered => "unanswered",
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&answer.prompt),
            Cell::new(
                answer
                    .selected
                    .map(|s| (s + 1).to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(answer.correct_index + 1),
            Cell::new(result),
            Cell::new(if answer.flagged { "yes" } else { "" }),
        ]);
    }
    println!("\n{table}");
}
