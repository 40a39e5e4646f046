//! The `coursequiz take` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::BufReader;

use coursequiz_core::config::load_config_from;
use coursequiz_core::model::Difficulty;
use coursequiz_core::parser;
use coursequiz_core::report::{AttemptReport, SourceSummary};
use coursequiz_core::selection::{random_questions, weighted_questions, QuestionFilter};
use coursequiz_core::session::{QuizSession, ReviewFilter};
use coursequiz_render::text;

use crate::interact::{run_quiz, Console, Ending, TracingObserver};

pub struct TakeOptions {
    pub bank: PathBuf,
    pub count: Option<usize>,
    pub weighted: bool,
    pub section: Option<String>,
    pub difficulty: Option<String>,
    pub topic: Option<String>,
    pub category: Option<String>,
    pub seed: Option<u64>,
    pub no_shuffle: bool,
    pub time_limit: Option<u64>,
    pub pass_mark: Option<u8>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub async fn execute(opts: TakeOptions) -> Result<()> {
    let config = load_config_from(opts.config.as_deref())?;
    let bank = parser::parse_bank(&opts.bank)?;

    let filter = QuestionFilter {
        section: opts.section,
        difficulty: opts
            .difficulty
            .as_deref()
            .map(str::parse::<Difficulty>)
            .transpose()
            .map_err(anyhow::Error::msg)?,
        topic: opts.topic,
        category: opts.category,
    };
    let pool = filter.apply(&bank.questions);
    anyhow::ensure!(
        !pool.is_empty(),
        "no questions in '{}' match the given filters",
        bank.name
    );

    let count = opts.count.unwrap_or(config.default_question_count);
    anyhow::ensure!(count >= 1, "count must be at least 1");

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let questions = if opts.weighted {
        weighted_questions(&pool, count, config.difficulty_weights, &mut rng)
    } else if config.shuffle && !opts.no_shuffle {
        random_questions(&pool, count, &mut rng)
    } else {
        pool.into_iter().take(count).collect()
    };

    let pass_mark = opts
        .pass_mark
        .or(bank.pass_mark)
        .unwrap_or(config.pass_mark);
    anyhow::ensure!(pass_mark <= 100, "pass mark must be between 0 and 100");
    let time_limit = opts
        .time_limit
        .or(bank.time_limit_secs)
        .or(config.time_limit_secs);

    let mut session = QuizSession::new(questions)
        .with_context(|| format!("cannot start a quiz from '{}'", bank.name))?;
    session.subscribe(Box::new(TracingObserver {
        source: bank.id.clone(),
    }));

    println!("{}", bank.name);
    if !bank.description.is_empty() {
        println!("{}", bank.description);
    }
    print!("{} questions, pass mark {pass_mark}%", session.len());
    match time_limit {
        Some(secs) => println!(", time limit {}", format_duration(secs)),
        None => println!(),
    }

    let deadline = time_limit.map(|secs| tokio::time::Instant::now() + Duration::from_secs(secs));
    let mut console = Console::new(BufReader::new(tokio::io::stdin()), deadline);
    let started = std::time::Instant::now();

    let ending = run_quiz(&mut session, &mut console, &mut std::io::stdout()).await?;
    let duration_ms = started.elapsed().as_millis() as u64;

    let outcome = session.outcome();
    print!("{}", text::outcome_text(&outcome, pass_mark));
    println!("{}", text::summary_line(&session.summary()));
    if ending == Ending::TimedOut {
        println!("Submitted automatically when the time limit ran out.");
    }

    let to_review = session.review(ReviewFilter::Incorrect);
    if !to_review.is_empty() {
        println!("\nReview these questions:");
        for index in to_review {
            let question = &session.questions()[index];
            println!(
                "  {}. {} (answer: {})",
                index + 1,
                question.prompt,
                question.correct_option().unwrap_or_default()
            );
        }
    }

    let report = AttemptReport::from_session(
        &session,
        SourceSummary {
            id: bank.id.clone(),
            name: bank.name.clone(),
            question_count: bank.questions.len(),
        },
        pass_mark,
        duration_ms,
        ending == Ending::TimedOut,
    );

    let output = opts
        .output
        .or_else(|| config.save_reports.then(|| config.output_dir.clone()));
    if let Some(dir) = output {
        let path = dir.join(report.file_name());
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn format_duration(secs: u64) -> String {
    match (secs / 60, secs % 60) {
        (0, s) => format!("{s}s"),
        (m, 0) => format!("{m} min"),
        (m, s) => format!("{m} min {s}s"),
    }
}
