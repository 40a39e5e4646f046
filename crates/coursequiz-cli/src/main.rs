//! coursequiz CLI: take quizzes, study pages and inspect course content.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod interact;

#[derive(Parser)]
#[command(
    name = "coursequiz",
    version,
    about = "Interactive course quizzes and question banks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz drawn from a question bank
    Take {
        /// Path to a question bank .toml file
        #[arg(long)]
        bank: PathBuf,

        /// Number of questions (default: config default_question_count)
        #[arg(long)]
        count: Option<usize>,

        /// Balance the draw by difficulty (mock exam)
        #[arg(long)]
        weighted: bool,

        /// Only questions from this section (e.g. "1.2")
        #[arg(long)]
        section: Option<String>,

        /// Only questions of this difficulty: basic, intermediate, advanced
        #[arg(long)]
        difficulty: Option<String>,

        /// Only questions on this topic
        #[arg(long)]
        topic: Option<String>,

        /// Only questions in this category
        #[arg(long)]
        category: Option<String>,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Keep bank order instead of shuffling
        #[arg(long)]
        no_shuffle: bool,

        /// Time limit in seconds; the attempt is submitted when it runs out
        #[arg(long)]
        time_limit: Option<u64>,

        /// Percentage needed to pass
        #[arg(long)]
        pass_mark: Option<u8>,

        /// Directory to save the attempt report in
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Work through a course page with its inline checks and quiz
    Study {
        /// Path to a page .toml file
        #[arg(long)]
        page: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Render a course page as text or HTML
    Render {
        /// Path to a page .toml file
        #[arg(long)]
        page: PathBuf,

        /// Output format: text, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate bank and page TOML files
    Validate {
        /// Path to a content file or directory
        #[arg(long)]
        path: PathBuf,
    },

    /// Show how a bank's questions break down by section and difficulty
    Stats {
        /// Path to a question bank .toml file
        #[arg(long)]
        bank: PathBuf,
    },

    /// Review a saved attempt report
    Review {
        /// Attempt report JSON
        #[arg(long)]
        report: PathBuf,

        /// Which answers to list: all, correct, incorrect, unanswered, flagged
        #[arg(long, default_value = "all")]
        filter: String,

        /// Output format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Also write an HTML version of the report
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Create a starter config, example bank and example page
    Init,
}

#[tokio::main]
async fn main() {
    // Interactive output owns stdout; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            bank,
            count,
            weighted,
            section,
            difficulty,
            topic,
            category,
            seed,
            no_shuffle,
            time_limit,
            pass_mark,
            output,
            config,
        } => {
            commands::take::execute(commands::take::TakeOptions {
                bank,
                count,
                weighted,
                section,
                difficulty,
                topic,
                category,
                seed,
                no_shuffle,
                time_limit,
                pass_mark,
                output,
                config,
            })
            .await
        }
        Commands::Study { page, config } => commands::study::execute(page, config).await,
        Commands::Render {
            page,
            format,
            output,
        } => commands::render::execute(page, format, output),
        Commands::Validate { path } => commands::validate::execute(path),
        Commands::Stats { bank } => commands::stats::execute(bank),
        Commands::Review {
            report,
            filter,
            format,
            html,
        } => commands::review::execute(report, filter, format, html),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
