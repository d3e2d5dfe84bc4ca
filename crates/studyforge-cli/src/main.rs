//! The `studyforge` command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "studyforge",
    version,
    about = "Concept maps, difficulty tiers and weak-topic reports from study notes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the concept map from a notes file
    Analyze {
        /// Markdown notes file
        #[arg(long)]
        notes: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Order the notes' topics into difficulty tiers
    Plan {
        /// Markdown notes file
        #[arg(long)]
        notes: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Summarize quiz outcomes into weak topics and mastery
    Track {
        /// Outcome file (.toml/.json) or directory of outcome files
        #[arg(long)]
        outcomes: PathBuf,

        /// Weak-topic accuracy threshold (overrides config)
        #[arg(long)]
        threshold: Option<f64>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Build and save a full study report
    Report {
        /// Markdown notes file
        #[arg(long)]
        notes: PathBuf,

        /// Outcome file (.toml/.json) or directory of outcome files
        #[arg(long)]
        outcomes: PathBuf,

        /// Report title (defaults to the notes file name)
        #[arg(long)]
        title: Option<String>,

        /// Weak-topic accuracy threshold (overrides config)
        #[arg(long)]
        threshold: Option<f64>,

        /// Output directory (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, markdown, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two saved study reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Accuracy change treated as significant
        #[arg(long, default_value = "0.05")]
        threshold: f64,

        /// Exit code 1 if any topic regressed
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config, notes and outcome files
    Init,
}

fn main() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "studyforge=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze { notes, format } => commands::analyze::execute(notes, format),
        Commands::Plan {
            notes,
            format,
            config,
        } => commands::plan::execute(notes, format, config),
        Commands::Track {
            outcomes,
            threshold,
            format,
            config,
        } => commands::track::execute(outcomes, threshold, format, config),
        Commands::Report {
            notes,
            outcomes,
            title,
            threshold,
            output,
            format,
            config,
        } => commands::report::execute(notes, outcomes, title, threshold, output, format, config),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
