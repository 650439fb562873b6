//! studyplan CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use studyplan_core::config::ShotMode;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studyplan", version, about = "Revision session planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate study session plans and record them in the history
    Plan {
        /// Sessions per shot
        #[arg(long)]
        count: Option<u32>,

        /// Study slot length in minutes
        #[arg(long)]
        session_time: Option<u32>,

        /// Break length in minutes
        #[arg(long)]
        break_time: Option<u32>,

        /// Number of shots to run
        #[arg(long)]
        shots: Option<u32>,

        /// Date to plan for (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Shot mode: independent, chained
        #[arg(long)]
        shot_mode: Option<ShotMode>,

        /// Shuffle the displayed order of each plan
        #[arg(long)]
        shuffle: bool,

        /// Seed for --shuffle
        #[arg(long)]
        seed: Option<u64>,

        /// Plan against a copy of the history and persist nothing
        #[arg(long)]
        dry_run: bool,

        /// Output format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show aggregate and normalised scores per subject
    Scores {
        /// Reference date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Analyse a saved JSON run report
    Analyse {
        /// Report JSON written by `plan --format json`
        #[arg(long)]
        report: PathBuf,

        /// Output format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Remove generated Revision and Not Studied entries from the history
    Reset {
        /// History file (default: from config)
        #[arg(long)]
        history: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and data files
    Init,
}

fn main() {
    // studyplan logs at info unless RUST_LOG sets its level explicitly.
    let mut filter = EnvFilter::from_default_env();
    let overridden = std::env::var(EnvFilter::DEFAULT_ENV).is_ok_and(|v| v.contains("studyplan"));
    if !overridden {
        if let Ok(directive) = "studyplan=info".parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan {
            count,
            session_time,
            break_time,
            shots,
            date,
            shot_mode,
            shuffle,
            seed,
            dry_run,
            format,
            output,
            config,
        } => commands::plan::execute(commands::plan::PlanOptions {
            count,
            session_time,
            break_time,
            shots,
            date,
            shot_mode,
            shuffle,
            seed,
            dry_run,
            format,
            output,
            config,
        }),
        Commands::Scores { date, config } => commands::scores::execute(date, config),
        Commands::Analyse { report, format } => commands::analyse::execute(report, format),
        Commands::Reset { history, config } => commands::reset::execute(history, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
