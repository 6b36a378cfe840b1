//! Adjutant CLI — the main entry point.
//!
//! Commands:
//! - `answer`   — Answer a question through the cost-aware pipeline
//! - `snapshot` — Build or show the daily metric snapshot
//! - `usage`    — Show budget status and the per-day usage report
//! - `cache`    — Maintain the response cache

use adjutant_core::tier::ModelTier;
use clap::{Parser, Subcommand};

mod commands;
mod context_source;

#[derive(Parser)]
#[command(
    name = "adjutant",
    about = "Adjutant — cost-aware answering over your daily operational snapshot",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question
    Answer {
        /// The question to answer
        question: String,

        /// The page/route the question was asked from
        #[arg(short, long, default_value = "/dashboard")]
        page: String,

        /// Preferred model tier (clamped down when budget is tight)
        #[arg(short, long)]
        tier: Option<ModelTier>,
    },

    /// Manage the daily metric snapshot
    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommands,
    },

    /// Show budget status and per-day usage
    Usage {
        /// How many recent days to report
        #[arg(short, long, default_value_t = 7)]
        days: u32,
    },

    /// Maintain the response cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
enum SnapshotCommands {
    /// Build (or rebuild) today's snapshot from live context
    Build,

    /// Show a stored snapshot
    Show {
        /// Day to show (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        day: Option<String>,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Remove expired cached responses
    Cleanup,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Answer {
            question,
            page,
            tier,
        } => commands::answer::run(&question, &page, tier).await?,
        Commands::Snapshot { command } => match command {
            SnapshotCommands::Build => commands::snapshot::build().await?,
            SnapshotCommands::Show { day } => commands::snapshot::show(day).await?,
        },
        Commands::Usage { days } => commands::usage::run(days).await?,
        Commands::Cache { command } => match command {
            CacheCommands::Cleanup => commands::cache::cleanup().await?,
        },
    }

    Ok(())
}
