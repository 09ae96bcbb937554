use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use montage_cli::app::{execute, RunOptions, RunOutcome};
use montage_cli::config::load_config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Derive, re-orient and export EEG electrode montage coordinates.
#[derive(Parser, Debug)]
#[command(name = "montage", version)]
struct Args {
    /// Path to the run configuration (JSON)
    #[arg(short, long, default_value = "montage.json")]
    config: PathBuf,

    /// Recompute even if the exported files are up to date
    #[arg(long)]
    force: bool,

    /// Validate inputs and the pipeline without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "montage=info,montage_cli=info,montage_pipeline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = load_config(&args.config)?;

    let outcome = execute(
        &config,
        RunOptions {
            force: args.force,
            dry_run: args.dry_run,
        },
    )?;

    match outcome {
        RunOutcome::Cached { outputs } => {
            tracing::info!("Nothing to do, {} cached outputs are current", outputs.len());
        }
        RunOutcome::DryRun { stages } => {
            tracing::info!("Pipeline is valid ({} stages)", stages.len());
        }
        RunOutcome::Completed { written } => {
            for path in &written {
                tracing::info!("Wrote {}", path.display());
            }
        }
    }
    Ok(())
}
