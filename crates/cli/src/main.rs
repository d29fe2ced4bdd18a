use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use flowtty_engine::{RunTiming, SampledDetailSource, spawn_flow_run, validate_payload};
use flowtty_types::Deployment;
use flowtty_types::flow::{FlowRunEvent, FlowRunRequest, RunOutcome, STAGE_CATALOG};
use flowtty_util::UserPreferences;
use tracing::Level;

#[derive(Parser)]
#[command(name = "flowtty", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Execute one flow without the TUI and print the output envelope
    Run {
        /// Deployment label echoed into the envelope (v1, v2 or v3)
        #[arg(long, default_value = "v2")]
        deployment: Deployment,

        /// Request payload; a payload containing "error" fails the run
        #[arg(long)]
        payload: String,

        /// Collapse the stage schedule to milliseconds for scripted use
        #[arg(long)]
        compressed: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // No subcommands => TUI
    match cli.command {
        None => {
            let preferences = UserPreferences::new().unwrap_or_else(|error| {
                tracing::warn!("falling back to ephemeral preferences: {error}");
                UserPreferences::ephemeral()
            });
            flowtty_tui::run(preferences).await
        }
        Some(Command::Run {
            deployment,
            payload,
            compressed,
        }) => run_headless(deployment, payload, compressed).await,
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .try_init();
}

/// Streams one run's stage transitions to stdout, then prints the envelope.
///
/// Exits with code 2 on an invalid payload and code 1 when the simulated run
/// itself fails.
async fn run_headless(deployment: Deployment, payload: String, compressed: bool) -> Result<()> {
    if let Err(error) = validate_payload(&payload) {
        eprintln!("{error}");
        std::process::exit(2);
    }

    let timing = if compressed {
        RunTiming::compressed()
    } else {
        RunTiming::demo()
    };
    let request = FlowRunRequest { deployment, payload };
    let mut handle = spawn_flow_run(request, Arc::new(SampledDetailSource::new()), timing);

    while let Some(event) = handle.events.recv().await {
        match event {
            FlowRunEvent::RunStarted { at } => {
                println!("Run started at {}", at.format("%H:%M:%S"));
            }
            FlowRunEvent::StageStarted { index, timestamp } => {
                println!("[{timestamp}] {} started", stage_name(index));
            }
            FlowRunEvent::StageCompleted {
                index,
                details,
                timestamp,
            } => {
                println!("[{timestamp}] {} completed: {details}", stage_name(index));
            }
            FlowRunEvent::StageFailed {
                index,
                details,
                timestamp,
            } => {
                println!("[{timestamp}] {} failed: {details}", stage_name(index));
            }
            FlowRunEvent::RunCompleted { output } => {
                println!("{}", output.to_pretty_json()?);
                if output.status == RunOutcome::Error {
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}

fn stage_name(index: usize) -> &'static str {
    STAGE_CATALOG
        .get(index)
        .map_or("stage", |definition| definition.name)
}
