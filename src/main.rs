mod capability;
mod cli;
mod commands;
mod config;
mod error;
mod export;
mod gemini;
mod narrative;
mod notify;
mod orchestrator;
mod plan;
mod refs;

use clap::Parser;
use cli::{Cli, Command};
use colored::*;
use error::ShotlistResult;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing, gated on RUST_LOG env var
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        if let Some(hint) = e.hint() {
            eprintln!("{} {}", "hint:".yellow().bold(), hint);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> ShotlistResult<()> {
    match cli.command {
        Command::Init { path } => commands::init::run(&path),
        Command::Plan {
            path,
            scenario,
            script,
            minutes,
        } => commands::plan::run(&path, scenario, script, minutes).await,
        Command::Generate { path, scene } => commands::generate::run(&path, scene).await,
        Command::Status { path } => commands::status::run(&path),
        Command::Export {
            path,
            images,
            prompts,
        } => commands::export::run(&path, images, prompts),
    }
}
