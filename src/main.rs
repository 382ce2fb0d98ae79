// ABOUTME: Entry point for the dockhand CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use dockhand::config::Manifest;
use dockhand::error::Result;
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing from the verbose count, letting RUST_LOG override
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { name, image, force } => {
            commands::init(name.as_deref(), image.as_deref(), force)
        }
        Commands::Up { file } => {
            let manifest = resolve_manifest(file.as_deref())?;
            commands::up(manifest).await
        }
        Commands::Down { file } => {
            let manifest = resolve_manifest(file.as_deref())?;
            commands::down(manifest).await
        }
        Commands::Status { file, json } => {
            let manifest = resolve_manifest(file.as_deref())?;
            commands::status(manifest, json).await
        }
        Commands::Pull { file } => {
            let manifest = resolve_manifest(file.as_deref())?;
            commands::pull(manifest).await
        }
        Commands::Setup {
            host,
            command,
            user,
            port,
            key,
            trust,
            known_hosts,
        } => commands::setup(host, command, user, port, key, trust, known_hosts).await,
    }
}

/// Load the manifest from an explicit path or discover it in the cwd.
fn resolve_manifest(file: Option<&Path>) -> Result<Manifest> {
    match file {
        Some(path) => Manifest::load(path),
        None => {
            let cwd = env::current_dir()?;
            Manifest::discover(&cwd)
        }
    }
}
