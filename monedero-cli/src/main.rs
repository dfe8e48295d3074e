// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Monedero CLI - local-first finance agenda from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Add an expense linked to a trip
//! monedero event add --title "Flight" --date 2026-03-01 --expense 500 --trip <trip-id>
//!
//! # Global income/expense summary
//! monedero summary
//!
//! # Budget position of one trip
//! monedero budget <trip-id>
//!
//! # Packing checklist
//! monedero trip packing <trip-id> add "Passport"
//!
//! # Backup and restore
//! monedero export
//! monedero import backup_agenda_2026-08-29.json
//!
//! # Wipe everything (prompts unless --yes)
//! monedero reset
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use monedero_store::{FileBackend, StorageHub};

use commands::{backup, event, settings, summary, trip};

// ============================================================================
// CLI Definition
// ============================================================================

/// Monedero CLI - calendar activities, trip budgets and packing lists,
/// all stored locally.
#[derive(Parser)]
#[command(name = "monedero")]
#[command(about = "Local-first finance agenda CLI")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Data directory override (defaults to the platform data dir).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage calendar events.
    #[command(subcommand, visible_alias = "e")]
    Event(event::EventCommand),

    /// Manage trips and packing lists.
    #[command(subcommand, visible_alias = "t")]
    Trip(trip::TripCommand),

    /// Show the global income/expense summary.
    #[command(visible_alias = "s")]
    Summary,

    /// Show the budget position of one trip.
    Budget(summary::BudgetArgs),

    /// Show the chart feed (global, or one trip with --trip).
    Chart(summary::ChartArgs),

    /// Show or change user preferences.
    #[command(subcommand)]
    Settings(settings::SettingsCommand),

    /// Export all data to a backup file.
    Export(backup::ExportArgs),

    /// Import a backup file, overwriting present sections.
    Import(backup::ImportArgs),

    /// Delete ALL stored data and restore defaults.
    Reset(backup::ResetArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("monedero=debug,info")
    } else {
        EnvFilter::new("monedero=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let backend = match &cli.data_dir {
        Some(dir) => FileBackend::new(dir),
        None => FileBackend::default_location(),
    };
    tracing::debug!(dir = %backend.dir().display(), "Using data directory");
    let hub = StorageHub::new(backend);

    let result = match &cli.command {
        Commands::Event(cmd) => event::run(cmd, &hub, &cli).await,
        Commands::Trip(cmd) => trip::run(cmd, &hub, &cli).await,
        Commands::Summary => summary::run_summary(&hub, &cli).await,
        Commands::Budget(args) => summary::run_budget(args, &hub, &cli).await,
        Commands::Chart(args) => summary::run_chart(args, &hub, &cli).await,
        Commands::Settings(cmd) => settings::run(cmd, &hub, &cli).await,
        Commands::Export(args) => backup::run_export(args, &hub).await,
        Commands::Import(args) => backup::run_import(args, &hub).await,
        Commands::Reset(args) => backup::run_reset(args, &hub).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_parse_anywhere() {
        let cli = Cli::parse_from(["monedero", "summary", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Summary));
    }
}
