//! Lost & Found CLI - Command-line front end for the lost-and-found register.
//!
//! Logs found lapel badges, high-value items and missing-item reports,
//! records reunites, switches the storage backend and produces reports.
//! Every subcommand maps onto one storage manager operation.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use tracing::{info, warn};

use lf_core::config::{AppConfig, ConfigHandle, StorageType};
use lf_core::error::LfResult;
use lf_core::logging;
use lf_services::AppState;

/// Lost & Found - register of found and missing items.
#[derive(Parser)]
#[command(
    name = "lostfound",
    version,
    about = "Lost & Found register CLI",
    long_about = "A command-line interface for the lost-and-found register.\n\
                   Log found items and missing reports, reunite them with their owners,\n\
                   and keep the register in a database or a portable data file."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Backend to open for this run instead of the configured one (database, file).
    #[arg(long, global = true)]
    backend: Option<StorageType>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List and log found lapel badges.
    Badges {
        #[command(subcommand)]
        action: commands::badges::BadgesAction,
    },
    /// List and log found high-value items.
    Items {
        #[command(subcommand)]
        action: commands::items::ItemsAction,
    },
    /// List and file missing-item reports.
    Missing {
        #[command(subcommand)]
        action: commands::missing::MissingAction,
    },
    /// List completed reunites.
    Reunited,
    /// Hand an item back to its owner.
    Reunite(commands::reunite::ReuniteArgs),
    /// Reverse a reunite and reopen the item.
    Undo {
        /// Id of the reunite record.
        returned_id: String,
    },
    /// Record that a missing item was handed in.
    Found(commands::found::FoundArgs),
    /// Delete every entry and reset the item number counters.
    Clear {
        /// Skip the safety check.
        #[arg(long)]
        yes: bool,
    },
    /// Generate a printable report.
    Report {
        /// Report kind (lapel-badge, high-value, missing, returned, all).
        #[arg(default_value = "all")]
        kind: lf_services::ReportKind,
    },
    /// Show or switch the storage backend.
    Storage {
        #[command(subcommand)]
        action: commands::storage::StorageAction,
    },
    /// View and modify automatic export settings.
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Move the whole register in and out as a JSON document.
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Show record counts for the active backend.
    Stats,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> LfResult<()> {
    // Load configuration
    let config_handle = match &cli.config {
        Some(path) => {
            let config = if path.exists() {
                AppConfig::load_from_file(path)?
            } else {
                AppConfig::default()
            };
            ConfigHandle::with_path(config, path.clone())
        }
        None => ConfigHandle::new(AppConfig::load_default()?),
    };

    // Initialize logging
    let (log_level, log_dir, json_output) = {
        let cfg = config_handle.read().await;
        let level = if cli.verbose { "debug".to_string() } else { cfg.logging.level.clone() };
        (level, cfg.effective_log_dir()?, cfg.logging.json_output)
    };
    let _guard = match logging::init_logging(&log_level, &log_dir, json_output) {
        Ok(guard) => Some(guard),
        Err(e) => {
            logging::init_console_logging(&log_level);
            warn!("file logging unavailable, console only: {e}");
            None
        }
    };

    info!("Lost & Found CLI v{}", lf_core::constants::APP_VERSION);

    let state = AppState::new(config_handle).await;
    state.start(cli.backend).await?;

    let format = cli.format;
    let result = match cli.command {
        Commands::Badges { action } => commands::badges::run(&state, action, format).await,
        Commands::Items { action } => commands::items::run(&state, action, format).await,
        Commands::Missing { action } => commands::missing::run(&state, action, format).await,
        Commands::Reunited => commands::reunited::run(&state, format).await,
        Commands::Reunite(args) => commands::reunite::run(&state, args, format).await,
        Commands::Undo { returned_id } => {
            commands::reunite::undo(&state, &returned_id, format).await
        }
        Commands::Found(args) => commands::found::run(&state, args, format).await,
        Commands::Clear { yes } => commands::clear::run(&state, yes, format).await,
        Commands::Report { kind } => commands::report::run(&state, kind, format).await,
        Commands::Storage { action } => commands::storage::run(&state, action, format).await,
        Commands::Settings { action } => commands::settings::run(&state, action, format).await,
        Commands::Data { action } => commands::data::run(&state, action, format).await,
        Commands::Stats => commands::stats::run(&state, format).await,
    };

    // In file mode the data only reaches disk on shutdown.
    if let Err(e) = state.shutdown().await {
        if result.is_ok() {
            return Err(e);
        }
        warn!("storage did not shut down cleanly: {e}");
    }
    result
}
