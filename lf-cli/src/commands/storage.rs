//! Storage backend commands.

use clap::Subcommand;
use console::style;

use lf_core::config::StorageType;
use lf_core::error::LfResult;
use lf_services::AppState;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum StorageAction {
    /// Show the active backend and where it keeps its data.
    Show,
    /// Migrate all data to another backend and make it the default.
    Use {
        /// Target backend (database, file).
        backend: StorageType,
    },
}

pub async fn run(state: &AppState, action: StorageAction, format: OutputFormat) -> LfResult<()> {
    match action {
        StorageAction::Show => {
            let backend = state.storage.storage_mode().await?;
            let service_state = state.storage.service_state().await;
            let (db_path, cache_path) = {
                let cfg = state.config.read().await;
                (cfg.effective_db_path()?, cfg.effective_file_cache_path()?)
            };

            match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({
                    "backend": backend,
                    "state": service_state.to_string(),
                    "databasePath": db_path.display().to_string(),
                    "fileCachePath": cache_path.display().to_string(),
                }))?,
                OutputFormat::Text => {
                    println!("{}", style("Storage").bold().underlined());
                    println!();
                    println!("  Backend:    {}", style(backend).cyan());
                    println!("  State:      {service_state}");
                    println!("  Database:   {}", db_path.display());
                    println!("  File cache: {}", cache_path.display());
                }
            }
        }
        StorageAction::Use { backend } => {
            let from = state.storage.storage_mode().await?;
            state.storage.change_storage_type(backend).await?;

            match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({
                    "from": from,
                    "to": backend,
                }))?,
                OutputFormat::Text => {
                    if from == backend {
                        println!("Already using the {backend} backend.");
                    } else {
                        println!(
                            "{} Migrated from {} to {}",
                            style("OK").green().bold(),
                            from,
                            style(backend).cyan()
                        );
                    }
                }
            }
        }
    }
    Ok(())
}
