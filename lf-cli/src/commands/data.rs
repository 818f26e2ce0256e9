//! Whole-register transfer commands.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use console::style;

use lf_core::constants::DEFAULT_DATA_FILE_NAME;
use lf_core::error::LfResult;
use lf_services::AppState;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum DataAction {
    /// Print every collection as one JSON document.
    Export {
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the collections present in a JSON document ("-" reads stdin).
    Import {
        /// Input file path.
        path: PathBuf,
    },
    /// Save the register to a data file (file backend only).
    Save {
        /// Output file path.
        #[arg(default_value = DEFAULT_DATA_FILE_NAME)]
        path: PathBuf,
    },
    /// Load the register from a data file (file backend only).
    Load {
        /// Input file path.
        path: PathBuf,
    },
}

pub async fn run(state: &AppState, action: DataAction, format: OutputFormat) -> LfResult<()> {
    match action {
        DataAction::Export { output } => {
            let blob = state.storage.export_data().await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &blob)?;
                    report_done(format, "exported", &path)?;
                }
                None => println!("{blob}"),
            }
        }
        DataAction::Import { path } => {
            let blob = if path.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(&path)?
            };
            state.storage.import_data(&blob).await?;
            report_done(format, "imported", &path)?;
        }
        DataAction::Save { path } => {
            state.storage.save_to_file(&path).await?;
            report_done(format, "saved", &path)?;
        }
        DataAction::Load { path } => {
            state.storage.load_from_file(&path).await?;
            report_done(format, "loaded", &path)?;
        }
    }
    Ok(())
}

fn report_done(format: OutputFormat, verb: &str, path: &Path) -> LfResult<()> {
    match format {
        OutputFormat::Json => super::print_json(&serde_json::json!({
            (verb): path.display().to_string(),
        }))?,
        OutputFormat::Text => {
            println!(
                "{} Register {} ({})",
                style("OK").green().bold(),
                verb,
                style(path.display()).cyan()
            );
        }
    }
    Ok(())
}
