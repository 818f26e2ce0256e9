//! Automatic export settings commands.

use clap::Subcommand;
use console::style;

use lf_core::error::LfResult;
use lf_services::AppState;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show the automatic export settings.
    Show,
    /// Change the automatic export settings.
    Set {
        /// Turn automatic export on or off.
        #[arg(long)]
        enabled: Option<bool>,
        /// Minutes between automatic exports (at least 1).
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

pub async fn run(state: &AppState, action: SettingsAction, format: OutputFormat) -> LfResult<()> {
    match action {
        SettingsAction::Show => {}
        SettingsAction::Set { enabled, interval } => {
            let mut settings = state.storage.export_settings().await;
            if let Some(enabled) = enabled {
                settings.enabled = enabled;
            }
            if let Some(interval) = interval {
                settings.interval = interval;
            }
            state.storage.set_export_settings(settings).await?;
            if matches!(format, OutputFormat::Text) {
                println!("{} Export settings saved", style("OK").green().bold());
                println!();
            }
        }
    }

    let settings = state.storage.export_settings().await;
    match format {
        OutputFormat::Json => super::print_json(&settings)?,
        OutputFormat::Text => {
            println!("{}", style("Automatic Export").bold().underlined());
            println!();
            println!(
                "  Enabled:     {}",
                if settings.enabled { style("yes").green() } else { style("no").yellow() }
            );
            println!("  Interval:    {} min", settings.interval);
            println!(
                "  Last export: {}",
                settings
                    .last_export
                    .as_ref()
                    .map(super::format_timestamp)
                    .unwrap_or_else(|| "never".to_string())
            );
        }
    }
    Ok(())
}
