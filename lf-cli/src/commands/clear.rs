//! Clear command.

use console::style;

use lf_core::error::LfResult;
use lf_services::AppState;
use crate::OutputFormat;

pub async fn run(state: &AppState, yes: bool, format: OutputFormat) -> LfResult<()> {
    if !yes {
        let stats = state.storage.stats().await?;
        eprintln!(
            "{} this deletes {} entries and resets item numbering. Re-run with --yes to proceed.",
            style("WARNING").yellow().bold(),
            stats.total()
        );
        return Ok(());
    }

    state.storage.clear_all_data().await?;

    match format {
        OutputFormat::Json => super::print_json(&serde_json::json!({ "cleared": true }))?,
        OutputFormat::Text => {
            println!("{} Register cleared", style("OK").green().bold());
        }
    }
    Ok(())
}
