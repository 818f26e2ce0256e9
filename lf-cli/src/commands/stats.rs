//! Register statistics.

use console::style;

use lf_core::error::LfResult;
use lf_services::AppState;
use crate::OutputFormat;

pub async fn run(state: &AppState, format: OutputFormat) -> LfResult<()> {
    let stats = state.storage.stats().await?;

    match format {
        OutputFormat::Json => super::print_json(&stats)?,
        OutputFormat::Text => {
            println!("{}", style("Register Statistics").bold().underlined());
            println!();

            let mut table = super::new_table(vec!["Collection", "Records"]);
            table.add_row(vec!["Lapel badges".to_string(), stats.lapel_badges.to_string()]);
            table.add_row(vec!["High-value items".to_string(), stats.high_value_items.to_string()]);
            table.add_row(vec!["Missing reports".to_string(), stats.missing_items.to_string()]);
            table.add_row(vec!["Reunited".to_string(), stats.returned_items.to_string()]);
            table.add_row(vec!["Total".to_string(), stats.total().to_string()]);
            println!("{table}");

            println!();
            println!("  Backend:     {}", stats.storage_type);
            println!(
                "  Last export: {}",
                stats
                    .last_export
                    .as_ref()
                    .map(super::format_timestamp)
                    .unwrap_or_else(|| "never".to_string())
            );
        }
    }
    Ok(())
}
