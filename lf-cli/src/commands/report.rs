//! Report generation.

use console::style;

use lf_core::error::LfResult;
use lf_services::{AppState, ReportKind};
use crate::OutputFormat;

pub async fn run(state: &AppState, kind: ReportKind, format: OutputFormat) -> LfResult<()> {
    let path = state.storage.export_report(kind).await?;

    match format {
        OutputFormat::Json => super::print_json(&serde_json::json!({
            "kind": kind.as_str(),
            "path": path.display().to_string(),
        }))?,
        OutputFormat::Text => {
            println!(
                "{} {} report written to {}",
                style("OK").green().bold(),
                kind,
                style(path.display()).cyan()
            );
        }
    }
    Ok(())
}
