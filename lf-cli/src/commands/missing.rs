//! Missing-item report commands.

use clap::Subcommand;
use console::style;

use lf_core::error::LfResult;
use lf_models::NewMissingItem;
use lf_services::AppState;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum MissingAction {
    /// List all missing-item reports.
    List,
    /// File a missing-item report.
    Add {
        /// What was lost.
        #[arg(short, long)]
        description: String,
        /// Where the owner last had it.
        #[arg(long)]
        last_location: String,
        /// Person reporting the loss.
        #[arg(short, long)]
        reported_by: String,
        /// Contact number of the reporter.
        #[arg(short, long)]
        phone: String,
        /// Volunteer taking the report.
        #[arg(short = 'l', long)]
        logger: String,
    },
}

pub async fn run(state: &AppState, action: MissingAction, format: OutputFormat) -> LfResult<()> {
    match action {
        MissingAction::List => {
            let reports = state.storage.load_missing_items().await?;
            match format {
                OutputFormat::Json => super::print_json(&reports)?,
                OutputFormat::Text => {
                    if reports.is_empty() {
                        println!("No missing items reported.");
                        return Ok(());
                    }
                    let mut table = super::new_table(vec![
                        "Number", "Description", "Last Seen", "Reported By", "Phone", "Status",
                    ]);
                    for m in &reports {
                        table.add_row(vec![
                            m.item_number.clone(),
                            super::truncate(&m.description, 40),
                            super::truncate(&m.last_location, 30),
                            super::truncate(&m.reported_by, 25),
                            m.phone_number.clone(),
                            m.status.as_str().to_string(),
                        ]);
                    }
                    println!("{table}");
                    println!("\n{} reports", reports.len());
                }
            }
        }
        MissingAction::Add { description, last_location, reported_by, phone, logger } => {
            let report = state
                .storage
                .add_missing_item(NewMissingItem {
                    description,
                    last_location,
                    reported_by,
                    phone_number: phone,
                    logger,
                })
                .await?;
            match format {
                OutputFormat::Json => super::print_json(&report)?,
                OutputFormat::Text => {
                    println!(
                        "{} Filed missing report {} for {}",
                        style("OK").green().bold(),
                        style(&report.item_number).cyan(),
                        report.reported_by
                    );
                }
            }
        }
    }
    Ok(())
}
