//! Lapel badge commands.

use clap::Subcommand;
use console::style;

use lf_core::error::LfResult;
use lf_models::NewLapelBadge;
use lf_services::AppState;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum BadgesAction {
    /// List all found lapel badges.
    List,
    /// Log a found lapel badge.
    Add {
        /// Name printed on the badge.
        #[arg(long)]
        name: String,
        /// Congregation printed on the badge.
        #[arg(long)]
        congregation: String,
        /// Where the badge was found.
        #[arg(short, long)]
        where_found: String,
        /// Volunteer logging the badge.
        #[arg(short = 'l', long)]
        logger: String,
    },
}

pub async fn run(state: &AppState, action: BadgesAction, format: OutputFormat) -> LfResult<()> {
    match action {
        BadgesAction::List => {
            let badges = state.storage.load_lapel_badges().await?;
            match format {
                OutputFormat::Json => super::print_json(&badges)?,
                OutputFormat::Text => {
                    if badges.is_empty() {
                        println!("No lapel badges logged.");
                        return Ok(());
                    }
                    let mut table = super::new_table(vec![
                        "Number", "Name", "Congregation", "Found At", "Logged", "Status",
                    ]);
                    for b in &badges {
                        table.add_row(vec![
                            b.item_number.clone(),
                            super::truncate(&b.name, 30),
                            super::truncate(&b.congregation, 30),
                            super::truncate(&b.where_found, 30),
                            super::format_timestamp(&b.timestamp),
                            b.status.as_str().to_string(),
                        ]);
                    }
                    println!("{table}");
                    println!("\n{} badges", badges.len());
                }
            }
        }
        BadgesAction::Add { name, congregation, where_found, logger } => {
            let badge = state
                .storage
                .add_lapel_badge(NewLapelBadge {
                    name,
                    congregation,
                    where_found,
                    logger,
                })
                .await?;
            match format {
                OutputFormat::Json => super::print_json(&badge)?,
                OutputFormat::Text => {
                    println!(
                        "{} Logged lapel badge {} for {}",
                        style("OK").green().bold(),
                        style(&badge.item_number).cyan(),
                        badge.name
                    );
                }
            }
        }
    }
    Ok(())
}
