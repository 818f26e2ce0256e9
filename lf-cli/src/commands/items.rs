//! High-value item commands.

use clap::Subcommand;
use console::style;

use lf_core::error::LfResult;
use lf_models::NewHighValueItem;
use lf_services::AppState;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum ItemsAction {
    /// List all found high-value items.
    List,
    /// Log a found high-value item.
    Add {
        /// Item category, e.g. "Phone" or "Wallet".
        #[arg(long)]
        category: String,
        /// Free-text description.
        #[arg(short, long)]
        description: String,
        /// Where the item was found.
        #[arg(short, long)]
        where_found: String,
        /// Volunteer logging the item.
        #[arg(short = 'l', long)]
        logger: String,
    },
}

pub async fn run(state: &AppState, action: ItemsAction, format: OutputFormat) -> LfResult<()> {
    match action {
        ItemsAction::List => {
            let items = state.storage.load_high_value_items().await?;
            match format {
                OutputFormat::Json => super::print_json(&items)?,
                OutputFormat::Text => {
                    if items.is_empty() {
                        println!("No high-value items logged.");
                        return Ok(());
                    }
                    let mut table = super::new_table(vec![
                        "Number", "Category", "Description", "Found At", "Logged", "Status",
                    ]);
                    for i in &items {
                        table.add_row(vec![
                            i.item_number.clone(),
                            super::truncate(&i.category, 20),
                            super::truncate(&i.description, 40),
                            super::truncate(&i.where_found, 30),
                            super::format_timestamp(&i.timestamp),
                            i.status.as_str().to_string(),
                        ]);
                    }
                    println!("{table}");
                    println!("\n{} items", items.len());
                }
            }
        }
        ItemsAction::Add { category, description, where_found, logger } => {
            let item = state
                .storage
                .add_high_value_item(NewHighValueItem {
                    category,
                    description,
                    where_found,
                    logger,
                })
                .await?;
            match format {
                OutputFormat::Json => super::print_json(&item)?,
                OutputFormat::Text => {
                    println!(
                        "{} Logged high-value item {} ({})",
                        style("OK").green().bold(),
                        style(&item.item_number).cyan(),
                        item.category
                    );
                }
            }
        }
    }
    Ok(())
}
