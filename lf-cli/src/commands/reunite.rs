//! Reunite and undo commands.

use chrono::{DateTime, Utc};
use clap::Args;
use console::style;

use lf_core::error::LfResult;
use lf_models::ItemType;
use lf_services::AppState;
use crate::OutputFormat;

#[derive(Args)]
pub struct ReuniteArgs {
    /// Id of the badge, item or missing report being handed back.
    pub item_id: String,
    /// Kind of entry (lapel-badge, high-value, missing).
    #[arg(short = 't', long = "type")]
    pub item_type: ItemType,
    /// Person collecting the item.
    #[arg(short, long)]
    pub recipient: String,
    /// Contact number of the recipient.
    #[arg(short, long)]
    pub phone: String,
    /// Volunteer handing the item over.
    #[arg(short = 'b', long)]
    pub returned_by: String,
    /// Time of the hand-over (RFC 3339). Defaults to now.
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

pub async fn run(state: &AppState, args: ReuniteArgs, format: OutputFormat) -> LfResult<()> {
    let returned = state
        .storage
        .mark_item_reunited(
            &args.item_id,
            args.item_type,
            &args.recipient,
            &args.phone,
            &args.returned_by,
            args.at,
        )
        .await?;

    match format {
        OutputFormat::Json => super::print_json(&returned)?,
        OutputFormat::Text => {
            println!(
                "{} {} {} returned to {}",
                style("OK").green().bold(),
                returned.item_type.label(),
                style(returned.original_item.item_number()).cyan(),
                returned.recipient_name
            );
            println!("  Reunite id: {}", returned.id);
        }
    }
    Ok(())
}

pub async fn undo(state: &AppState, returned_id: &str, format: OutputFormat) -> LfResult<()> {
    state.storage.undo_reunite(returned_id).await?;

    match format {
        OutputFormat::Json => super::print_json(&serde_json::json!({
            "undone": returned_id,
        }))?,
        OutputFormat::Text => {
            println!(
                "{} Reunite {} reversed; the item is open again",
                style("OK").green().bold(),
                returned_id
            );
        }
    }
    Ok(())
}
