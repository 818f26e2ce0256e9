//! Listing of completed reunites.

use lf_core::error::LfResult;
use lf_services::AppState;
use crate::OutputFormat;

pub async fn run(state: &AppState, format: OutputFormat) -> LfResult<()> {
    let returned = state.storage.load_reunited_items().await?;

    match format {
        OutputFormat::Json => super::print_json(&returned)?,
        OutputFormat::Text => {
            if returned.is_empty() {
                println!("No items reunited yet.");
                return Ok(());
            }
            let mut table = super::new_table(vec![
                "Id", "Item", "Type", "Details", "Recipient", "Phone", "Returned By", "When",
            ]);
            for r in &returned {
                table.add_row(vec![
                    r.id.clone(),
                    r.original_item.item_number().to_string(),
                    r.item_type.label().to_string(),
                    super::truncate(&r.original_item.details(), 40),
                    super::truncate(&r.recipient_name, 25),
                    r.phone_number.clone(),
                    super::truncate(&r.returned_by, 25),
                    super::format_timestamp(&r.return_timestamp),
                ]);
            }
            println!("{table}");
            println!("\n{} reunited", returned.len());
        }
    }
    Ok(())
}
