//! Hand-in of a reported missing item.

use clap::{Args, ValueEnum};
use console::style;

use lf_core::error::{LfError, LfResult};
use lf_services::{AppState, FoundDetails};
use crate::OutputFormat;

/// What the handed-in item gets logged as.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FoundAs {
    /// A lapel badge; needs --name and --congregation.
    Badge,
    /// A high-value item; needs --category.
    HighValue,
}

#[derive(Args)]
pub struct FoundArgs {
    /// Id of the missing report.
    pub missing_id: String,
    /// Log the item as a badge or a high-value item.
    #[arg(short = 'a', long = "as")]
    pub found_as: FoundAs,
    /// Where the item was handed in.
    #[arg(short, long)]
    pub where_found: String,
    /// Badge name.
    #[arg(long, required_if_eq("found_as", "badge"))]
    pub name: Option<String>,
    /// Badge congregation.
    #[arg(long, required_if_eq("found_as", "badge"))]
    pub congregation: Option<String>,
    /// High-value item category.
    #[arg(long, required_if_eq("found_as", "high-value"))]
    pub category: Option<String>,
    /// High-value item description. Defaults to the missing report's.
    #[arg(short, long)]
    pub description: Option<String>,
}

impl FoundArgs {
    fn into_details(self) -> LfResult<FoundDetails> {
        match self.found_as {
            FoundAs::Badge => Ok(FoundDetails::LapelBadge {
                name: self.name.ok_or_else(|| missing_flag("--name"))?,
                congregation: self.congregation.ok_or_else(|| missing_flag("--congregation"))?,
                where_found: self.where_found,
            }),
            FoundAs::HighValue => Ok(FoundDetails::HighValue {
                category: self.category.ok_or_else(|| missing_flag("--category"))?,
                where_found: self.where_found,
                description: self.description,
            }),
        }
    }
}

fn missing_flag(flag: &str) -> LfError {
    LfError::Config(format!("{flag} is required for this kind of item"))
}

pub async fn run(state: &AppState, args: FoundArgs, format: OutputFormat) -> LfResult<()> {
    let missing_id = args.missing_id.clone();
    let details = args.into_details()?;
    let record = state.storage.mark_missing_item_as_found(&missing_id, details).await?;

    match format {
        OutputFormat::Json => super::print_json(&record)?,
        OutputFormat::Text => {
            println!(
                "{} Missing report closed; logged as {}",
                style("OK").green().bold(),
                style(record.item_number()).cyan()
            );
            println!("  New id: {}", record.id());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(found_as: FoundAs) -> FoundArgs {
        FoundArgs {
            missing_id: "m1".into(),
            found_as,
            where_found: "Car park".into(),
            name: None,
            congregation: None,
            category: None,
            description: None,
        }
    }

    #[test]
    fn test_badge_needs_name() {
        let err = args(FoundAs::Badge).into_details().unwrap_err();
        assert!(err.to_string().contains("--name"));
    }

    #[test]
    fn test_high_value_details() {
        let mut a = args(FoundAs::HighValue);
        a.category = Some("Phone".into());
        match a.into_details().unwrap() {
            FoundDetails::HighValue { category, where_found, description } => {
                assert_eq!(category, "Phone");
                assert_eq!(where_found, "Car park");
                assert!(description.is_none());
            }
            other => panic!("unexpected details: {other:?}"),
        }
    }
}
