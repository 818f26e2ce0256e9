//! Printable register reports.
//!
//! A report is a plain-text document of tables, one section per entity
//! type. The "all" report puts every non-empty section on its own page;
//! pages are separated by a form feed and headed "Page n of m".

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use lf_core::constants::APP_NAME;
use lf_core::error::LfError;
use lf_models::{HighValueItem, LapelBadge, MissingItem, ReturnedItem};

const PAGE_BREAK: char = '\x0c';
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Which part of the register a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    LapelBadge,
    HighValue,
    Missing,
    Returned,
    All,
}

impl ReportKind {
    pub const VARIANTS: [ReportKind; 5] = [
        ReportKind::LapelBadge,
        ReportKind::HighValue,
        ReportKind::Missing,
        ReportKind::Returned,
        ReportKind::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::LapelBadge => "lapel-badge",
            ReportKind::HighValue => "high-value",
            ReportKind::Missing => "missing",
            ReportKind::Returned => "returned",
            ReportKind::All => "all",
        }
    }

    /// Output file name, e.g. `all-data.txt`.
    pub fn file_name(&self) -> String {
        format!("{}-data.txt", self.as_str())
    }

    fn includes(&self, section: ReportKind) -> bool {
        *self == ReportKind::All || *self == section
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = LfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::VARIANTS
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| LfError::InvalidFormat(format!("unknown report kind: {s}")))
    }
}

/// Collections a report is rendered from.
#[derive(Debug, Clone, Default)]
pub struct ReportData {
    pub lapel_badges: Vec<LapelBadge>,
    pub high_value_items: Vec<HighValueItem>,
    pub missing_items: Vec<MissingItem>,
    pub returned_items: Vec<ReturnedItem>,
}

struct Section {
    title: &'static str,
    table: Table,
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(header);
    table
}

fn date(ts: &DateTime<Utc>) -> String {
    ts.format(DATE_FORMAT).to_string()
}

fn lapel_badge_section(badges: &[LapelBadge]) -> Section {
    let mut table = new_table(vec![
        "Item #", "Name", "Congregation", "Where Found", "Logged By", "Date", "Status",
    ]);
    for b in badges {
        table.add_row(vec![
            b.item_number.clone(),
            b.name.clone(),
            b.congregation.clone(),
            b.where_found.clone(),
            b.logger.clone(),
            date(&b.timestamp),
            b.status.as_str().to_string(),
        ]);
    }
    Section { title: "Lapel Badges", table }
}

fn high_value_section(items: &[HighValueItem]) -> Section {
    let mut table = new_table(vec![
        "Item #", "Category", "Description", "Where Found", "Logged By", "Date", "Status",
    ]);
    for i in items {
        table.add_row(vec![
            i.item_number.clone(),
            i.category.clone(),
            i.description.clone(),
            i.where_found.clone(),
            i.logger.clone(),
            date(&i.timestamp),
            i.status.as_str().to_string(),
        ]);
    }
    Section { title: "High-Value Items", table }
}

fn missing_section(items: &[MissingItem]) -> Section {
    let mut table = new_table(vec![
        "Item #",
        "Description",
        "Last Location",
        "Reported By",
        "Phone Number",
        "Logged By",
        "Date",
        "Status",
    ]);
    for m in items {
        table.add_row(vec![
            m.item_number.clone(),
            m.description.clone(),
            m.last_location.clone(),
            m.reported_by.clone(),
            m.phone_number.clone(),
            m.logger.clone(),
            date(&m.timestamp),
            m.status.as_str().to_string(),
        ]);
    }
    Section { title: "Missing Items", table }
}

fn returned_section(items: &[ReturnedItem]) -> Section {
    let mut table = new_table(vec![
        "Item #",
        "Item Type",
        "Item Details",
        "Recipient Name",
        "Phone Number",
        "Returned By",
        "Return Date",
    ]);
    for r in items {
        table.add_row(vec![
            r.original_item.item_number().to_string(),
            r.item_type.label().to_string(),
            r.original_item.details(),
            r.recipient_name.clone(),
            r.phone_number.clone(),
            r.returned_by.clone(),
            date(&r.return_timestamp),
        ]);
    }
    Section { title: "Reunited Items", table }
}

fn sections(kind: ReportKind, data: &ReportData) -> Vec<Section> {
    let mut out = Vec::new();
    if kind.includes(ReportKind::LapelBadge) && !data.lapel_badges.is_empty() {
        out.push(lapel_badge_section(&data.lapel_badges));
    }
    if kind.includes(ReportKind::HighValue) && !data.high_value_items.is_empty() {
        out.push(high_value_section(&data.high_value_items));
    }
    if kind.includes(ReportKind::Missing) && !data.missing_items.is_empty() {
        out.push(missing_section(&data.missing_items));
    }
    if kind.includes(ReportKind::Returned) && !data.returned_items.is_empty() {
        out.push(returned_section(&data.returned_items));
    }
    out
}

/// Render a report document.
pub fn render(kind: ReportKind, data: &ReportData, generated_at: DateTime<Utc>) -> String {
    let sections = sections(kind, data);
    let heading = format!("{APP_NAME} report ({kind}), generated {}", date(&generated_at));

    if sections.is_empty() {
        return format!("{heading}\n\nNo records.\n");
    }

    let total = sections.len();
    let pages: Vec<String> = sections
        .into_iter()
        .enumerate()
        .map(|(index, section)| {
            format!(
                "{heading}\nPage {} of {total}\n\n{}\n\n{}\n",
                index + 1,
                section.title,
                section.table
            )
        })
        .collect();

    pages.join(&PAGE_BREAK.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lf_models::{FoundStatus, ItemSnapshot, ItemType, MissingStatus};

    fn badge(n: u32) -> LapelBadge {
        LapelBadge {
            id: format!("b{n}"),
            item_number: format!("LP{n:04}"),
            name: "J. Doe".into(),
            congregation: "Central".into(),
            where_found: "Lobby".into(),
            logger: "Matt".into(),
            timestamp: Utc::now(),
            status: FoundStatus::Found,
        }
    }

    fn missing() -> MissingItem {
        MissingItem {
            id: "m1".into(),
            item_number: "MS0001".into(),
            description: "Blue umbrella".into(),
            last_location: "Car park".into(),
            reported_by: "Sam".into(),
            phone_number: "555-0000".into(),
            logger: "Jo".into(),
            timestamp: Utc::now(),
            status: MissingStatus::Missing,
        }
    }

    #[test]
    fn test_kind_parse_and_file_name() {
        assert_eq!("high-value".parse::<ReportKind>().unwrap(), ReportKind::HighValue);
        assert!("pdf".parse::<ReportKind>().is_err());
        assert_eq!(ReportKind::All.file_name(), "all-data.txt");
    }

    #[test]
    fn test_all_report_pages_skip_empty_sections() {
        let data = ReportData {
            lapel_badges: vec![badge(1), badge(2)],
            missing_items: vec![missing()],
            ..Default::default()
        };
        let doc = render(ReportKind::All, &data, Utc::now());

        let pages: Vec<&str> = doc.split(PAGE_BREAK).collect();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Page 1 of 2"));
        assert!(pages[0].contains("Lapel Badges"));
        assert!(pages[0].contains("LP0002"));
        assert!(pages[1].contains("Missing Items"));
        assert!(pages[1].contains("Last Location"));
        assert!(!doc.contains("High-Value Items"));
    }

    #[test]
    fn test_single_kind_ignores_other_collections() {
        let data = ReportData {
            lapel_badges: vec![badge(1)],
            missing_items: vec![missing()],
            ..Default::default()
        };
        let doc = render(ReportKind::Missing, &data, Utc::now());
        assert!(doc.contains("MS0001"));
        assert!(!doc.contains("LP0001"));
    }

    #[test]
    fn test_returned_section_uses_snapshot_details() {
        let data = ReportData {
            returned_items: vec![ReturnedItem {
                id: "1".into(),
                original_item_id: "b1".into(),
                item_type: ItemType::LapelBadge,
                original_item: ItemSnapshot::LapelBadge(badge(1)),
                recipient_name: "A. Smith".into(),
                phone_number: "555-1234".into(),
                returned_by: "Jamie".into(),
                return_timestamp: Utc::now(),
            }],
            ..Default::default()
        };
        let doc = render(ReportKind::Returned, &data, Utc::now());
        assert!(doc.contains("Reunited Items"));
        assert!(doc.contains("Lapel Badge"));
        assert!(doc.contains("J. Doe (Central)"));
    }

    #[test]
    fn test_empty_report() {
        let doc = render(ReportKind::All, &ReportData::default(), Utc::now());
        assert!(doc.contains("No records."));
        assert!(!doc.contains(PAGE_BREAK));
    }
}
