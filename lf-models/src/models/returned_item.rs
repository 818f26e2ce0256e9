//! Reunite history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::models::item::{HighValueItem, ItemType, LapelBadge, MissingItem};
use crate::models::Entity;

/// Frozen copy of a source record taken when it was reunited.
///
/// Serialized as the bare source record, so the variant is recovered from
/// the fields present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemSnapshot {
    LapelBadge(LapelBadge),
    HighValue(HighValueItem),
    Missing(MissingItem),
}

impl ItemSnapshot {
    pub fn item_number(&self) -> &str {
        match self {
            ItemSnapshot::LapelBadge(b) => &b.item_number,
            ItemSnapshot::HighValue(i) => &i.item_number,
            ItemSnapshot::Missing(m) => &m.item_number,
        }
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            ItemSnapshot::LapelBadge(_) => ItemType::LapelBadge,
            ItemSnapshot::HighValue(_) => ItemType::HighValue,
            ItemSnapshot::Missing(_) => ItemType::Missing,
        }
    }

    /// One-line description for listings and reports.
    pub fn details(&self) -> String {
        match self {
            ItemSnapshot::LapelBadge(b) => format!("{} ({})", b.name, b.congregation),
            ItemSnapshot::HighValue(i) => format!("{}: {}", i.category, i.description),
            ItemSnapshot::Missing(m) => m.description.clone(),
        }
    }
}

/// A completed reunite: who collected which item, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnedItem {
    /// Creation time in epoch milliseconds.
    pub id: String,
    /// Back-reference to the live source record.
    pub original_item_id: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub original_item: ItemSnapshot,
    pub recipient_name: String,
    pub phone_number: String,
    pub returned_by: String,
    pub return_timestamp: DateTime<Utc>,
}

impl Entity for ReturnedItem {
    const COLLECTION: Collection = Collection::ReturnedItems;
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::item::{FoundStatus, MissingStatus};
    use crate::record::{from_record, to_record};

    #[test]
    fn test_snapshot_variant_recovered_from_fields() {
        let missing = MissingItem {
            id: "m-1".into(),
            item_number: "MS0003".into(),
            description: "Blue umbrella".into(),
            last_location: "Car park".into(),
            reported_by: "Sam".into(),
            phone_number: "555-0000".into(),
            logger: "Jo".into(),
            timestamp: Utc::now(),
            status: MissingStatus::Missing,
        };
        let returned = ReturnedItem {
            id: "1700000000000".into(),
            original_item_id: "m-1".into(),
            item_type: ItemType::Missing,
            original_item: ItemSnapshot::Missing(missing),
            recipient_name: "Sam".into(),
            phone_number: "555-0000".into(),
            returned_by: "Jo".into(),
            return_timestamp: Utc::now(),
        };

        let record = to_record(&returned).unwrap();
        assert_eq!(record["type"], "missing");
        assert_eq!(record["originalItem"]["lastLocation"], "Car park");

        let back: ReturnedItem = from_record(record).unwrap();
        assert!(matches!(back.original_item, ItemSnapshot::Missing(_)));
        assert_eq!(back.original_item.item_number(), "MS0003");
    }

    #[test]
    fn test_snapshot_details() {
        let item = HighValueItem {
            id: "h".into(),
            item_number: "HV0001".into(),
            category: "Phone".into(),
            description: "Black iPhone".into(),
            where_found: "Hall".into(),
            logger: "Jo".into(),
            timestamp: Utc::now(),
            status: FoundStatus::Found,
        };
        let snap = ItemSnapshot::HighValue(item);
        assert_eq!(snap.details(), "Phone: Black iPhone");
        assert_eq!(snap.item_type(), ItemType::HighValue);
    }
}
