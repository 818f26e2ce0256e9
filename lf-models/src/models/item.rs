//! Found items and missing-item reports.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lf_core::constants::prefixes;
use lf_core::error::LfError;

use crate::collection::Collection;
use crate::models::Entity;

/// Status of a logged find (lapel badge or high-value item).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoundStatus {
    Found,
    Returned,
}

/// Status of a missing-item report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingStatus {
    Missing,
    Returned,
}

impl FoundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoundStatus::Found => "found",
            FoundStatus::Returned => "returned",
        }
    }
}

impl MissingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingStatus::Missing => "missing",
            MissingStatus::Returned => "returned",
        }
    }
}

/// The three kinds of register entries that can be reunited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    LapelBadge,
    HighValue,
    Missing,
}

impl ItemType {
    /// Collection holding entries of this type.
    pub fn collection(&self) -> Collection {
        match self {
            ItemType::LapelBadge => Collection::LapelBadges,
            ItemType::HighValue => Collection::HighValueItems,
            ItemType::Missing => Collection::MissingItems,
        }
    }

    /// Item number prefix for this type.
    pub fn prefix(&self) -> &'static str {
        match self {
            ItemType::LapelBadge => prefixes::LAPEL_BADGE,
            ItemType::HighValue => prefixes::HIGH_VALUE,
            ItemType::Missing => prefixes::MISSING,
        }
    }

    /// Status value an entry of this type holds before it is reunited.
    pub fn open_status(&self) -> &'static str {
        match self {
            ItemType::LapelBadge | ItemType::HighValue => FoundStatus::Found.as_str(),
            ItemType::Missing => MissingStatus::Missing.as_str(),
        }
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::LapelBadge => "lapel-badge",
            ItemType::HighValue => "high-value",
            ItemType::Missing => "missing",
        }
    }

    /// Human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            ItemType::LapelBadge => "Lapel Badge",
            ItemType::HighValue => "High-Value Item",
            ItemType::Missing => "Missing Item",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = LfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lapel-badge" | "badge" => Ok(ItemType::LapelBadge),
            "high-value" | "item" => Ok(ItemType::HighValue),
            "missing" => Ok(ItemType::Missing),
            other => Err(LfError::InvalidFormat(format!("unknown item type: {other}"))),
        }
    }
}

/// A found lapel badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LapelBadge {
    pub id: String,
    pub item_number: String,
    pub name: String,
    pub congregation: String,
    pub where_found: String,
    /// Staff member who logged the find.
    pub logger: String,
    pub timestamp: DateTime<Utc>,
    pub status: FoundStatus,
}

/// A found item of value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighValueItem {
    pub id: String,
    pub item_number: String,
    pub category: String,
    pub description: String,
    pub where_found: String,
    pub logger: String,
    pub timestamp: DateTime<Utc>,
    pub status: FoundStatus,
}

/// A report of something lost; it has no find location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingItem {
    pub id: String,
    pub item_number: String,
    pub description: String,
    pub last_location: String,
    pub reported_by: String,
    pub phone_number: String,
    pub logger: String,
    pub timestamp: DateTime<Utc>,
    pub status: MissingStatus,
}

/// Fields a caller supplies when logging a lapel badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLapelBadge {
    pub name: String,
    pub congregation: String,
    pub where_found: String,
    pub logger: String,
}

/// Fields a caller supplies when logging a high-value item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHighValueItem {
    pub category: String,
    pub description: String,
    pub where_found: String,
    pub logger: String,
}

/// Fields a caller supplies when reporting a missing item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMissingItem {
    pub description: String,
    pub last_location: String,
    pub reported_by: String,
    pub phone_number: String,
    pub logger: String,
}

impl Entity for LapelBadge {
    const COLLECTION: Collection = Collection::LapelBadges;
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for HighValueItem {
    const COLLECTION: Collection = Collection::HighValueItems;
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for MissingItem {
    const COLLECTION: Collection = Collection::MissingItems;
    fn id(&self) -> &str {
        &self.id
    }
}
