//! Per-prefix item number sequences.

use serde::{Deserialize, Serialize};

use lf_core::constants::ITEM_NUMBER_WIDTH;

use crate::collection::Collection;
use crate::models::Entity;

/// Last issued value of one item number sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub id: String,
    pub value: u64,
}

impl Counter {
    /// Counter record id for a prefix.
    pub fn key(prefix: &str) -> String {
        format!("{prefix}-counter")
    }

    /// Fresh counter for a prefix, at zero.
    pub fn new(prefix: &str) -> Self {
        Self {
            id: Self::key(prefix),
            value: 0,
        }
    }
}

impl Entity for Counter {
    const COLLECTION: Collection = Collection::Counters;
    fn id(&self) -> &str {
        &self.id
    }
}

/// Format an item number, e.g. `("LP", 7)` -> `"LP0007"`.
pub fn format_item_number(prefix: &str, value: u64) -> String {
    format!("{prefix}{value:0width$}", width = ITEM_NUMBER_WIDTH)
}
