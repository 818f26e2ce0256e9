//! Named collections shared by every storage provider.

use std::fmt;

/// A named group of records of one entity type.
///
/// The wire names are the keys of the export blob and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    LapelBadges,
    HighValueItems,
    MissingItems,
    ReturnedItems,
    Settings,
    Counters,
}

impl Collection {
    /// Every collection, in export order.
    pub const ALL: [Collection; 6] = [
        Collection::LapelBadges,
        Collection::HighValueItems,
        Collection::MissingItems,
        Collection::ReturnedItems,
        Collection::Settings,
        Collection::Counters,
    ];

    /// Collections holding register entries (excludes settings and counters).
    pub const ENTITIES: [Collection; 4] = [
        Collection::LapelBadges,
        Collection::HighValueItems,
        Collection::MissingItems,
        Collection::ReturnedItems,
    ];

    /// Wire name used in export blobs.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::LapelBadges => "lapelBadges",
            Collection::HighValueItems => "highValueItems",
            Collection::MissingItems => "missingItems",
            Collection::ReturnedItems => "returnedItems",
            Collection::Settings => "settings",
            Collection::Counters => "counters",
        }
    }

    /// SQLite table backing this collection.
    pub fn table(&self) -> &'static str {
        match self {
            Collection::LapelBadges => "lapel_badges",
            Collection::HighValueItems => "high_value_items",
            Collection::MissingItems => "missing_items",
            Collection::ReturnedItems => "returned_items",
            Collection::Settings => "settings",
            Collection::Counters => "counters",
        }
    }

    /// Look up a collection by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for c in Collection::ALL {
            assert_eq!(Collection::from_name(c.name()), Some(c));
        }
        assert_eq!(Collection::from_name("chats"), None);
    }

    #[test]
    fn test_tables_are_unique() {
        let mut tables: Vec<_> = Collection::ALL.iter().map(|c| c.table()).collect();
        tables.sort();
        tables.dedup();
        assert_eq!(tables.len(), Collection::ALL.len());
    }
}
