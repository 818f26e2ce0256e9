//! Entity models for every collection.

pub mod item;
pub mod returned_item;
pub mod counter;
pub mod export_settings;

pub use item::{
    FoundStatus, HighValueItem, ItemType, LapelBadge, MissingItem, MissingStatus, NewHighValueItem,
    NewLapelBadge, NewMissingItem,
};
pub use returned_item::{ItemSnapshot, ReturnedItem};
pub use counter::Counter;
pub use export_settings::ExportSettings;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::collection::Collection;

/// A typed record that lives in exactly one collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Collection holding records of this type.
    const COLLECTION: Collection;

    /// Record id, unique within the collection.
    fn id(&self) -> &str;
}
