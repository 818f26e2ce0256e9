//! Lost & Found Models - Entities, collections and the storage providers.
//!
//! This crate owns all data persistence: the entity models, the collection
//! names shared by every backend, the export blob codec, the
//! `StorageProvider` capability trait and its two implementations (an
//! embedded SQLite database and a portable in-memory/file store).

pub mod collection;
pub mod record;
pub mod blob;
pub mod models;
pub mod db;
pub mod schema;
pub mod queries;
pub mod provider;

// Re-export key types
pub use collection::Collection;
pub use record::Record;
pub use db::{Database, DbPool};
pub use models::{
    Counter, Entity, ExportSettings, FoundStatus, HighValueItem, ItemSnapshot, ItemType,
    LapelBadge, MissingItem, MissingStatus, NewHighValueItem, NewLapelBadge, NewMissingItem,
    ReturnedItem,
};
pub use provider::{
    create_provider, BulkWritePolicy, FileProvider, PortableFile, ProviderSettings,
    SqliteProvider, StorageProvider,
};
