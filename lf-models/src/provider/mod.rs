//! The storage provider capability and its factory.
//!
//! A provider is a CRUD store over the six collections. The storage manager
//! holds exactly one boxed provider at a time and swaps it on a backend
//! change. Providers exchange untyped [`Record`]s; the typed helpers at the
//! bottom of this module convert to and from [`Entity`] values.

pub mod file;
pub mod sqlite;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use lf_core::config::{AppConfig, DatabaseConfig, StorageType};
use lf_core::error::LfResult;

use crate::blob::{self, CollectionData};
use crate::collection::Collection;
use crate::models::Entity;
use crate::record::{from_record, to_record, Record};

pub use file::FileProvider;
pub use sqlite::SqliteProvider;

/// How a provider behaves when some puts of a bulk write fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkWritePolicy {
    /// Every put is attempted; failures are aggregated into one error.
    BestEffort,
    /// In-memory upsert that cannot partially fail.
    InMemory,
}

/// CRUD over named collections of id-keyed records.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Backend this provider implements.
    fn kind(&self) -> StorageType;

    fn bulk_write_policy(&self) -> BulkWritePolicy;

    /// Open the backend. Calling it on a connected provider is a no-op.
    async fn connect(&mut self) -> LfResult<()>;

    /// Release the backend. Calling it on a disconnected provider is a no-op.
    async fn disconnect(&mut self) -> LfResult<()>;

    fn is_connected(&self) -> bool;

    async fn get_item(&self, collection: Collection, id: &str) -> LfResult<Option<Record>>;

    async fn get_all_items(&self, collection: Collection) -> LfResult<Vec<Record>>;

    /// Number of records in a collection.
    async fn count_items(&self, collection: Collection) -> LfResult<usize> {
        Ok(self.get_all_items(collection).await?.len())
    }

    /// Insert or overwrite a record by its id.
    async fn set_item(&mut self, collection: Collection, record: Record) -> LfResult<Record>;

    /// Merge `partial` into an existing record. Fails with `NotFound` if absent.
    async fn update_item(
        &mut self,
        collection: Collection,
        id: &str,
        partial: Record,
    ) -> LfResult<Record>;

    /// Delete a record. Deleting an absent id succeeds.
    async fn delete_item(&mut self, collection: Collection, id: &str) -> LfResult<()>;

    async fn bulk_set_items(&mut self, collection: Collection, records: Vec<Record>) -> LfResult<()>;

    async fn clear_store(&mut self, collection: Collection) -> LfResult<()>;

    async fn clear_all_stores(&mut self) -> LfResult<()> {
        for collection in Collection::ALL {
            self.clear_store(collection).await?;
        }
        Ok(())
    }

    /// Serialize all six collections into one blob.
    async fn export_data(&self) -> LfResult<String> {
        let mut data = CollectionData::new();
        for collection in Collection::ALL {
            data.insert(collection, self.get_all_items(collection).await?);
        }
        blob::encode(&data)
    }

    /// Replace the contents of every collection present in the blob.
    ///
    /// Collections absent from the blob are left alone. On failure the
    /// store is unchanged.
    async fn import_data(&mut self, blob: &str) -> LfResult<()>;

    /// Save/load capability, present only on the file provider.
    fn as_portable(&self) -> Option<&dyn PortableFile> {
        None
    }

    fn as_portable_mut(&mut self) -> Option<&mut dyn PortableFile> {
        None
    }
}

/// Whole-store save and load against a user-chosen file.
#[async_trait]
pub trait PortableFile: Send + Sync {
    /// Write every collection as one indented JSON document.
    async fn save_to_file(&self, path: &Path) -> LfResult<()>;

    /// Read a document and apply it with the same policy as `import_data`.
    async fn load_from_file(&mut self, path: &Path) -> LfResult<()>;
}

/// Everything the factory needs to build either provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub db_path: PathBuf,
    pub database: DatabaseConfig,
    /// Cache snapshot location for the file provider; `None` keeps it purely in memory.
    pub file_cache_path: Option<PathBuf>,
}

impl ProviderSettings {
    pub fn from_config(config: &AppConfig) -> LfResult<Self> {
        Ok(Self {
            db_path: config.effective_db_path()?,
            database: config.database.clone(),
            file_cache_path: Some(config.effective_file_cache_path()?),
        })
    }
}

/// Build an unconnected provider for a backend.
pub fn create_provider(kind: StorageType, settings: &ProviderSettings) -> Box<dyn StorageProvider> {
    match kind {
        StorageType::Database => Box::new(SqliteProvider::new(
            settings.db_path.clone(),
            settings.database.clone(),
        )),
        StorageType::File => Box::new(FileProvider::new(settings.file_cache_path.clone())),
    }
}

/// Fetch and decode one entity.
pub async fn get_entity<T: Entity>(provider: &dyn StorageProvider, id: &str) -> LfResult<Option<T>> {
    provider
        .get_item(T::COLLECTION, id)
        .await?
        .map(from_record)
        .transpose()
}

/// Fetch and decode every entity of a type. Records that fail to decode are
/// skipped with a warning.
pub async fn all_entities<T: Entity>(provider: &dyn StorageProvider) -> LfResult<Vec<T>> {
    let records = provider.get_all_items(T::COLLECTION).await?;
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let id = record.get("id").cloned();
        match from_record::<T>(record) {
            Ok(entity) => out.push(entity),
            Err(e) => warn!("skipping unreadable {} record {:?}: {e}", T::COLLECTION, id),
        }
    }
    Ok(out)
}

/// Encode and store one entity.
pub async fn put_entity<T: Entity>(provider: &mut dyn StorageProvider, entity: &T) -> LfResult<()> {
    provider.set_item(T::COLLECTION, to_record(entity)?).await?;
    debug!("saved {} {}", T::COLLECTION, entity.id());
    Ok(())
}
