//! Portable in-memory provider backed by JSON files.
//!
//! Collections live in memory while connected. A cache snapshot is read on
//! connect and written on disconnect so that the store survives a process
//! restart; explicit save/load goes through [`PortableFile`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use lf_core::config::StorageType;
use lf_core::error::{LfError, LfResult};

use crate::blob::{self, CollectionData};
use crate::collection::Collection;
use crate::provider::{BulkWritePolicy, PortableFile, StorageProvider};
use crate::record::{merge, record_id, Record};

/// One collection, in insertion order.
#[derive(Debug, Default, Clone)]
struct Table {
    records: Vec<Record>,
}

impl Table {
    fn position(&self, id: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.get("id").and_then(|v| v.as_str()) == Some(id))
    }

    fn upsert(&mut self, record: Record) -> LfResult<()> {
        let id = record_id(&record)?.to_string();
        match self.position(&id) {
            Some(i) => self.records[i] = record,
            None => self.records.push(record),
        }
        Ok(())
    }
}

type Tables = BTreeMap<Collection, Table>;

fn tables_from(data: CollectionData) -> Tables {
    let mut tables: Tables = Collection::ALL.iter().map(|c| (*c, Table::default())).collect();
    for (collection, records) in data {
        tables.insert(collection, Table { records });
    }
    tables
}

/// Provider whose data is held in memory and moved around as JSON documents.
pub struct FileProvider {
    cache_path: Option<PathBuf>,
    tables: Option<Tables>,
}

impl FileProvider {
    /// `cache_path` is the snapshot file; `None` keeps nothing between connections.
    pub fn new(cache_path: Option<PathBuf>) -> Self {
        Self {
            cache_path,
            tables: None,
        }
    }

    fn tables(&self) -> LfResult<&Tables> {
        self.tables
            .as_ref()
            .ok_or_else(|| LfError::NotConnected(StorageType::File.to_string()))
    }

    fn tables_mut(&mut self) -> LfResult<&mut Tables> {
        self.tables
            .as_mut()
            .ok_or_else(|| LfError::NotConnected(StorageType::File.to_string()))
    }

    fn table_mut(&mut self, collection: Collection) -> LfResult<&mut Table> {
        Ok(self.tables_mut()?.entry(collection).or_default())
    }

    fn snapshot(&self) -> LfResult<CollectionData> {
        Ok(self
            .tables()?
            .iter()
            .map(|(c, t)| (*c, t.records.clone()))
            .collect())
    }

    fn hydrate(&self) -> Tables {
        let Some(path) = self.cache_path.as_deref() else {
            return tables_from(CollectionData::new());
        };
        if !path.exists() {
            return tables_from(CollectionData::new());
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(LfError::from)
            .and_then(|contents| blob::decode(&contents));
        match parsed {
            Ok(data) => {
                debug!("hydrated file provider from {}", path.display());
                tables_from(data)
            }
            Err(e) => {
                warn!("ignoring unreadable cache snapshot {}: {e}", path.display());
                tables_from(CollectionData::new())
            }
        }
    }

    fn apply(&mut self, data: CollectionData) -> LfResult<()> {
        let tables = self.tables_mut()?;
        for (collection, records) in data {
            tables.insert(collection, Table { records });
        }
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for FileProvider {
    fn kind(&self) -> StorageType {
        StorageType::File
    }

    fn bulk_write_policy(&self) -> BulkWritePolicy {
        BulkWritePolicy::InMemory
    }

    async fn connect(&mut self) -> LfResult<()> {
        if self.tables.is_some() {
            return Ok(());
        }
        self.tables = Some(self.hydrate());
        info!("file provider connected");
        Ok(())
    }

    async fn disconnect(&mut self) -> LfResult<()> {
        if self.tables.is_none() {
            return Ok(());
        }

        // Stay connected until the snapshot is on disk.
        if let Some(path) = &self.cache_path {
            let snapshot = blob::encode(&self.snapshot()?)?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, snapshot)?;
            debug!("wrote cache snapshot to {}", path.display());
        }

        self.tables = None;
        info!("file provider disconnected");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.tables.is_some()
    }

    async fn get_item(&self, collection: Collection, id: &str) -> LfResult<Option<Record>> {
        let tables = self.tables()?;
        Ok(tables
            .get(&collection)
            .and_then(|t| t.position(id).map(|i| t.records[i].clone())))
    }

    async fn get_all_items(&self, collection: Collection) -> LfResult<Vec<Record>> {
        let tables = self.tables()?;
        Ok(tables
            .get(&collection)
            .map(|t| t.records.clone())
            .unwrap_or_default())
    }

    async fn set_item(&mut self, collection: Collection, record: Record) -> LfResult<Record> {
        self.table_mut(collection)?.upsert(record.clone())?;
        debug!("{collection}: stored {}", record_id(&record)?);
        Ok(record)
    }

    async fn update_item(
        &mut self,
        collection: Collection,
        id: &str,
        partial: Record,
    ) -> LfResult<Record> {
        let table = self.table_mut(collection)?;
        let index = table
            .position(id)
            .ok_or_else(|| LfError::not_found(collection.name(), id))?;
        merge(&mut table.records[index], partial);
        debug!("{collection}: updated {id}");
        Ok(table.records[index].clone())
    }

    async fn delete_item(&mut self, collection: Collection, id: &str) -> LfResult<()> {
        let table = self.table_mut(collection)?;
        if let Some(index) = table.position(id) {
            table.records.remove(index);
            debug!("{collection}: deleted {id}");
        }
        Ok(())
    }

    async fn bulk_set_items(&mut self, collection: Collection, records: Vec<Record>) -> LfResult<()> {
        for record in &records {
            record_id(record)?;
        }
        let table = self.table_mut(collection)?;
        let total = records.len();
        for record in records {
            table.upsert(record)?;
        }
        debug!("{collection}: bulk stored {total} records");
        Ok(())
    }

    async fn clear_store(&mut self, collection: Collection) -> LfResult<()> {
        self.table_mut(collection)?.records.clear();
        Ok(())
    }

    async fn export_data(&self) -> LfResult<String> {
        blob::encode(&self.snapshot()?)
    }

    async fn import_data(&mut self, blob: &str) -> LfResult<()> {
        self.tables()?;
        let data = blob::decode(blob)?;
        let count = data.len();
        self.apply(data)?;
        info!("file provider imported {count} collections");
        Ok(())
    }

    fn as_portable(&self) -> Option<&dyn PortableFile> {
        Some(self)
    }

    fn as_portable_mut(&mut self) -> Option<&mut dyn PortableFile> {
        Some(self)
    }
}

#[async_trait]
impl PortableFile for FileProvider {
    async fn save_to_file(&self, path: &Path) -> LfResult<()> {
        let document = blob::encode_pretty(&self.snapshot()?)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, document)?;
        info!("saved data to {}", path.display());
        Ok(())
    }

    async fn load_from_file(&mut self, path: &Path) -> LfResult<()> {
        self.tables()?;
        let contents = std::fs::read_to_string(path)?;
        let data = blob::decode(&contents)?;
        self.apply(data)?;
        info!("loaded data from {}", path.display());
        Ok(())
    }
}
