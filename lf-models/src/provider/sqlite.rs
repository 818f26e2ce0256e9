//! Embedded SQLite provider.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use lf_core::config::{DatabaseConfig, StorageType};
use lf_core::error::{LfError, LfResult};

use crate::blob;
use crate::collection::Collection;
use crate::db::Database;
use crate::provider::{BulkWritePolicy, StorageProvider};
use crate::queries;
use crate::record::{merge, record_id, Record};

/// Durable provider keeping one table per collection.
pub struct SqliteProvider {
    path: PathBuf,
    config: DatabaseConfig,
    db: Option<Database>,
}

impl SqliteProvider {
    pub fn new(path: PathBuf, config: DatabaseConfig) -> Self {
        Self {
            path,
            config,
            db: None,
        }
    }

    fn db(&self) -> LfResult<&Database> {
        self.db
            .as_ref()
            .ok_or_else(|| LfError::NotConnected(StorageType::Database.to_string()))
    }
}

#[async_trait]
impl StorageProvider for SqliteProvider {
    fn kind(&self) -> StorageType {
        StorageType::Database
    }

    fn bulk_write_policy(&self) -> BulkWritePolicy {
        BulkWritePolicy::BestEffort
    }

    async fn connect(&mut self) -> LfResult<()> {
        if self.db.is_some() {
            return Ok(());
        }
        self.db = Some(Database::open(&self.path, &self.config)?);
        info!("database provider connected at {}", self.path.display());
        Ok(())
    }

    async fn disconnect(&mut self) -> LfResult<()> {
        if self.db.take().is_some() {
            info!("database provider disconnected");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.db.is_some()
    }

    async fn get_item(&self, collection: Collection, id: &str) -> LfResult<Option<Record>> {
        let conn = self.db()?.conn()?;
        queries::fetch_record(&conn, collection, id)
    }

    async fn get_all_items(&self, collection: Collection) -> LfResult<Vec<Record>> {
        let conn = self.db()?.conn()?;
        queries::fetch_all(&conn, collection)
    }

    async fn count_items(&self, collection: Collection) -> LfResult<usize> {
        Ok(self.db()?.count(collection)? as usize)
    }

    async fn set_item(&mut self, collection: Collection, record: Record) -> LfResult<Record> {
        let conn = self.db()?.conn()?;
        queries::put_record(&conn, collection, &record)?;
        debug!("{collection}: stored {}", record_id(&record)?);
        Ok(record)
    }

    async fn update_item(
        &mut self,
        collection: Collection,
        id: &str,
        partial: Record,
    ) -> LfResult<Record> {
        self.db()?.transaction(|conn| {
            let mut record = queries::fetch_record(conn, collection, id)?
                .ok_or_else(|| LfError::not_found(collection.name(), id))?;
            merge(&mut record, partial);
            queries::put_record(conn, collection, &record)?;
            debug!("{collection}: updated {id}");
            Ok(record)
        })
    }

    async fn delete_item(&mut self, collection: Collection, id: &str) -> LfResult<()> {
        let conn = self.db()?.conn()?;
        if queries::delete_record(&conn, collection, id)? {
            debug!("{collection}: deleted {id}");
        }
        Ok(())
    }

    async fn bulk_set_items(&mut self, collection: Collection, records: Vec<Record>) -> LfResult<()> {
        let conn = self.db()?.conn()?;
        let total = records.len();
        let mut failed = 0;
        for record in &records {
            if let Err(e) = queries::put_record(&conn, collection, record) {
                warn!("{collection}: bulk put failed: {e}");
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(LfError::BulkWrite {
                collection: collection.name().to_string(),
                failed,
                total,
            });
        }
        debug!("{collection}: bulk stored {total} records");
        Ok(())
    }

    async fn clear_store(&mut self, collection: Collection) -> LfResult<()> {
        let conn = self.db()?.conn()?;
        queries::clear(&conn, collection)
    }

    async fn clear_all_stores(&mut self) -> LfResult<()> {
        self.db()?.transaction(|conn| {
            for collection in Collection::ALL {
                queries::clear(conn, collection)?;
            }
            Ok(())
        })
    }

    async fn import_data(&mut self, blob: &str) -> LfResult<()> {
        let db = self.db()?;
        let data = blob::decode(blob)?;
        db.transaction(|conn| {
            for (collection, records) in &data {
                queries::clear(conn, *collection)?;
                for record in records {
                    queries::put_record(conn, *collection, record)?;
                }
            }
            Ok(())
        })?;
        info!("database provider imported {} collections", data.len());
        Ok(())
    }
}
