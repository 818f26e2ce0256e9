//! Database initialization, connection pooling, and lifecycle management.
//!
//! Uses SQLite (WAL mode by default) with r2d2 connection pooling. The
//! schema is created on open; there are no migrations.

use std::path::Path;
use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use tracing::{error, info};

use lf_core::config::DatabaseConfig;
use lf_core::error::{LfError, LfResult};

use crate::collection::Collection;
use crate::schema;

/// Type alias for the SQLite connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Database wrapper providing initialization, pooling, and lifecycle management.
#[derive(Clone)]
pub struct Database {
    pool: Arc<DbPool>,
}

impl Database {
    /// Open the database at the given path.
    ///
    /// Creates parent directories, builds the pool, optionally runs an
    /// integrity check and creates any missing collection tables.
    pub fn open(db_path: &Path, config: &DatabaseConfig) -> LfResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("opening database at {}", db_path.display());

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(config.pool_size.max(1))
            .connection_customizer(Box::new(ConnectionCustomizer {
                wal_mode: config.wal_mode,
            }))
            .build(manager)
            .map_err(|e| LfError::Pool(e.to_string()))?;

        let db = Self {
            pool: Arc::new(pool),
        };

        if config.integrity_check_on_connect {
            db.run_integrity_check()?;
        }

        {
            let conn = db.conn()?;
            schema::create_tables(&conn)?;
        }

        Ok(db)
    }

    /// Get a connection from the pool.
    pub fn conn(&self) -> LfResult<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| LfError::Pool(e.to_string()))
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Run a SQLite integrity check.
    pub fn run_integrity_check(&self) -> LfResult<()> {
        let conn = self.conn()?;
        let result: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

        if result != "ok" {
            error!("database integrity check failed: {result}");
            return Err(LfError::IntegrityCheck(result));
        }

        info!("database integrity check passed");
        Ok(())
    }

    /// Execute a function within a database transaction.
    ///
    /// The transaction is rolled back when `f` fails.
    pub fn transaction<T, F>(&self, f: F) -> LfResult<T>
    where
        F: FnOnce(&Connection) -> LfResult<T>,
    {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let result = f(&tx)?;

        tx.commit()?;
        Ok(result)
    }

    /// Row count of one collection table.
    pub fn count(&self, collection: Collection) -> LfResult<u64> {
        let conn = self.conn()?;
        let sql = format!("SELECT COUNT(*) FROM {}", collection.table());
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// r2d2 connection customizer that applies PRAGMA settings.
#[derive(Debug)]
struct ConnectionCustomizer {
    wal_mode: bool,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ConnectionCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        if self.wal_mode {
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        }

        conn.execute_batch(
            "PRAGMA synchronous=NORMAL;
             PRAGMA temp_store=MEMORY;
             PRAGMA busy_timeout=5000;",
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;
    use tempfile::TempDir;

    fn test_db() -> (Database, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("test.db");
        let db = Database::open(&path, &DatabaseConfig::default()).unwrap();
        (db, dir)
    }

    #[test]
    fn test_open_creates_every_table() {
        let (db, _dir) = test_db();
        for c in Collection::ALL {
            assert_eq!(db.count(c).unwrap(), 0);
        }
    }

    #[test]
    fn test_integrity_check() {
        let (db, _dir) = test_db();
        assert!(db.run_integrity_check().is_ok());
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let (db, _dir) = test_db();
        let result: LfResult<()> = db.transaction(|conn| {
            conn.execute(
                "INSERT INTO counters (id, data) VALUES (?1, ?2)",
                params!["LP-counter", r#"{"id":"LP-counter","value":1}"#],
            )?;
            Err(LfError::Internal("abort".into()))
        });
        assert!(result.is_err());
        assert_eq!(db.count(Collection::Counters).unwrap(), 0);
    }
}
