//! Table creation for the SQLite provider.
//!
//! Every collection is one table of JSON documents keyed by record id.

use rusqlite::Connection;
use tracing::debug;

use lf_core::error::{LfError, LfResult};

use crate::collection::Collection;

/// Create a table per collection if it does not exist.
pub fn create_tables(conn: &Connection) -> LfResult<()> {
    for collection in Collection::ALL {
        conn.execute_batch(&create_table_sql(collection))
            .map_err(|e| LfError::Database(format!("failed to create {}: {e}", collection.table())))?;
    }
    debug!("database schema verified");
    Ok(())
}

fn create_table_sql(collection: Collection) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (
            id   TEXT PRIMARY KEY NOT NULL,
            data TEXT NOT NULL
        );",
        collection.table()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 6);
    }
}
