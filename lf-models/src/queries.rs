//! Record-level SQL for the collection tables.
//!
//! Records are stored as serialized JSON in the `data` column; the id is
//! duplicated into the primary key.

use rusqlite::{params, Connection, OptionalExtension};

use lf_core::error::{LfError, LfResult};

use crate::collection::Collection;
use crate::record::{record_id, Record};

fn decode_row(collection: Collection, data: &str) -> LfResult<Record> {
    serde_json::from_str(data).map_err(|e| {
        LfError::Serialization(format!("{}: stored record is not an object: {e}", collection))
    })
}

/// Fetch one record by id.
pub fn fetch_record(conn: &Connection, collection: Collection, id: &str) -> LfResult<Option<Record>> {
    let sql = format!("SELECT data FROM {} WHERE id = ?1", collection.table());
    let data: Option<String> = conn.query_row(&sql, [id], |row| row.get(0)).optional()?;
    data.map(|d| decode_row(collection, &d)).transpose()
}

/// Fetch every record of a collection, in insertion order.
pub fn fetch_all(conn: &Connection, collection: Collection) -> LfResult<Vec<Record>> {
    let sql = format!("SELECT data FROM {} ORDER BY rowid", collection.table());
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    rows.iter().map(|d| decode_row(collection, d)).collect()
}

/// Insert or replace a record by its id.
pub fn put_record(conn: &Connection, collection: Collection, record: &Record) -> LfResult<()> {
    let id = record_id(record)?;
    let data = serde_json::to_string(record)?;
    let sql = format!(
        "INSERT INTO {} (id, data) VALUES (?1, ?2)
         ON CONFLICT(id) DO UPDATE SET data = excluded.data",
        collection.table()
    );
    conn.execute(&sql, params![id, data])?;
    Ok(())
}

/// Delete a record. Returns whether a row was removed.
pub fn delete_record(conn: &Connection, collection: Collection, id: &str) -> LfResult<bool> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", collection.table());
    Ok(conn.execute(&sql, [id])? > 0)
}

/// Remove every record of a collection.
pub fn clear(conn: &Connection, collection: Collection) -> LfResult<()> {
    conn.execute_batch(&format!("DELETE FROM {};", collection.table()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use serde_json::json;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_tables(&conn).unwrap();
        conn
    }

    fn rec(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_put_is_upsert() {
        let conn = conn();
        put_record(&conn, Collection::Settings, &rec(json!({"id": "a", "v": 1}))).unwrap();
        put_record(&conn, Collection::Settings, &rec(json!({"id": "a", "v": 2}))).unwrap();

        let all = fetch_all(&conn, Collection::Settings).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0]["v"], 2);
    }

    #[test]
    fn test_fetch_missing_is_none() {
        let conn = conn();
        assert!(fetch_record(&conn, Collection::LapelBadges, "nope").unwrap().is_none());
        assert!(!delete_record(&conn, Collection::LapelBadges, "nope").unwrap());
    }

    #[test]
    fn test_collections_are_separate_tables() {
        let conn = conn();
        put_record(&conn, Collection::LapelBadges, &rec(json!({"id": "1"}))).unwrap();
        assert!(fetch_record(&conn, Collection::HighValueItems, "1").unwrap().is_none());

        clear(&conn, Collection::LapelBadges).unwrap();
        assert!(fetch_all(&conn, Collection::LapelBadges).unwrap().is_empty());
    }

    #[test]
    fn test_put_requires_id() {
        let conn = conn();
        assert!(put_record(&conn, Collection::Counters, &rec(json!({"value": 1}))).is_err());
    }
}
