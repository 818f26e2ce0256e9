//! Export blob codec.
//!
//! The blob is one JSON object keyed by collection wire name, each value an
//! array of records. Encoding always writes all six collections. Decoding
//! returns only the collections present in the input, so callers can apply a
//! partial import per present key.

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};
use tracing::debug;

use lf_core::error::{LfError, LfResult};

use crate::collection::Collection;
use crate::record::{json_kind, Record};

/// Records grouped by collection.
pub type CollectionData = BTreeMap<Collection, Vec<Record>>;

/// Encode collections into a compact blob. Absent collections become `[]`.
pub fn encode(data: &CollectionData) -> LfResult<String> {
    Ok(serde_json::to_string(&to_value(data))?)
}

/// Encode collections into an indented document, for files meant to be read.
pub fn encode_pretty(data: &CollectionData) -> LfResult<String> {
    Ok(serde_json::to_string_pretty(&to_value(data))?)
}

fn to_value(data: &CollectionData) -> Value {
    let mut root = Map::new();
    for collection in Collection::ALL {
        let records = data
            .get(&collection)
            .map(|rs| rs.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default();
        root.insert(collection.name().to_string(), Value::Array(records));
    }
    Value::Object(root)
}

/// Decode a blob. Fails with `InvalidFormat` without partial results,
/// including when an id repeats within one collection.
pub fn decode(blob: &str) -> LfResult<CollectionData> {
    let root: Value = serde_json::from_str(blob)
        .map_err(|e| LfError::InvalidFormat(format!("not valid JSON: {e}")))?;

    let Value::Object(root) = root else {
        return Err(LfError::InvalidFormat(format!(
            "expected a JSON object at the top level, got {}",
            json_kind(&root)
        )));
    };

    let mut data = CollectionData::new();
    for (key, value) in root {
        let Some(collection) = Collection::from_name(&key) else {
            debug!("ignoring unknown collection key in blob: {key}");
            continue;
        };
        data.insert(collection, decode_records(collection, value)?);
    }
    Ok(data)
}

fn decode_records(collection: Collection, value: Value) -> LfResult<Vec<Record>> {
    let Value::Array(items) = value else {
        return Err(LfError::InvalidFormat(format!(
            "{collection}: expected an array, got {}",
            json_kind(&value)
        )));
    };

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let record = match item {
            Value::Object(record) => record,
            other => {
                return Err(LfError::InvalidFormat(format!(
                    "{collection}[{index}]: expected an object, got {}",
                    json_kind(&other)
                )))
            }
        };
        let Some(id) = record.get("id").and_then(Value::as_str) else {
            return Err(LfError::InvalidFormat(format!(
                "{collection}[{index}]: record has no string id"
            )));
        };
        if !seen.insert(id.to_string()) {
            return Err(LfError::InvalidFormat(format!(
                "{collection}[{index}]: duplicate id {id}"
            )));
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_writes_every_collection() {
        let blob = encode(&CollectionData::new()).unwrap();
        let value: Value = serde_json::from_str(&blob).unwrap();
        for c in Collection::ALL {
            assert_eq!(value[c.name()], json!([]), "missing key {c}");
        }
    }

    #[test]
    fn test_decode_keeps_only_present_keys() {
        let data = decode(r#"{"lapelBadges":[{"id":"1","name":"A"}],"chats":[]}"#).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[&Collection::LapelBadges].len(), 1);
        assert!(!data.contains_key(&Collection::Counters));
    }

    #[test]
    fn test_decode_rejects_bad_shapes() {
        assert!(matches!(decode("not json"), Err(LfError::InvalidFormat(_))));
        assert!(matches!(decode("[1,2]"), Err(LfError::InvalidFormat(_))));
        assert!(matches!(
            decode(r#"{"counters": {"id": "x"}}"#),
            Err(LfError::InvalidFormat(_))
        ));
        assert!(matches!(
            decode(r#"{"counters": [{"value": 3}]}"#),
            Err(LfError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_decode_rejects_repeated_ids() {
        let err = decode(r#"{"lapelBadges":[{"id":"a","n":1},{"id":"a","n":2}]}"#).unwrap_err();
        assert!(matches!(err, LfError::InvalidFormat(ref m) if m.contains("duplicate id a")));

        // The same id in two collections is fine.
        let data = decode(r#"{"lapelBadges":[{"id":"a"}],"missingItems":[{"id":"a"}]}"#).unwrap();
        assert_eq!(data.len(), 2);
    }
}
