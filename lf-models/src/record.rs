//! Untyped records as they cross the provider interface.
//!
//! A record is a JSON object carrying a string `id`. Providers store and merge
//! records without knowing their entity type; typed conversion happens at the
//! edges through [`to_record`] and [`from_record`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use lf_core::error::{LfError, LfResult};

/// A stored record: a JSON object keyed by field name.
pub type Record = Map<String, Value>;

/// Extract the string id of a record.
pub fn record_id(record: &Record) -> LfResult<&str> {
    record
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| LfError::InvalidFormat("record has no string id".into()))
}

/// Serialize a typed value into a record.
pub fn to_record<T: Serialize>(value: &T) -> LfResult<Record> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(LfError::Serialization(format!(
            "expected an object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Deserialize a record into a typed value.
pub fn from_record<T: DeserializeOwned>(record: Record) -> LfResult<T> {
    Ok(serde_json::from_value(Value::Object(record))?)
}

/// Shallow-merge `partial` onto `base`. The base id is never replaced.
pub fn merge(base: &mut Record, partial: Record) {
    for (key, value) in partial {
        if key == "id" {
            continue;
        }
        base.insert(key, value);
    }
}

/// Short name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_record_id() {
        assert_eq!(record_id(&rec(json!({"id": "a1"}))).unwrap(), "a1");
        assert!(record_id(&rec(json!({"id": 7}))).is_err());
        assert!(record_id(&rec(json!({}))).is_err());
    }

    #[test]
    fn test_merge_overwrites_fields_but_keeps_id() {
        let mut base = rec(json!({"id": "a", "status": "found", "name": "x"}));
        merge(&mut base, rec(json!({"id": "b", "status": "returned"})));
        assert_eq!(base["id"], "a");
        assert_eq!(base["status"], "returned");
        assert_eq!(base["name"], "x");
    }

    #[test]
    fn test_to_record_rejects_scalars() {
        assert!(to_record(&5).is_err());
    }
}
