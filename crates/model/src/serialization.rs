//! Wire-format helpers for backend payloads
//!
//! The backend stores every column as nullable and reports failures in-band
//! as `{"error": "..."}` bodies, so parsing goes through the helpers here.

use plano_core::{EditorError, EditorResult};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// Deserialize a value that may be `null`, falling back to `T::default()`
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Extract the in-band error message of a backend response, if any
pub fn embedded_error(body: &Value) -> Option<String> {
    body.as_object()?
        .get("error")
        .map(|e| match e {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

/// Parse a JSON array body into a list of entities
///
/// Elements that fail to parse are skipped with their error collected, so a
/// single malformed row does not hide the rest of the diagram.
pub fn parse_list<T: DeserializeOwned>(body: Value) -> EditorResult<(Vec<T>, Vec<String>)> {
    if let Some(message) = embedded_error(&body) {
        return Err(EditorError::backend("list", message));
    }

    let Value::Array(items) = body else {
        return Err(EditorError::validation(format!(
            "expected a JSON array, found {}",
            json_kind(&body)
        )));
    };

    let mut parsed = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();
    for item in items {
        match serde_json::from_value::<T>(item) {
            Ok(entity) => parsed.push(entity),
            Err(e) => rejected.push(e.to_string()),
        }
    }
    Ok((parsed, rejected))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: i64,
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
    }

    #[test]
    fn test_null_as_default() {
        let row: Row = serde_json::from_value(json!({"id": 1, "name": null})).unwrap();
        assert_eq!(row.name, "");
        let row: Row = serde_json::from_value(json!({"id": 2})).unwrap();
        assert_eq!(row.name, "");
    }

    #[test]
    fn test_embedded_error() {
        assert_eq!(
            embedded_error(&json!({"error": "Device type is required"})),
            Some("Device type is required".to_string())
        );
        assert_eq!(embedded_error(&json!({"device_id": 3})), None);
        assert_eq!(embedded_error(&json!([1, 2])), None);
    }

    #[test]
    fn test_parse_list_skips_malformed_rows() {
        let body = json!([{"id": 1, "name": "a"}, {"name": "no id"}, {"id": 3}]);
        let (rows, rejected): (Vec<Row>, _) = parse_list(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn test_parse_list_rejects_non_arrays() {
        let err = parse_list::<Row>(json!({"error": "boom"})).unwrap_err();
        assert!(err.is_network());
        let err = parse_list::<Row>(json!("nope")).unwrap_err();
        assert!(err.is_validation());
    }
}
