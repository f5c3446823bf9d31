//! JSON bodies, flattened onto the canonical field map.
//!
//! Numbers keep their JSON text, except floats with no fractional part
//! (`1.0`, `1e2`) which are written as integers so integer fields accept them.

use serde_json::{Number, Value};

use super::FieldMap;
use crate::error::DecodeError;

/// Flatten a JSON object body.
///
/// Nested objects become dotted keys, arrays append each element under the
/// key of the array (an empty array records the key with no values), `null`
/// is treated as absent.
pub fn flatten(body: &[u8]) -> Result<FieldMap, DecodeError> {
    let Value::Object(object) = serde_json::from_slice(body)? else {
        return Err(DecodeError::JsonShape("expected an object at the top level"));
    };

    let mut fields = FieldMap::new();
    for (key, value) in object {
        flatten_into(&mut fields, key, value);
    }
    Ok(fields)
}

fn flatten_into(fields: &mut FieldMap, path: String, value: Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => fields.append(path, b.to_string()),
        Value::Number(n) => fields.append(path, number_text(&n)),
        Value::String(s) => fields.append(path, s),
        Value::Array(items) => {
            if items.is_empty() {
                fields.touch(path);
                return;
            }
            for item in items {
                flatten_into(fields, path.clone(), item);
            }
        }
        Value::Object(object) => {
            for (key, value) in object {
                flatten_into(fields, format!("{path}.{key}"), value);
            }
        }
    }
}

/// Largest magnitude below which every integral `f64` is exact.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f)
            if !n.is_i64()
                && !n.is_u64()
                && f.fract() == 0.0
                && f.abs() < EXACT_INTEGER_LIMIT =>
        {
            format!("{f:.0}")
        }
        _ => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_nested_document() {
        let fields = flatten(
            br#"{"id":123,"profile":{"name":"John","email":"john@example.com"},"verified":true,"follow_ids":[456,789],"note":null}"#,
        )
        .unwrap();

        assert_eq!(fields.first("id"), Some("123"));
        assert_eq!(fields.first("profile.name"), Some("John"));
        assert_eq!(fields.first("profile.email"), Some("john@example.com"));
        assert_eq!(fields.first("verified"), Some("true"));
        assert_eq!(fields.get("follow_ids").unwrap(), ["456", "789"]);
        assert_eq!(fields.get("note"), None);
    }

    #[test]
    fn test_array_of_objects_becomes_parallel_sequences() {
        let fields = flatten(br#"{"items":[{"sku":"a","qty":1},{"sku":"b","qty":2.5}]}"#).unwrap();
        assert_eq!(fields.get("items.sku").unwrap(), ["a", "b"]);
        assert_eq!(fields.get("items.qty").unwrap(), ["1", "2.5"]);
    }

    #[test]
    fn test_empty_array_records_key() {
        let fields = flatten(br#"{"tags":[],"group":{"ids":[]}}"#).unwrap();
        assert_eq!(fields.get("tags"), Some(&[][..]));
        assert_eq!(fields.get("group.ids"), Some(&[][..]));
        assert_eq!(fields.first("tags"), None);
    }

    #[test]
    fn test_integral_floats_read_as_integers() {
        let fields = flatten(br#"{"a":1.0,"b":1e2,"c":-3.0,"d":2.5,"e":7,"f":1e300}"#).unwrap();
        assert_eq!(fields.first("a"), Some("1"));
        assert_eq!(fields.first("b"), Some("100"));
        assert_eq!(fields.first("c"), Some("-3"));
        assert_eq!(fields.first("d"), Some("2.5"));
        assert_eq!(fields.first("e"), Some("7"));
        assert_eq!(fields.first("f"), Some("1e300"));
    }

    #[test]
    fn test_rejects_malformed_and_non_objects() {
        assert!(matches!(flatten(b"{invalid json}"), Err(DecodeError::Json(_))));
        assert!(matches!(flatten(b""), Err(DecodeError::Json(_))));
        assert!(matches!(flatten(b"[1,2]"), Err(DecodeError::JsonShape(_))));
    }
}
