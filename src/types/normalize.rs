// src/types/normalize.rs
//! Lookup helpers for backend payloads whose field names drift between endpoints

use serde_json::Value;

/// First non-null value found under any of `keys`
pub fn pick<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find(|v| !v.is_null())
}

/// String field; numbers and booleans are rendered, empty strings are skipped
pub fn pick_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Numeric field; numeric strings such as `"4.5"` are accepted
pub fn pick_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub fn pick_i64(value: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub fn pick_array<'a>(value: &'a Value, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Name of a catalog-like entry that may be a bare string or an object
pub fn item_name(item: &Value, keys: &[&str]) -> Option<String> {
    match item {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(_) => pick_str(item, keys),
        _ => None,
    }
}

/// Either a bare array or the list nested under one of the usual envelope keys
pub fn list_items(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items.as_slice(),
        _ => {
            let direct = pick_array(value, &["items", "data", "results", "content"]);
            if !direct.is_empty() {
                return direct;
            }
            // `{ data: { items: [...] } }`
            value
                .get("data")
                .map(|inner| pick_array(inner, &["items", "results", "content"]))
                .unwrap_or(&[])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pick_str_skips_blank_and_null() {
        let v = json!({"firstName": "", "first_name": null, "name": " Ada "});
        assert_eq!(
            pick_str(&v, &["firstName", "first_name", "name"]),
            Some("Ada".to_string())
        );
    }

    #[test]
    fn test_pick_numbers_from_strings() {
        let v = json!({"score": "87.5", "years": "4"});
        assert_eq!(pick_f64(&v, &["score"]), Some(87.5));
        assert_eq!(pick_i64(&v, &["years"]), Some(4));
    }

    #[test]
    fn test_list_items_envelopes() {
        assert_eq!(list_items(&json!([1, 2])).len(), 2);
        assert_eq!(list_items(&json!({"results": [1]})).len(), 1);
        assert_eq!(list_items(&json!({"data": {"items": [1, 2, 3]}})).len(), 3);
        assert!(list_items(&json!({"message": "nothing"})).is_empty());
    }
}
