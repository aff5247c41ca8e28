//! Value helpers
//!
//! Rows, request parameters and form values are `serde_json::Value`s. Where
//! "absent" and JSON `null` must stay distinct, absence is `Option::None`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request parameter object sent to the list API
pub type Params = Map<String, Value>;

/// Whether a filter value counts as "not set".
///
/// Matches the loose emptiness test the filter bar has always used: absent,
/// `null`, the strings `"null"` / `"undefined"`, `{}`, `[]`, or anything whose
/// JavaScript-style string form is empty (which also catches `""` and arrays
/// such as `[null]` or `[""]`).
pub fn is_empty(value: Option<&Value>) -> bool {
    let Some(value) = value else {
        return true;
    };
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty() || s == "null" || s == "undefined",
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty() || js_string(value).is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// JavaScript `String(value)` rendering.
///
/// Inside arrays `null` renders as nothing and elements are joined by commas.
pub fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => js_number_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn js_number_string(n: &serde_json::Number) -> String {
    match n.as_f64() {
        // Negative zero prints as "0"
        Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// Text shown in a plain table cell or input for a value
pub fn display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(v) => js_string(v),
    }
}

/// JavaScript `Number(value)` coercion, `None` standing for `NaN`
pub fn to_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
            }
        }
        Value::Array(items) => match items.as_slice() {
            [] => Some(0.0),
            [single] => to_number(Some(single)),
            _ => None,
        },
        Value::Object(_) => None,
    }
}

/// Read a non-negative integer field from a response payload
pub fn as_count(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Form object edited by a dialog.
///
/// A key can be present with an absent value so the form always carries the
/// full set of configured keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    values: BTreeMap<String, Option<Value>>,
}

impl FormData {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object; non-object values yield an empty form
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => map.into_iter().map(|(k, v)| (k, Some(v))).collect(),
            _ => Self::default(),
        }
    }

    /// Current value of a field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).and_then(Option::as_ref)
    }

    /// Whether the key exists, even with an absent value
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Set a field value
    pub fn set(&mut self, key: impl Into<String>, value: Option<Value>) {
        self.values.insert(key.into(), value);
    }

    /// Insert the key with an absent value unless it already exists
    pub fn ensure_key(&mut self, key: &str) {
        if !self.values.contains_key(key) {
            self.values.insert(key.to_string(), None);
        }
    }

    /// Iterate over keys and values
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert to a JSON object; absent values are dropped like JSON does
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .filter_map(|(k, v)| v.clone().map(|v| (k.clone(), v)))
            .collect();
        Value::Object(map)
    }
}

impl FromIterator<(String, Option<Value>)> for FormData {
    fn from_iter<I: IntoIterator<Item = (String, Option<Value>)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_values() {
        assert!(is_empty(None));
        for value in [
            json!(null),
            json!("null"),
            json!("undefined"),
            json!({}),
            json!([]),
            json!(""),
            json!([null]),
            json!([""]),
            json!([[]]),
        ] {
            assert!(is_empty(Some(&value)), "{value} should be empty");
        }
    }

    #[test]
    fn test_non_empty_values() {
        for value in [
            json!(0),
            json!(false),
            json!(" "),
            json!("abc"),
            json!({"a": null}),
            json!([null, null]),
            json!([0]),
        ] {
            assert!(!is_empty(Some(&value)), "{value} should not be empty");
        }
    }

    #[test]
    fn test_js_string() {
        assert_eq!(js_string(&json!([1, null, "a", [2, 3]])), "1,,a,2,3");
        assert_eq!(js_string(&json!(2.0)), "2");
        assert_eq!(js_string(&json!(2.5)), "2.5");
        assert_eq!(js_string(&json!(-0.0)), "0");
        assert_eq!(display(Some(&json!([-0.0, 1]))), "0,1");
        assert_eq!(js_string(&json!({"a": 1})), "[object Object]");
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(None), None);
        assert_eq!(to_number(Some(&json!(null))), Some(0.0));
        assert_eq!(to_number(Some(&json!(""))), Some(0.0));
        assert_eq!(to_number(Some(&json!(" 12 "))), Some(12.0));
        assert_eq!(to_number(Some(&json!("abc"))), None);
        assert_eq!(to_number(Some(&json!(true))), Some(1.0));
        assert_eq!(to_number(Some(&json!(["7"]))), Some(7.0));
    }

    #[test]
    fn test_as_count() {
        assert_eq!(as_count(Some(&json!(3))), Some(3));
        assert_eq!(as_count(Some(&json!("42"))), Some(42));
        assert_eq!(as_count(Some(&json!(-1))), None);
        assert_eq!(as_count(None), None);
    }

    #[test]
    fn test_form_data_keeps_absent_keys() {
        let mut form = FormData::from_value(json!({"name": "a"}));
        form.ensure_key("age");
        form.ensure_key("name");
        assert!(form.contains_key("age"));
        assert_eq!(form.get("age"), None);
        assert_eq!(form.get("name"), Some(&json!("a")));
        assert_eq!(form.to_value(), json!({"name": "a"}));
        assert_eq!(form.len(), 2);
    }
}
