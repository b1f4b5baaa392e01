//! Tolerant serde adapters for astrology payloads, whose scalar fields come
//! back as strings, numbers, booleans or null depending on the endpoint.

use std::collections::BTreeMap;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => if *b { "Yes" } else { "No" }.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => String::new(),
    }
}

pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(&Value::deserialize(deserializer)?))
}

pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let list = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .iter()
            .map(text)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::Null => Vec::new(),
        Value::Object(map) => map.values().map(text).filter(|s| !s.is_empty()).collect(),
        other => {
            let single = text(&other);
            if single.is_empty() { Vec::new() } else { vec![single] }
        }
    };
    Ok(list)
}

/// Position-preserving list for arrays that line up with another array or
/// a fixed set of columns. Empty and null entries stay as `""`.
pub fn cells<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let cells = match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().map(text).collect(),
        Value::Null => Vec::new(),
        other => vec![text(&other)],
    };
    Ok(cells)
}

/// Objects keep their keys; arrays are keyed by position.
pub fn string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = match Value::deserialize(deserializer)? {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), text(v))).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| ((i + 1).to_string(), text(v)))
            .collect(),
        _ => BTreeMap::new(),
    };
    Ok(map)
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(truthy(&Value::deserialize(deserializer)?))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

/// `None` when the field is missing or null, so "absent" and "false" differ.
pub fn maybe_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(truthy(&other)),
    })
}

/// `{ "name": "Friday", ... }` or a bare `"Friday"`.
pub fn named<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map.get("name").map(text).unwrap_or_default(),
        other => text(&other),
    })
}

/// Nested object that degrades to its default when the API sends null, a
/// string or an array instead.
pub fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).map_err(de::Error::custom),
        _ => Ok(T::default()),
    }
}

/// List of records, also accepted as an object keyed by index. Entries that
/// are not objects are skipped.
pub fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items: Vec<Value> = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter(Value::is_object)
        .map(|item| serde_json::from_value(item).map_err(de::Error::custom))
        .collect()
}

pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub fn number_rows<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = match Value::deserialize(deserializer)? {
        Value::Array(rows) => rows
            .iter()
            .map(|row| match row {
                Value::Array(cells) => cells.iter().map(text).collect(),
                other => vec![text(other)],
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(rows)
}
