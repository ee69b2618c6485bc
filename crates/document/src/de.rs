//! Lenient field readers for editor-produced JSON.
//!
//! The layout designer writes whatever its widgets hold: ids may be numbers,
//! counts may arrive as floats, and optional fields are often `null`.

use crate::element::Element;
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

/// Treats an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a string or a number and keeps its textual form.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

/// Reads an integer that may have been written as a float (`3.0`).
pub(crate) fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("integer out of range: {}", n))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid integer '{}': {}", s, e))),
        Some(other) => Err(de::Error::custom(format!("expected an integer, got {}", other))),
    }
}

/// Reads an element list, skipping entries that cannot be decoded.
///
/// An unknown `type` discriminator or a badly typed field costs one element,
/// never the whole page.
pub(crate) fn lenient_elements<'de, D>(deserializer: D) -> Result<Vec<Element>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(decode_elements(raw.unwrap_or_default()))
}

pub(crate) fn lenient_elements_opt<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<Element>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(decode_elements))
}

fn decode_elements(raw: Vec<Value>) -> Vec<Element> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let kind = value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("<untyped>")
                .to_string();
            match serde_json::from_value::<Element>(value) {
                Ok(element) => Some(element),
                Err(e) => {
                    log::warn!("Skipping unreadable layout element #{} ({}): {}", index, kind, e);
                    None
                }
            }
        })
        .collect()
}
