use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("job record must be a JSON object, found {0}")]
    NotAnObject(&'static str),
    #[error("customData is not valid JSON: {0}")]
    CustomData(#[from] serde_json::Error),
}

/// The values a layout's placeholders draw from: the job card's title and
/// description plus its custom fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordData {
    pub title: String,
    pub description: String,
    pub fields: BTreeMap<String, String>,
}

impl RecordData {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// `title` and `description` always resolve, shadowing custom fields of the
    /// same name.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "description" => Some(&self.description),
            other => self.fields.get(other).map(String::as_str),
        }
    }

    /// Reads a stored job card: `{ "title", "description", "customData" }`.
    /// `customData` may be an object or a string holding a JSON object.
    pub fn from_json(value: Value) -> Result<Self, RecordError> {
        let Value::Object(mut card) = value else {
            return Err(RecordError::NotAnObject(kind(&value)));
        };
        let title = card.remove("title").map(scalar_to_string).unwrap_or_default();
        let description = card
            .remove("description")
            .map(scalar_to_string)
            .unwrap_or_default();

        let custom = match card.remove("customData") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(Value::String(raw)) if raw.trim().is_empty() => Map::new(),
            Some(Value::String(raw)) => match serde_json::from_str::<Value>(&raw)? {
                Value::Object(map) => map,
                other => return Err(RecordError::NotAnObject(kind(&other))),
            },
            Some(other) => return Err(RecordError::NotAnObject(kind(&other))),
        };

        let fields = custom
            .into_iter()
            .map(|(name, value)| (name, scalar_to_string(value)))
            .collect();
        Ok(Self { title, description, fields })
    }
}

/// Strings pass through, numbers and booleans keep their JSON text, and null
/// becomes empty.
fn scalar_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
