//! Newtype wrappers for the identifiers collaborators hand to the engine.
//!
//! Records (job cards) and layouts live in an external store; these types keep
//! the two kinds of id from being mixed up at the provider boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of a job-card record owned by the record provider.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Arc<str>);

impl RecordId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a stored layout owned by the layout provider.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutId(Arc<str>);

impl LayoutId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LayoutId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for LayoutId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for LayoutId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_creation() {
        let id1 = RecordId::new("42");
        let id2 = RecordId::from("42");
        let id3 = RecordId::from(String::from("42"));

        assert_eq!(id1, id2);
        assert_eq!(id2, id3);
        assert_eq!(id1.as_str(), "42");
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&LayoutId::new("invoice")).unwrap();
        assert_eq!(json, "\"invoice\"");
        let back: RecordId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(back.to_string(), "7");
    }

    #[test]
    fn test_hash_map_usage() {
        use std::collections::HashMap;

        let mut layouts = HashMap::new();
        layouts.insert(LayoutId::new("a"), 1);
        layouts.insert(LayoutId::new("b"), 2);
        assert_eq!(layouts.get(&LayoutId::new("a")), Some(&1));
    }
}
