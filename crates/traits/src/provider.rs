//! Sources of job records and layouts.
//!
//! The engine never reads storage itself; it asks a provider for the record
//! and the layout of the job card being exported.

use docket_document::{LayoutDocument, LayoutError};
use docket_template::{RecordData, RecordError};
use docket_types::{LayoutId, RecordId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for record and layout lookups.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to load '{id}': {message}")]
    LoadFailed { id: String, message: String },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        ProviderError::Io(err.to_string())
    }
}

impl From<LayoutError> for ProviderError {
    fn from(err: LayoutError) -> Self {
        ProviderError::InvalidFormat(err.to_string())
    }
}

impl From<RecordError> for ProviderError {
    fn from(err: RecordError) -> Self {
        ProviderError::InvalidFormat(err.to_string())
    }
}

/// Looks up the job record whose values fill a layout's placeholders.
pub trait RecordProvider: Send + Sync + Debug {
    fn record(&self, id: &RecordId) -> Result<RecordData, ProviderError>;

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Looks up a parsed layout document.
pub trait LayoutProvider: Send + Sync + Debug {
    fn layout(&self, id: &LayoutId) -> Result<LayoutDocument, ProviderError>;

    fn name(&self) -> &'static str;
}

fn poisoned(id: &str) -> ProviderError {
    ProviderError::LoadFailed {
        id: id.to_string(),
        message: "store lock poisoned".to_string(),
    }
}

/// Records held in memory, keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryRecordProvider {
    records: RwLock<HashMap<RecordId, Arc<RecordData>>>,
}

impl InMemoryRecordProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `ProviderError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, id: impl Into<RecordId>, record: RecordData) -> Result<(), ProviderError> {
        let id = id.into();
        let mut records = self.records.write().map_err(|_| poisoned(id.as_str()))?;
        records.insert(id, Arc::new(record));
        Ok(())
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordProvider for InMemoryRecordProvider {
    fn record(&self, id: &RecordId) -> Result<RecordData, ProviderError> {
        let records = self.records.read().map_err(|_| poisoned(id.as_str()))?;
        records
            .get(id)
            .map(|r| RecordData::clone(r))
            .ok_or_else(|| ProviderError::NotFound(format!("record {}", id)))
    }

    fn name(&self) -> &'static str {
        "InMemoryRecordProvider"
    }
}

/// Layouts held in memory, keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryLayoutProvider {
    layouts: RwLock<HashMap<LayoutId, Arc<LayoutDocument>>>,
}

impl InMemoryLayoutProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `ProviderError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, id: impl Into<LayoutId>, layout: LayoutDocument) -> Result<(), ProviderError> {
        let id = id.into();
        let mut layouts = self.layouts.write().map_err(|_| poisoned(id.as_str()))?;
        layouts.insert(id, Arc::new(layout));
        Ok(())
    }

    /// Parses and stores a layout given as JSON text.
    pub fn add_json(&self, id: impl Into<LayoutId>, json: &str) -> Result<(), ProviderError> {
        let layout = LayoutDocument::from_json_str(json)?;
        self.add(id, layout)
    }

    pub fn len(&self) -> usize {
        self.layouts.read().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LayoutProvider for InMemoryLayoutProvider {
    fn layout(&self, id: &LayoutId) -> Result<LayoutDocument, ProviderError> {
        let layouts = self.layouts.read().map_err(|_| poisoned(id.as_str()))?;
        layouts
            .get(id)
            .map(|l| LayoutDocument::clone(l))
            .ok_or_else(|| ProviderError::NotFound(format!("layout {}", id)))
    }

    fn name(&self) -> &'static str {
        "InMemoryLayoutProvider"
    }
}
