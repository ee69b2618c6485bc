//! Providers that read one JSON file per id from a directory.
//!
//! A record with id `7` lives at `<base>/7.json`. Ids are validated so that
//! the resolved path never leaves the base directory.

use docket_document::LayoutDocument;
use docket_template::RecordData;
use docket_traits::{LayoutProvider, ProviderError, RecordProvider};
use docket_types::{LayoutId, RecordId};
use serde_json::Value;
use std::path::{Component, Path, PathBuf};

#[derive(Debug)]
struct JsonDir {
    base_path: PathBuf,
    /// Canonicalized base path for security checks
    canonical_base: Option<PathBuf>,
}

impl JsonDir {
    fn new(base_path: &Path) -> Self {
        Self {
            base_path: base_path.to_path_buf(),
            canonical_base: base_path.canonicalize().ok(),
        }
    }

    /// Returns `None` if the id would escape the base directory.
    fn resolve_path_safe(&self, id: &str) -> Option<PathBuf> {
        let file_name = format!("{}.json", id);
        let relative = Path::new(&file_name);
        if id.is_empty()
            || relative.is_absolute()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }

        let full_path = self.base_path.join(relative);
        if let Ok(canonical) = full_path.canonicalize()
            && let Some(ref base) = self.canonical_base
        {
            return canonical.starts_with(base).then_some(canonical);
        }
        Some(full_path)
    }

    fn read(&self, id: &str) -> Result<String, ProviderError> {
        let path = self
            .resolve_path_safe(id)
            .ok_or_else(|| ProviderError::NotFound(format!("{} (path traversal blocked)", id)))?;
        log::debug!("Reading {}", path.display());
        std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProviderError::NotFound(id.to_string())
            } else {
                ProviderError::LoadFailed {
                    id: id.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

/// Job records stored as `<base>/<id>.json` job-card objects.
#[derive(Debug)]
pub struct JsonDirRecordProvider {
    dir: JsonDir,
}

impl JsonDirRecordProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self { dir: JsonDir::new(base_path.as_ref()) }
    }

    pub fn base(&self) -> &Path {
        &self.dir.base_path
    }
}

impl RecordProvider for JsonDirRecordProvider {
    fn record(&self, id: &RecordId) -> Result<RecordData, ProviderError> {
        let text = self.dir.read(id.as_str())?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| ProviderError::InvalidFormat(format!("record {}: {}", id, e)))?;
        Ok(RecordData::from_json(value)?)
    }

    fn name(&self) -> &'static str {
        "JsonDirRecordProvider"
    }
}

/// Layouts stored as `<base>/<id>.json` layout documents.
#[derive(Debug)]
pub struct JsonDirLayoutProvider {
    dir: JsonDir,
}

impl JsonDirLayoutProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self { dir: JsonDir::new(base_path.as_ref()) }
    }

    pub fn base(&self) -> &Path {
        &self.dir.base_path
    }
}

impl LayoutProvider for JsonDirLayoutProvider {
    fn layout(&self, id: &LayoutId) -> Result<LayoutDocument, ProviderError> {
        let text = self.dir.read(id.as_str())?;
        Ok(LayoutDocument::from_json_str(&text)?)
    }

    fn name(&self) -> &'static str {
        "JsonDirLayoutProvider"
    }
}
