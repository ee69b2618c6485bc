//! Destinations for finished PDF bytes.

use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid output name: {0:?}")]
    InvalidName(String),

    #[error("Output store unavailable: {0}")]
    Unavailable(String),
}

/// Where a payload ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedOutput {
    /// The final file name, which may differ from the suggested one.
    pub name: String,
    /// Set when the output was written to the filesystem.
    pub path: Option<PathBuf>,
    pub bytes: usize,
}

/// Persists a rendered document. Errors are surfaced to the caller as-is and
/// never retried.
pub trait OutputSink: Send + Sync + Debug {
    fn save(&self, payload: &[u8], suggested_name: &str) -> Result<SavedOutput, SinkError>;

    fn name(&self) -> &'static str;
}

impl<S: OutputSink + ?Sized> OutputSink for Arc<S> {
    fn save(&self, payload: &[u8], suggested_name: &str) -> Result<SavedOutput, SinkError> {
        (**self).save(payload, suggested_name)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Rejects names that are empty or would escape the sink's namespace.
pub fn validate_output_name(name: &str) -> Result<&str, SinkError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\', '\0'])
    {
        return Err(SinkError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}

/// Keeps saved payloads in memory, in save order.
#[derive(Debug, Default)]
pub struct InMemoryOutputSink {
    outputs: RwLock<Vec<(String, Vec<u8>)>>,
}

impl InMemoryOutputSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The payload most recently saved under `name`.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        let outputs = self.outputs.read().ok()?;
        outputs
            .iter()
            .rev()
            .find(|(saved, _)| saved == name)
            .map(|(_, bytes)| bytes.clone())
    }

    pub fn names(&self) -> Vec<String> {
        self.outputs
            .read()
            .map(|o| o.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.outputs.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OutputSink for InMemoryOutputSink {
    fn save(&self, payload: &[u8], suggested_name: &str) -> Result<SavedOutput, SinkError> {
        let name = validate_output_name(suggested_name)?.to_string();
        let mut outputs = self
            .outputs
            .write()
            .map_err(|_| SinkError::Unavailable("output store lock poisoned".to_string()))?;
        outputs.push((name.clone(), payload.to_vec()));
        log::debug!("Stored {} bytes as '{}'", payload.len(), name);
        Ok(SavedOutput { name, path: None, bytes: payload.len() })
    }

    fn name(&self) -> &'static str {
        "InMemoryOutputSink"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_sink_save_and_get() {
        let sink = InMemoryOutputSink::new();
        let saved = sink.save(b"%PDF-1.7", "jobcard_1.pdf").unwrap();
        assert_eq!(saved.name, "jobcard_1.pdf");
        assert_eq!(saved.bytes, 8);
        assert!(saved.path.is_none());
        assert_eq!(sink.get("jobcard_1.pdf").unwrap(), b"%PDF-1.7");
        assert_eq!(sink.names(), vec!["jobcard_1.pdf".to_string()]);
    }

    #[test]
    fn test_output_name_validation() {
        assert!(matches!(validate_output_name(""), Err(SinkError::InvalidName(_))));
        assert!(matches!(validate_output_name("../x.pdf"), Err(SinkError::InvalidName(_))));
        assert!(matches!(validate_output_name("a\\b.pdf"), Err(SinkError::InvalidName(_))));
        assert_eq!(validate_output_name(" card.pdf ").unwrap(), "card.pdf");
    }

    #[test]
    fn test_in_memory_sink_rejects_bad_names() {
        let sink = InMemoryOutputSink::new();
        assert!(sink.save(b"x", "..").is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_sink_error_display_names_path() {
        let err = SinkError::Io {
            path: PathBuf::from("/exports/card.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/exports/card.pdf"));
        assert!(err.to_string().contains("denied"));
    }
}
