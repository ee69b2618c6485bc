use docket_traits::{OutputSink, SavedOutput, SinkError, validate_output_name};
use std::fs::OpenOptions;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Writes PDFs into an export directory as `<stem>_<unix-millis>.pdf`.
///
/// The directory is created on first save. An existing file is never
/// overwritten; a counter suffix is appended instead.
#[derive(Debug, Clone)]
pub struct FilesystemOutputSink {
    export_dir: PathBuf,
    fixed_millis: Option<i64>,
}

impl FilesystemOutputSink {
    pub fn new<P: AsRef<Path>>(export_dir: P) -> Self {
        Self {
            export_dir: export_dir.as_ref().to_path_buf(),
            fixed_millis: None,
        }
    }

    /// Uses `millis` instead of the current time in generated file names.
    pub fn with_fixed_timestamp(mut self, millis: i64) -> Self {
        self.fixed_millis = Some(millis);
        self
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// The location `name` would have inside the export directory.
    pub fn export_path(&self, name: &str) -> Result<PathBuf, SinkError> {
        Ok(self.export_dir.join(validate_output_name(name)?))
    }

    fn ensure_dir(&self) -> Result<(), SinkError> {
        std::fs::create_dir_all(&self.export_dir).map_err(|source| SinkError::Io {
            path: self.export_dir.clone(),
            source,
        })
    }

    fn timestamp(&self) -> i64 {
        self.fixed_millis
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis())
    }
}

fn stem(name: &str) -> &str {
    match name.len().checked_sub(4) {
        Some(split) if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(".pdf") => {
            &name[..split]
        }
        _ => name,
    }
}

/// Runs `write`, removing the partially written file at `path` if it fails.
fn write_or_discard(
    path: &Path,
    payload: &[u8],
    write: impl FnOnce(&[u8]) -> io::Result<()>,
) -> Result<(), SinkError> {
    write(payload).map_err(|source| {
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("Could not remove incomplete {}: {}", path.display(), e);
        }
        SinkError::Io { path: path.to_path_buf(), source }
    })
}

impl OutputSink for FilesystemOutputSink {
    fn save(&self, payload: &[u8], suggested_name: &str) -> Result<SavedOutput, SinkError> {
        let stem = stem(validate_output_name(suggested_name)?);
        if stem.is_empty() {
            return Err(SinkError::InvalidName(suggested_name.to_string()));
        }
        self.ensure_dir()?;

        let base = format!("{}_{}", stem, self.timestamp());
        let mut attempt = 0u32;
        loop {
            let name = match attempt {
                0 => format!("{}.pdf", base),
                n => format!("{}_{}.pdf", base, n),
            };
            let path = self.export_dir.join(&name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    write_or_discard(&path, payload, |bytes| {
                        file.write_all(bytes)?;
                        file.sync_all()
                    })?;
                    log::info!("Saved {} bytes to {}", payload.len(), path.display());
                    return Ok(SavedOutput { name, path: Some(path), bytes: payload.len() });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    log::debug!("{} already exists, trying next suffix", path.display());
                    attempt += 1;
                }
                Err(source) => return Err(SinkError::Io { path, source }),
            }
        }
    }

    fn name(&self) -> &'static str {
        "FilesystemOutputSink"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_save_creates_directory_and_timestamps_name() {
        let dir = tempdir().unwrap();
        let export = dir.path().join("pdf-exports");
        let sink = FilesystemOutputSink::new(&export);

        let saved = sink.save(b"%PDF-1.7 test", "jobcard_7").unwrap();
        assert!(saved.name.starts_with("jobcard_7_"));
        assert!(saved.name.ends_with(".pdf"));
        let path = saved.path.unwrap();
        assert_eq!(path.parent().unwrap(), export.as_path());
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.7 test");
    }

    #[test]
    fn test_collisions_get_a_counter_suffix() {
        let dir = tempdir().unwrap();
        let sink = FilesystemOutputSink::new(dir.path()).with_fixed_timestamp(1_700_000_000_000);

        let first = sink.save(b"one", "jobcard_3.pdf").unwrap();
        let second = sink.save(b"two", "jobcard_3.pdf").unwrap();
        assert_eq!(first.name, "jobcard_3_1700000000000.pdf");
        assert_eq!(second.name, "jobcard_3_1700000000000_1.pdf");
        assert_eq!(fs::read(first.path.unwrap()).unwrap(), b"one");
        assert_eq!(fs::read(second.path.unwrap()).unwrap(), b"two");
    }

    #[test]
    fn test_export_path_resolves_inside_directory() {
        let dir = tempdir().unwrap();
        let sink = FilesystemOutputSink::new(dir.path());
        assert_eq!(sink.export_path("a.pdf").unwrap(), dir.path().join("a.pdf"));
        assert!(matches!(sink.export_path("../a.pdf"), Err(SinkError::InvalidName(_))));
    }

    #[test]
    fn test_rejects_names_without_stem() {
        let dir = tempdir().unwrap();
        let sink = FilesystemOutputSink::new(dir.path());
        assert!(matches!(sink.save(b"x", ".pdf"), Err(SinkError::InvalidName(_))));
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobcard_1_0.pdf");
        fs::write(&path, b"%PDF-1.7\n%partial").unwrap();

        let err = write_or_discard(&path, b"payload", |_| Err(io::Error::other("disk full"))).unwrap_err();
        assert!(matches!(&err, SinkError::Io { path: p, .. } if p == &path));
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_directory_surfaces_io_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"file").unwrap();
        let sink = FilesystemOutputSink::new(blocker.join("exports"));

        match sink.save(b"x", "card") {
            Err(SinkError::Io { path, .. }) => assert!(path.ends_with("exports")),
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }
}
