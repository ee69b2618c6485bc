use crate::error::PipelineError;
use docket_render_lopdf::{ImageDecoding, RenderOptions};
use docket_types::PageSize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory used when no export path has been configured.
pub const DEFAULT_EXPORT_DIR: &str = "pdf-exports";

/// Selects how image elements are decoded during a render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    /// Decode each image as it is drawn. (Default)
    #[default]
    Sequential,
    /// Decode a page's images on the rayon pool before drawing the page.
    /// Needs the `parallel-images` feature.
    Parallel,
}

impl From<ImageMode> for ImageDecoding {
    fn from(mode: ImageMode) -> Self {
        match mode {
            ImageMode::Sequential => ImageDecoding::Sequential,
            ImageMode::Parallel => ImageDecoding::Parallel,
        }
    }
}

/// Pipeline settings. Stored settings files use the same keys as the
/// application's settings store (`exportPath`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    #[serde(alias = "exportDir")]
    pub export_path: PathBuf,
    pub pdf_version: String,
    pub producer: Option<String>,
    pub image_mode: ImageMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            export_path: PathBuf::from(DEFAULT_EXPORT_DIR),
            pdf_version: render.pdf_version,
            producer: render.producer,
            image_mode: ImageMode::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PipelineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path_ref = path.as_ref();
        let source = fs::read_to_string(path_ref).map_err(|e| {
            PipelineError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read settings from '{}': {}", path_ref.display(), e),
            ))
        })?;
        Self::from_json_str(&source)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.export_path.as_os_str().is_empty() {
            return Err(PipelineError::Config("exportPath must not be empty".to_string()));
        }
        let version_ok = matches!(
            self.pdf_version.split_once('.'),
            Some((major, minor)) if (major == "1" || major == "2")
                && !minor.is_empty()
                && minor.chars().all(|c| c.is_ascii_digit())
        );
        if !version_ok {
            return Err(PipelineError::Config(format!(
                "Unsupported PDF version '{}'",
                self.pdf_version
            )));
        }
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            pdf_version: self.pdf_version.clone(),
            producer: self.producer.clone(),
            page_size: PageSize::size(),
            image_decoding: self.image_mode.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_settings_store_keys() {
        let config = PipelineConfig::from_json_str(
            r#"{ "exportPath": "/srv/exports", "imageMode": "parallel" }"#,
        )
        .unwrap();
        assert_eq!(config.export_path, PathBuf::from("/srv/exports"));
        assert_eq!(config.image_mode, ImageMode::Parallel);
        assert_eq!(config.pdf_version, "1.7");
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = PipelineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.export_path, PathBuf::from(DEFAULT_EXPORT_DIR));
    }

    #[test]
    fn rejects_bad_versions_and_empty_paths() {
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{ "pdfVersion": "banana" }"#),
            Err(PipelineError::Config(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{ "exportPath": "" }"#),
            Err(PipelineError::Config(_))
        ));
        assert!(PipelineConfig::from_json_str(r#"{ "pdfVersion": "1.4" }"#).is_ok());
    }
}
