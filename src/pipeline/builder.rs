// src/pipeline/builder.rs
use super::config::{ImageMode, PipelineConfig};
use super::orchestrator::JobCardPipeline;
use crate::error::PipelineError;
use docket_resource::{FilesystemOutputSink, JsonDirLayoutProvider, JsonDirRecordProvider};
use docket_traits::{LayoutProvider, OutputSink, RecordProvider};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A builder for creating a `JobCardPipeline`.
#[derive(Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
    records: Option<Arc<dyn RecordProvider>>,
    layouts: Option<Arc<dyn LayoutProvider>>,
    sink: Option<Arc<dyn OutputSink>>,
}

impl PipelineBuilder {
    /// Creates a new `PipelineBuilder` with default settings.
    pub fn new() -> Self {
        Default::default()
    }

    /// Replaces every setting with `config`.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads settings from a JSON settings file.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, PipelineError> {
        self.config = PipelineConfig::from_json_file(path)?;
        Ok(self)
    }

    /// Directory the default filesystem sink writes into.
    pub fn with_export_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.export_path = dir.into();
        self
    }

    pub fn with_pdf_version(mut self, version: impl Into<String>) -> Self {
        self.config.pdf_version = version.into();
        self
    }

    /// Sets the document `Producer`; `None` leaves it out.
    pub fn with_producer(mut self, producer: Option<String>) -> Self {
        self.config.producer = producer;
        self
    }

    pub fn with_image_mode(mut self, mode: ImageMode) -> Self {
        self.config.image_mode = mode;
        self
    }

    pub fn with_record_provider<P: RecordProvider + 'static>(mut self, provider: P) -> Self {
        self.records = Some(Arc::new(provider));
        self
    }

    pub fn with_layout_provider<P: LayoutProvider + 'static>(mut self, provider: P) -> Self {
        self.layouts = Some(Arc::new(provider));
        self
    }

    /// Reads records from `<dir>/<id>.json`.
    pub fn with_record_dir<P: AsRef<Path>>(self, dir: P) -> Self {
        self.with_record_provider(JsonDirRecordProvider::new(dir))
    }

    /// Reads layouts from `<dir>/<id>.json`.
    pub fn with_layout_dir<P: AsRef<Path>>(self, dir: P) -> Self {
        self.with_layout_provider(JsonDirLayoutProvider::new(dir))
    }

    /// Overrides the default filesystem sink.
    pub fn with_output_sink<S: OutputSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Consumes the builder and creates the `JobCardPipeline`.
    pub fn build(self) -> Result<JobCardPipeline, PipelineError> {
        self.config.validate()?;
        let records = self.records.ok_or_else(|| {
            PipelineError::Config(
                "No record provider has been configured. Use `with_record_provider` or `with_record_dir`."
                    .to_string(),
            )
        })?;
        let layouts = self.layouts.ok_or_else(|| {
            PipelineError::Config(
                "No layout provider has been configured. Use `with_layout_provider` or `with_layout_dir`."
                    .to_string(),
            )
        })?;
        let sink = match self.sink {
            Some(sink) => sink,
            None => Arc::new(FilesystemOutputSink::new(&self.config.export_path)),
        };
        Ok(JobCardPipeline::new(self.config, records, layouts, sink))
    }
}
