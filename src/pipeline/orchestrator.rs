use super::config::PipelineConfig;
use crate::error::PipelineError;
use docket_document::LayoutDocument;
use docket_resource::FilesystemOutputSink;
use docket_render_lopdf::{DocumentAssembler, RenderReport};
use docket_template::RecordData;
use docket_traits::{LayoutProvider, OutputSink, RecordProvider, SavedOutput};
use docket_types::{LayoutId, RecordId};
use log::{debug, info, warn};
use std::io::{Seek, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// The result of exporting one job card.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub saved: SavedOutput,
    pub report: RenderReport,
}

/// Fetches a job record and a layout, renders them, and hands the PDF to the
/// configured output sink.
#[derive(Debug)]
pub struct JobCardPipeline {
    config: PipelineConfig,
    assembler: DocumentAssembler,
    records: Arc<dyn RecordProvider>,
    layouts: Arc<dyn LayoutProvider>,
    sink: Arc<dyn OutputSink>,
}

impl JobCardPipeline {
    pub(crate) fn new(
        config: PipelineConfig,
        records: Arc<dyn RecordProvider>,
        layouts: Arc<dyn LayoutProvider>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        let assembler = DocumentAssembler::new(config.render_options());
        Self { config, assembler, records, layouts, sink }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Where a file called `name` would be placed in the export directory.
    pub fn export_path(&self, name: &str) -> Result<PathBuf, PipelineError> {
        Ok(FilesystemOutputSink::new(&self.config.export_path).export_path(name)?)
    }

    fn load(&self, record_id: &RecordId, layout_id: &LayoutId) -> Result<(RecordData, LayoutDocument), PipelineError> {
        debug!("Loading record {} via {}", record_id, self.records.name());
        let record = self.records.record(record_id).map_err(PipelineError::Record)?;
        debug!("Loading layout {} via {}", layout_id, self.layouts.name());
        let layout = self.layouts.layout(layout_id).map_err(PipelineError::Layout)?;
        Ok((record, layout))
    }

    /// Renders a record with a layout and returns the PDF bytes.
    pub fn render(
        &self,
        record_id: &RecordId,
        layout_id: &LayoutId,
    ) -> Result<(Vec<u8>, RenderReport), PipelineError> {
        let (record, layout) = self.load(record_id, layout_id)?;
        Ok(self.assembler.render(&layout, &record)?)
    }

    /// Renders a record with a layout straight into `writer`.
    pub fn render_to_writer<W: Write + Seek>(
        &self,
        record_id: &RecordId,
        layout_id: &LayoutId,
        writer: W,
    ) -> Result<(W, RenderReport), PipelineError> {
        let (record, layout) = self.load(record_id, layout_id)?;
        Ok(self.assembler.render_to_writer(&layout, &record, writer)?)
    }

    /// Renders and saves the PDF as `jobcard_<record id>_<timestamp>.pdf`.
    pub fn export(&self, record_id: &RecordId, layout_id: &LayoutId) -> Result<ExportOutcome, PipelineError> {
        let start = Instant::now();
        let (bytes, report) = self.render(record_id, layout_id)?;
        if report.is_degraded() {
            warn!(
                "Job card {} rendered with {} element(s) skipped",
                record_id,
                report.skipped.len()
            );
        }
        let saved = self.sink.save(&bytes, &format!("jobcard_{}", record_id))?;
        info!(
            "Exported job card {} with layout {} as '{}' in {:.2?}",
            record_id,
            layout_id,
            saved.name,
            start.elapsed()
        );
        Ok(ExportOutcome { saved, report })
    }

    /// Renders an already-loaded layout and record without touching the
    /// providers or the sink.
    pub fn render_document(
        &self,
        layout: &LayoutDocument,
        record: &RecordData,
    ) -> Result<(Vec<u8>, RenderReport), PipelineError> {
        Ok(self.assembler.render(layout, record)?)
    }
}
