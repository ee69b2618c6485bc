//! docket: renders job-card layouts to PDF.
//!
//! A layout is a list of pages holding absolutely positioned text, image and
//! table elements. Rendering fills `{{field}}` placeholders from a job record
//! and writes one PDF page per layout page.

pub mod error;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{
    ExportOutcome, ImageMode, JobCardPipeline, PipelineBuilder, PipelineConfig,
};

pub use docket_document::{Element, LayoutDocument, LayoutError, Page};
pub use docket_render_lopdf::{
    DocumentAssembler, ImageDecoding, RenderError, RenderOptions, RenderReport, SkippedElement,
};
pub use docket_template::RecordData;
pub use docket_traits::{
    InMemoryLayoutProvider, InMemoryOutputSink, InMemoryRecordProvider, LayoutProvider,
    OutputSink, ProviderError, RecordProvider, SavedOutput, SinkError,
};
pub use docket_types::{LayoutId, RecordId};
