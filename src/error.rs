// src/error.rs
use docket_render_lopdf::RenderError;
use docket_traits::{ProviderError, SinkError};
use thiserror::Error;

/// A comprehensive error type for the job-card export pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Pipeline is not configured correctly: {0}")]
    Config(String),

    #[error("Job record unavailable: {0}")]
    Record(ProviderError),

    #[error("Layout unavailable: {0}")]
    Layout(ProviderError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Saving output failed: {0}")]
    Sink(#[from] SinkError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
