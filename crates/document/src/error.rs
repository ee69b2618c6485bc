use thiserror::Error;

/// Document-level failures. Any of these aborts the render.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("layout document is missing")]
    Missing,
    #[error("layout document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("layout document is malformed: {0}")]
    Malformed(String),
    #[error("document has no pages")]
    NoPages,
}
