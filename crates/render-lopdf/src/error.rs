use docket_document::LayoutError;
use thiserror::Error;

/// Failures that abort a whole render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("Other rendering error: {0}")]
    Other(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}

/// Failures confined to one element. The page renderer logs these, records
/// them in the report and moves on to the next element.
#[derive(Error, Debug)]
pub enum ElementError {
    #[error("unsupported image type '{0}'")]
    UnsupportedMime(String),
    #[error("image data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
    #[error("crop rectangle is empty after clamping")]
    EmptyCrop,
    #[error("malformed data URI: {0}")]
    MalformedDataUri(String),
}
