//! Layout document model.
//!
//! A layout is a list of pages, each holding absolutely positioned text,
//! image and table elements in page points (A4, origin top-left, Y down).

mod de;
pub mod document;
pub mod element;
pub mod error;

pub use document::{LayoutDocument, Page};
pub use element::{
    CropRect, Element, ElementCommon, FontFamily, ImageElement, MAX_TABLE_TRACKS, TableCell,
    TableElement, TableGrid, TextAlign, TextElement,
};
pub use error::LayoutError;
