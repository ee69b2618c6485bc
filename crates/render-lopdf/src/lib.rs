//! Job-card page renderer and PDF assembler using lopdf.
//!
//! Layout pages are drawn in order onto content streams that are written as
//! soon as each page is finished. Fonts are the built-in Type1 faces, resolved
//! once per document through a [`FontCache`].

mod assembler;
mod error;
pub mod fonts;
mod images;
mod metrics;
mod page;
mod report;
mod writer;

pub use assembler::{DocumentAssembler, ImageDecoding, RenderOptions};
pub use error::{ElementError, RenderError};
pub use fonts::{BuiltinFont, FontCache, FontHandle, FontKey};
pub use images::{ImageMime, PreparedImage, parse_data_uri};
pub use page::{PageContext, to_win_ansi};
pub use report::{RenderReport, SkippedElement};
pub use writer::StreamingPdfWriter;
