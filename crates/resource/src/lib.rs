//! Filesystem collaborators for the docket pipeline.
//!
//! ## Available Implementations
//!
//! - [`JsonDirRecordProvider`]: job records read from `<dir>/<id>.json`
//! - [`JsonDirLayoutProvider`]: layouts read from `<dir>/<id>.json`
//! - [`FilesystemOutputSink`]: timestamped PDF files in an export directory
//!
//! The in-memory implementations live in `docket-traits` and are re-exported
//! here for convenience.

mod json_dir;
mod output;

pub use json_dir::{JsonDirLayoutProvider, JsonDirRecordProvider};
pub use output::FilesystemOutputSink;

pub use docket_traits::{InMemoryLayoutProvider, InMemoryOutputSink, InMemoryRecordProvider};
