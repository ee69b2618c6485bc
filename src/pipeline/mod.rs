//! Job-card export pipeline orchestration.
//!
//! - [`PipelineBuilder`]: Fluent builder wiring providers, sink and settings
//! - [`JobCardPipeline`]: Loads a record and a layout, renders, and saves
//! - [`PipelineConfig`]: Settings, loadable from the settings JSON file
//!
//! # Example
//!
//! ```ignore
//! use docket::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_record_dir("data/jobcards")
//!     .with_layout_dir("data/layouts")
//!     .with_export_dir("exports")
//!     .build()?;
//!
//! let outcome = pipeline.export(&"42".into(), &"standard".into())?;
//! ```

pub mod builder;
pub mod config;
pub mod orchestrator;

pub use builder::PipelineBuilder;
pub use config::{DEFAULT_EXPORT_DIR, ImageMode, PipelineConfig};
pub use orchestrator::{ExportOutcome, JobCardPipeline};
