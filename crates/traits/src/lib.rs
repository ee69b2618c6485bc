pub mod provider;
pub mod sink;

pub use provider::{
    InMemoryLayoutProvider, InMemoryRecordProvider, LayoutProvider, ProviderError, RecordProvider,
};
pub use sink::{InMemoryOutputSink, OutputSink, SavedOutput, SinkError, validate_output_name};
