// src/error.rs
use evmark_core::SerializeError;
use evmark_descriptor::DescriptorError;
use evmark_traits::SinkError;
use thiserror::Error;

/// Top-level error for building serializers and running event streams.
#[derive(Error, Debug)]
pub enum EvmarkError {
    #[error("Serialization failed: {0}")]
    Serialize(#[from] SerializeError),

    #[error("Descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("Output error: {0}")]
    Sink(#[from] SinkError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Event stream line {line}: {message}")]
    Input { line: usize, message: String },

    #[error("Event {index} ('{event}') failed: {source}")]
    Event {
        index: usize,
        event: String,
        #[source]
        source: SerializeError,
    },

    #[error("Event stream ended with unclosed element(s): {}", .0.join(", "))]
    UnclosedElements(Vec<String>),
}
