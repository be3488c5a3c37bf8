//! Error types for event serialization.

use evmark_traits::{ConvertError, SinkError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SerializeError {
    /// The method name has no `begin`, `end` or `on` prefix.
    #[error("Unsupported event method '{0}'")]
    UnsupportedEvent(String),

    /// The sink rejected a write. Output already written is not rolled back.
    #[error("Failed to write markup: {0}")]
    SinkWrite(#[from] SinkError),

    #[error("Cannot convert parameter {index} of '{node_kind}': {source}")]
    Convert {
        node_kind: String,
        index: usize,
        #[source]
        source: ConvertError,
    },

    #[error("No output target is set")]
    NoOutputTarget,

    #[error("Output target failed on an earlier write; install a new output target")]
    SinkFailed,

    #[error("Cannot swap output target while {0} element(s) are open")]
    SpanInFlight(usize),

    #[error("End event closes <{found}> but <{expected}> is open")]
    MismatchedEnd { expected: String, found: String },

    #[error("End event for <{0}> with no open element")]
    UnbalancedEnd(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SerializeError {
    /// True for failures that leave the output target unusable.
    pub fn is_sink_failure(&self) -> bool {
        matches!(self, SerializeError::SinkWrite(_))
    }
}
