//! Foundation types for evmark.
//!
//! - **`ParamType`**: the closed set of semantic parameter types an event method can declare
//! - **`EventCall`**: one event invocation as a `(phase, node kind, arguments)` value
//! - **`Argument`**: a positional argument paired with its semantic type

pub mod event;
pub mod param_type;

pub use event::{Argument, EventCall, Phase};
pub use param_type::{ParamType, TypeParseError};

/// Argument values are dynamic JSON values.
pub use serde_json::Value;
