//! ValueConverter trait for rendering parameter values as text.

use evmark_types::{ParamType, Value};
use std::fmt::Debug;
use thiserror::Error;

/// Error type for value conversion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("Cannot convert {found} to {expected}")]
    Mismatch { expected: ParamType, found: String },

    #[error("Unsupported conversion: {0}")]
    Unsupported(String),
}

impl ConvertError {
    /// Builds a `Mismatch` describing the JSON kind of the offending value.
    pub fn mismatch(expected: &ParamType, value: &Value) -> Self {
        let found = match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        };
        ConvertError::Mismatch {
            expected: expected.clone(),
            found: found.to_string(),
        }
    }
}

/// Converts a typed value to its string form.
///
/// The serializer uses the result verbatim as an attribute value or as character
/// content; escaping is left to the sink.
pub trait ValueConverter: Send + Sync + Debug {
    /// Render `value`, declared as `ty`, as text.
    fn to_text(&self, ty: &ParamType, value: &Value) -> Result<String, ConvertError>;

    /// Returns a human-readable name for this converter (for logging/debugging).
    fn name(&self) -> &'static str;
}
