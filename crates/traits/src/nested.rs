//! NestedValueSerializer trait for writing composite parameter values as markup.

use crate::convert::ConvertError;
use crate::sink::{MarkupSink, SinkError};
use evmark_types::{ParamType, Value};
use std::fmt::Debug;
use thiserror::Error;

/// Error type for nested value serialization.
#[derive(Error, Debug)]
pub enum NestedError {
    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Writes a composite value as the content of an already opened parameter element.
///
/// Implementations may emit any balanced sequence of sink calls, including text and
/// further nested elements.
pub trait NestedValueSerializer: Send + Sync + Debug {
    fn serialize(
        &self,
        ty: &ParamType,
        value: &Value,
        sink: &mut dyn MarkupSink,
    ) -> Result<(), NestedError>;

    /// Returns a human-readable name for this serializer (for logging/debugging).
    fn name(&self) -> &'static str;
}
