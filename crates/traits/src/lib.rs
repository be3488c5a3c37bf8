pub mod convert;
pub mod nested;
pub mod sink;

pub use convert::{ConvertError, ValueConverter};
pub use nested::{NestedError, NestedValueSerializer};
pub use sink::{Attributes, FailingSink, MarkupSink, RecordingSink, SinkCommand, SinkError};
