//! # evmark
//!
//! Serializes listener events (`beginParagraph`, `onWord`, `endParagraph`, ...) into
//! XML, driven only by a structural descriptor of the listener interface.
//!
//! ```no_run
//! use evmark::{EventRecord, SerializerBuilder, serialize_to_string};
//! use serde_json::json;
//!
//! let events = vec![
//!     EventRecord::new("beginParagraph", vec![json!({})]),
//!     EventRecord::new("onWord", vec![json!("Hello")]),
//!     EventRecord::new("endParagraph", vec![]),
//! ];
//! let xml = serialize_to_string(SerializerBuilder::new(), &events)?;
//! assert_eq!(xml, "<paragraph><word>Hello</word></paragraph>");
//! # Ok::<(), evmark::EvmarkError>(())
//! ```

pub mod builder;
pub mod error;
pub mod stream;

pub use builder::SerializerBuilder;
pub use error::EvmarkError;
pub use stream::{
    EventRecord, ensure_closed, read_events, serialize_events, serialize_to_file, serialize_to_string,
};

pub use evmark_core::{
    Classification, ElementName, EventSerializer, SerializeError, SerializerConfig, classify,
    is_valid_element_name, parse_event_name, resolve_element_name,
};
pub use evmark_descriptor::{DescriptorDocument, DescriptorError, DescriptorRegistry, NodeDescriptor};
pub use evmark_traits::{
    Attributes, ConvertError, FailingSink, MarkupSink, NestedError, NestedValueSerializer,
    RecordingSink, SinkCommand, SinkError, ValueConverter,
};
pub use evmark_types::{Argument, EventCall, ParamType, Phase, TypeParseError, Value};
pub use evmark_xml::{ParameterSerializer, TextConverter, XmlSink};
