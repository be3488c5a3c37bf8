//! # evmark-core
//!
//! Generic serialization of listener events into markup.
//!
//! An event method call (`beginParagraph(params)`, `onWord("hi")`, `endParagraph()`)
//! is turned into element open/close calls, attributes and text on a `MarkupSink`,
//! guided only by the parameter types recorded in a `DescriptorRegistry`:
//!
//! - **resolver**: method name to `(phase, node kind)`, node kind to element name
//! - **classifier**: each argument is omitted, inlined as an attribute, or nested
//! - **engine**: `EventSerializer`, which orders and emits the markup
//! - **adapter**: wraps sink calls and surfaces sink failures
//! - **config**: element and attribute names used by the serializer
//! - **error**: `SerializeError`

pub mod adapter;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod resolver;

// Re-export foundation crates
pub use evmark_descriptor as descriptor;
pub use evmark_traits as traits;
pub use evmark_types as types;

pub use adapter::{SinkAdapter, render_nested};
pub use classifier::{Classification, ClassifiedArgument, classify, classify_arguments};
pub use config::SerializerConfig;
pub use engine::EventSerializer;
pub use error::SerializeError;
pub use resolver::{ElementName, is_valid_element_name, parse_event_name, resolve_element_name};
