//! XML implementations of the evmark collaborator traits.
//!
//! - [`XmlSink`] writes sink calls through `quick_xml::Writer`.
//! - [`TextConverter`] renders scalar values as attribute or text content.
//! - [`ParameterSerializer`] writes composite values as child elements.

pub mod convert;
pub mod nested;
pub mod sink;

pub use convert::TextConverter;
pub use nested::ParameterSerializer;
pub use sink::XmlSink;
