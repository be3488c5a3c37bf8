//! Event name resolution.
//!
//! Method names map to `(phase, node kind)`; node kinds map to element names. The
//! element-name mapping depends only on the node kind and the configuration, so the
//! `begin` and `end` events of a node always agree.

use crate::config::SerializerConfig;
use crate::error::SerializeError;
use evmark_types::Phase;

/// Splits a listener method name into its phase and node kind.
pub fn parse_event_name(method: &str) -> Result<(Phase, String), SerializeError> {
    Phase::split_method_name(method)
        .ok_or_else(|| SerializeError::UnsupportedEvent(method.to_string()))
}

/// Matches `[A-Za-z][A-Za-z0-9:_.-]*`.
pub fn is_valid_element_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b':' | b'_' | b'.' | b'-'))
}

/// The element name chosen for a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementName<'a> {
    /// The node kind is used as the element name.
    Direct(&'a str),
    /// The generic block element stands in for a node kind that cannot be used.
    Substituted { element: &'a str, node_kind: &'a str },
}

impl<'a> ElementName<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            ElementName::Direct(name) => name,
            ElementName::Substituted { element, .. } => element,
        }
    }

    pub fn is_substituted(&self) -> bool {
        matches!(self, ElementName::Substituted { .. })
    }
}

/// Resolves the element name for `node_kind`.
///
/// A node kind that is not a valid element name, or that equals the parameter prefix,
/// is replaced by the generic block element name.
pub fn resolve_element_name<'a>(node_kind: &'a str, config: &'a SerializerConfig) -> ElementName<'a> {
    if is_valid_element_name(node_kind) && node_kind != config.parameter_element_prefix {
        ElementName::Direct(node_kind)
    } else {
        ElementName::Substituted {
            element: &config.generic_block_element_name,
            node_kind,
        }
    }
}
