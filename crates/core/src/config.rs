//! Serializer configuration.

use crate::error::SerializeError;
use crate::resolver::is_valid_element_name;
use evmark_descriptor::DescriptorRegistry;
use serde::{Deserialize, Serialize};

/// Names used by the serializer for synthetic markup.
///
/// All fields have stable defaults, so a partial JSON document is enough:
///
/// ```json
/// { "genericBlockElementName": "node", "strictNesting": false }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SerializerConfig {
    /// Element written in place of a node kind that is not a valid element name.
    pub generic_block_element_name: String,
    /// Attribute of the generic block element that carries the real node kind.
    pub block_name_attribute: String,
    /// Prefix of synthetic parameter names; parameter `i` is written as `prefix + i`.
    pub parameter_element_prefix: String,
    /// Reject end events that do not close the innermost open element.
    pub strict_nesting: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            generic_block_element_name: "block".to_string(),
            block_name_attribute: "name".to_string(),
            parameter_element_prefix: "p".to_string(),
            strict_nesting: true,
        }
    }
}

impl SerializerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_generic_block_element_name(mut self, name: impl Into<String>) -> Self {
        self.generic_block_element_name = name.into();
        self
    }

    pub fn with_block_name_attribute(mut self, name: impl Into<String>) -> Self {
        self.block_name_attribute = name.into();
        self
    }

    pub fn with_parameter_element_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.parameter_element_prefix = prefix.into();
        self
    }

    pub fn with_strict_nesting(mut self, strict: bool) -> Self {
        self.strict_nesting = strict;
        self
    }

    /// The synthetic attribute or element name for the parameter at `index`.
    pub fn parameter_name(&self, index: usize) -> String {
        format!("{}{}", self.parameter_element_prefix, index)
    }

    /// Checks the names against the identifier grammar and against the node kinds the
    /// registry declares.
    pub fn validate(&self, registry: &DescriptorRegistry) -> Result<(), SerializeError> {
        for (label, value) in [
            ("generic block element name", &self.generic_block_element_name),
            ("block name attribute", &self.block_name_attribute),
            ("parameter element prefix", &self.parameter_element_prefix),
        ] {
            if !is_valid_element_name(value) {
                return Err(SerializeError::Config(format!(
                    "{} '{}' is not a valid element name",
                    label, value
                )));
            }
        }

        for (label, value) in [
            ("generic block element name", &self.generic_block_element_name),
            ("parameter element prefix", &self.parameter_element_prefix),
        ] {
            if registry.contains(value) {
                return Err(SerializeError::Config(format!(
                    "{} '{}' collides with a declared node kind",
                    label, value
                )));
            }
        }

        if self.is_parameter_name(&self.block_name_attribute) {
            return Err(SerializeError::Config(format!(
                "block name attribute '{}' collides with parameter names '{}<index>'",
                self.block_name_attribute, self.parameter_element_prefix
            )));
        }

        Ok(())
    }

    /// True if `name` has the shape `prefix + digits`.
    fn is_parameter_name(&self, name: &str) -> bool {
        name.strip_prefix(self.parameter_element_prefix.as_str())
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    }
}
