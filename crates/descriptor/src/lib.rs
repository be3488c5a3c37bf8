//! Structural descriptors for listener interfaces.
//!
//! A listener interface is a family of `begin<Kind>` / `end<Kind>` / `on<Kind>`
//! methods. The `DescriptorRegistry` records, for every node kind, the ordered
//! parameter types its `begin` or `on` method declares. `end` methods carry no
//! parameters and contribute nothing.
//!
//! ## Sources
//!
//! - `DescriptorRegistry::from_methods`: `(method name, parameter types)` pairs
//! - `DescriptorRegistry::from_json`: a descriptor document
//! - `DescriptorRegistry::wiki_listener`: the built-in document rendering listener
//!
//! ## Descriptor documents
//!
//! ```json
//! {
//!   "events": {
//!     "beginParagraph": ["map<string,string>"],
//!     "onWord": ["string"],
//!     "onNewLine": []
//!   }
//! }
//! ```

mod listener;

use evmark_types::{EventCall, ParamType, Phase, TypeParseError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while building a registry.
#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("'{0}' is not a begin/on listener method")]
    InvalidMethod(String),

    #[error("Invalid parameter type in '{method}': {source}")]
    InvalidType {
        method: String,
        #[source]
        source: TypeParseError,
    },

    #[error("Conflicting declarations for node kind '{0}'")]
    Conflict(String),

    #[error("Descriptor document error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parameter metadata for one node kind.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDescriptor {
    node_kind: String,
    parameters: Vec<ParamType>,
    simple: Vec<bool>,
}

impl NodeDescriptor {
    pub fn new(node_kind: impl Into<String>, parameters: Vec<ParamType>) -> Self {
        let simple = parameters.iter().map(ParamType::is_simple).collect();
        Self {
            node_kind: node_kind.into(),
            parameters,
            simple,
        }
    }

    pub fn node_kind(&self) -> &str {
        &self.node_kind
    }

    pub fn parameters(&self) -> &[ParamType] {
        &self.parameters
    }

    pub fn parameter(&self, index: usize) -> Option<&ParamType> {
        self.parameters.get(index)
    }

    /// Whether the parameter at `index` is a simple scalar. `false` when out of range.
    pub fn is_simple(&self, index: usize) -> bool {
        self.simple.get(index).copied().unwrap_or(false)
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// True when the node declares exactly one parameter and it is a simple scalar.
    pub fn has_single_simple_parameter(&self) -> bool {
        self.simple.as_slice() == [true]
    }
}

/// The serialized form of a registry.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DescriptorDocument {
    /// Listener method name to ordered parameter types.
    pub events: BTreeMap<String, Vec<ParamType>>,
}

/// Read-only lookup from node kind to `NodeDescriptor`. Keys are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct DescriptorRegistry {
    elements: HashMap<String, Arc<NodeDescriptor>>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from listener methods and their declared parameter types.
    ///
    /// `end` methods are skipped. A `begin` and an `on` method for the same kind must
    /// agree on their parameters.
    pub fn from_methods<I, S>(methods: I) -> Result<Self, DescriptorError>
    where
        I: IntoIterator<Item = (S, Vec<ParamType>)>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for (method, parameters) in methods {
            registry.add_method(method.as_ref(), parameters)?;
        }
        Ok(registry)
    }

    /// Builds a registry from method names and textual type names.
    pub fn from_signatures<'a, I>(signatures: I) -> Result<Self, DescriptorError>
    where
        I: IntoIterator<Item = (&'a str, &'a [&'a str])>,
    {
        let mut registry = Self::new();
        for (method, types) in signatures {
            let parameters = types
                .iter()
                .map(|t| t.parse::<ParamType>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| DescriptorError::InvalidType {
                    method: method.to_string(),
                    source,
                })?;
            registry.add_method(method, parameters)?;
        }
        Ok(registry)
    }

    /// Parses a descriptor document.
    pub fn from_json(json: &str) -> Result<Self, DescriptorError> {
        let document: DescriptorDocument = serde_json::from_str(json)?;
        Self::from_methods(document.events)
    }

    /// The built-in descriptor of the document rendering listener.
    pub fn wiki_listener() -> Result<Self, DescriptorError> {
        listener::wiki_listener()
    }

    /// Registers one listener method.
    pub fn add_method(
        &mut self,
        method: &str,
        parameters: Vec<ParamType>,
    ) -> Result<(), DescriptorError> {
        match Phase::split_method_name(method) {
            Some((Phase::End, _)) => {
                debug!("Skipping end method '{}' in descriptor", method);
                Ok(())
            }
            Some((_, kind)) => self.insert(NodeDescriptor::new(kind, parameters)),
            None => Err(DescriptorError::InvalidMethod(method.to_string())),
        }
    }

    /// Registers a descriptor under its lower-cased node kind.
    pub fn insert(&mut self, descriptor: NodeDescriptor) -> Result<(), DescriptorError> {
        let key = descriptor.node_kind.to_lowercase();
        if let Some(existing) = self.elements.get(&key) {
            if existing.parameters != descriptor.parameters {
                return Err(DescriptorError::Conflict(descriptor.node_kind));
            }
            return Ok(());
        }
        self.elements.insert(key, Arc::new(descriptor));
        Ok(())
    }

    /// Case-insensitive lookup of a node kind.
    pub fn lookup(&self, node_kind: &str) -> Option<&NodeDescriptor> {
        self.elements
            .get(&node_kind.to_lowercase())
            .map(|descriptor| &**descriptor)
    }

    pub fn contains(&self, node_kind: &str) -> bool {
        self.lookup(node_kind).is_some()
    }

    /// Node kinds as originally declared, in no particular order.
    pub fn node_kinds(&self) -> impl Iterator<Item = &str> {
        self.elements.values().map(|d| d.node_kind())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Exports the registry as a descriptor document. Kinds are written as `begin`
    /// methods; callers that need `on` names should keep their source document.
    pub fn to_document(&self) -> DescriptorDocument {
        let events = self
            .elements
            .values()
            .map(|d| {
                let method = EventCall::begin(d.node_kind(), Vec::new()).method_name();
                (method, d.parameters.clone())
            })
            .collect();
        DescriptorDocument { events }
    }
}
