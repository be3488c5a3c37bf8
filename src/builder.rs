// src/builder.rs
use crate::error::EvmarkError;
use evmark_core::{EventSerializer, SerializerConfig};
use evmark_descriptor::DescriptorRegistry;
use evmark_traits::{MarkupSink, NestedValueSerializer, ValueConverter};
use evmark_xml::{ParameterSerializer, TextConverter, XmlSink};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

/// A builder for creating an `EventSerializer`.
///
/// Without further configuration the serializer uses the built-in wiki listener
/// descriptor, `TextConverter`, `ParameterSerializer` and the default names.
pub struct SerializerBuilder {
    registry: Option<DescriptorRegistry>,
    converter: Arc<dyn ValueConverter>,
    nested: Option<Arc<dyn NestedValueSerializer>>,
    config: SerializerConfig,
    indent: Option<usize>,
}

impl Default for SerializerBuilder {
    fn default() -> Self {
        Self {
            registry: None,
            converter: Arc::new(TextConverter),
            nested: None,
            config: SerializerConfig::default(),
            indent: None,
        }
    }
}

impl SerializerBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Uses `registry` instead of the built-in wiki listener descriptor.
    pub fn with_registry(mut self, registry: DescriptorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Loads the registry from a descriptor document.
    pub fn with_descriptor_json(mut self, json: &str) -> Result<Self, EvmarkError> {
        self.registry = Some(DescriptorRegistry::from_json(json)?);
        Ok(self)
    }

    /// Loads the registry from a descriptor document on disk.
    pub fn with_descriptor_file<P: AsRef<Path>>(self, path: P) -> Result<Self, EvmarkError> {
        let source = read_file(path.as_ref(), "descriptor")?;
        self.with_descriptor_json(&source)
    }

    pub fn with_config(mut self, config: SerializerConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the configuration from a JSON file. Missing fields keep their defaults.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, EvmarkError> {
        let source = read_file(path.as_ref(), "configuration")?;
        self.config = SerializerConfig::from_json(&source)?;
        Ok(self)
    }

    /// Sets the converter for attribute values and leaf text. Unless a nested
    /// serializer is set explicitly, the default one renders scalars with it too.
    pub fn with_converter(mut self, converter: Arc<dyn ValueConverter>) -> Self {
        self.converter = converter;
        self
    }

    pub fn with_nested_serializer(mut self, nested: Arc<dyn NestedValueSerializer>) -> Self {
        self.nested = Some(nested);
        self
    }

    /// Indents XML written by `build_xml` and the `serialize_to_*` functions.
    pub fn with_indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }

    /// Consumes the builder and creates a serializer without an output target.
    pub fn build<S: MarkupSink>(self) -> Result<EventSerializer<S>, EvmarkError> {
        let registry = match self.registry {
            Some(registry) => registry,
            None => DescriptorRegistry::wiki_listener()?,
        };
        let nested: Arc<dyn NestedValueSerializer> = match self.nested {
            Some(nested) => nested,
            None => Arc::new(ParameterSerializer::with_converter(self.converter.clone())),
        };
        log::debug!(
            "Building serializer: {} node kind(s), converter {}, nested serializer {}",
            registry.len(),
            self.converter.name(),
            nested.name()
        );
        Ok(EventSerializer::new(
            Arc::new(registry),
            self.converter,
            nested,
            self.config,
        )?)
    }

    /// Consumes the builder and creates a serializer writing XML to `writer`.
    pub fn build_xml<W: Write>(self, writer: W) -> Result<EventSerializer<XmlSink<W>>, EvmarkError> {
        let sink = match self.indent {
            Some(size) => XmlSink::with_indent(writer, size),
            None => XmlSink::new(writer),
        };
        Ok(self.build()?.with_output_target(sink))
    }
}

fn read_file(path: &Path, what: &str) -> Result<String, EvmarkError> {
    fs::read_to_string(path).map_err(|e| {
        EvmarkError::Io(io::Error::new(
            e.kind(),
            format!("Failed to read {} from '{}': {}", what, path.display(), e),
        ))
    })
}
