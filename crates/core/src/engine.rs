//! The serialization engine.
//!
//! `EventSerializer` consumes one `EventCall` at a time and writes it to the current
//! output target:
//!
//! - **begin**: open tag with the substitution attribute (if any) and every simple
//!   argument as a `prefix + index` attribute, then one child element per nested
//!   argument. The element stays open.
//! - **end**: closes the element, re-deriving its name from the node kind alone.
//! - **leaf**: as begin, then closed immediately. A single simple argument declared as
//!   such by the descriptor is written as text content instead.
//!
//! Arguments holding their type's default are not written at all.
//!
//! Attribute values, leaf text and nested values are all rendered before the first
//! write, so a conversion failure leaves the output untouched.

use crate::adapter::{SinkAdapter, render_nested};
use crate::classifier::{Classification, ClassifiedArgument, classify_arguments};
use crate::config::SerializerConfig;
use crate::error::SerializeError;
use crate::resolver::{ElementName, parse_event_name, resolve_element_name};
use evmark_descriptor::{DescriptorRegistry, NodeDescriptor};
use evmark_traits::{Attributes, MarkupSink, NestedValueSerializer, RecordingSink, ValueConverter};
use evmark_types::{Argument, EventCall, ParamType, Phase, Value};
use log::{debug, warn};
use std::sync::Arc;

/// Serializes listener events onto a swappable `MarkupSink`.
///
/// Not meant for concurrent use: every event takes `&mut self`, and a whole
/// begin/end span must land on one output target.
pub struct EventSerializer<S> {
    sink: Option<S>,
    registry: Arc<DescriptorRegistry>,
    converter: Arc<dyn ValueConverter>,
    nested: Arc<dyn NestedValueSerializer>,
    config: SerializerConfig,
    open: Vec<String>,
    failed: bool,
}

impl<S: MarkupSink> EventSerializer<S> {
    /// Creates a serializer with no output target. The configuration is validated
    /// against the registry.
    pub fn new(
        registry: Arc<DescriptorRegistry>,
        converter: Arc<dyn ValueConverter>,
        nested: Arc<dyn NestedValueSerializer>,
        config: SerializerConfig,
    ) -> Result<Self, SerializeError> {
        config.validate(&registry)?;
        Ok(Self {
            sink: None,
            registry,
            converter,
            nested,
            config,
            open: Vec::new(),
            failed: false,
        })
    }

    pub fn with_output_target(mut self, sink: S) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    pub fn registry(&self) -> &DescriptorRegistry {
        &self.registry
    }

    /// Element names opened and not yet closed, outermost first.
    pub fn open_elements(&self) -> &[String] {
        &self.open
    }

    pub fn output_target(&self) -> Option<&S> {
        self.sink.as_ref()
    }

    pub fn output_target_mut(&mut self) -> Option<&mut S> {
        self.sink.as_mut()
    }

    /// Installs a new output target and returns the previous one.
    ///
    /// Fails with `SpanInFlight` while elements are open, unless the current target has
    /// failed: then the open elements are abandoned together with it.
    pub fn set_output_target(&mut self, sink: S) -> Result<Option<S>, SerializeError> {
        self.ensure_swappable()?;
        Ok(self.sink.replace(sink))
    }

    /// Removes the output target, under the same rules as `set_output_target`.
    pub fn take_output_target(&mut self) -> Result<Option<S>, SerializeError> {
        self.ensure_swappable()?;
        Ok(self.sink.take())
    }

    fn ensure_swappable(&mut self) -> Result<(), SerializeError> {
        if !self.failed && !self.open.is_empty() {
            return Err(SerializeError::SpanInFlight(self.open.len()));
        }
        if self.failed {
            debug!(
                "Discarding failed output target with {} open element(s)",
                self.open.len()
            );
        }
        self.open.clear();
        self.failed = false;
        Ok(())
    }

    /// Builds an `EventCall` from a method name and raw values.
    ///
    /// Argument types come from the descriptor where declared and are inferred from the
    /// values otherwise.
    pub fn event_call(&self, method: &str, values: Vec<Value>) -> Result<EventCall, SerializeError> {
        let (phase, node_kind) = parse_event_name(method)?;
        if phase == Phase::End {
            if !values.is_empty() {
                debug!("Ignoring {} argument(s) of '{}'", values.len(), method);
            }
            return Ok(EventCall::end(node_kind));
        }

        let descriptor = self.registry.lookup(&node_kind);
        let arguments = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| match descriptor.and_then(|d| d.parameter(index)) {
                Some(ty) => Argument::new(ty.clone(), value),
                None => Argument::inferred(value),
            })
            .collect();
        Ok(EventCall::new(phase, node_kind, arguments))
    }

    /// Dispatches a listener method call by name.
    pub fn invoke(&mut self, method: &str, values: Vec<Value>) -> Result<(), SerializeError> {
        let call = self.event_call(method, values)?;
        self.handle(&call)
    }

    /// Serializes one event.
    pub fn handle(&mut self, call: &EventCall) -> Result<(), SerializeError> {
        let Self {
            sink,
            registry,
            converter,
            nested,
            config,
            open,
            failed,
        } = self;

        if *failed {
            return Err(SerializeError::SinkFailed);
        }
        let sink = sink.as_mut().ok_or(SerializeError::NoOutputTarget)?;
        debug!("Serializing {}", call);

        let mut emitter = Emitter {
            sink: SinkAdapter::new(sink),
            converter: &**converter,
            nested: &**nested,
            config,
            open,
        };
        let descriptor = registry.lookup(&call.node_kind);
        let result = match call.phase {
            Phase::Begin => emitter.begin(call, descriptor),
            Phase::End => emitter.end(&call.node_kind),
            Phase::Leaf => emitter.leaf(call, descriptor),
        };

        if let Err(e) = &result {
            if e.is_sink_failure() {
                *failed = true;
            }
        }
        result
    }

    /// Serializes events in order, stopping at the first error.
    pub fn handle_all<'e, I>(&mut self, calls: I) -> Result<(), SerializeError>
    where
        I: IntoIterator<Item = &'e EventCall>,
    {
        for call in calls {
            self.handle(call)?;
        }
        Ok(())
    }

    /// Flushes the output target, if any.
    pub fn flush(&mut self) -> Result<(), SerializeError> {
        if let Some(sink) = self.sink.as_mut() {
            sink.flush()?;
        }
        Ok(())
    }
}

/// Borrowed view of the serializer for the duration of one event.
struct Emitter<'a> {
    sink: SinkAdapter<'a>,
    converter: &'a dyn ValueConverter,
    nested: &'a dyn NestedValueSerializer,
    config: &'a SerializerConfig,
    open: &'a mut Vec<String>,
}

impl<'a> Emitter<'a> {
    fn begin(
        &mut self,
        call: &EventCall,
        descriptor: Option<&NodeDescriptor>,
    ) -> Result<(), SerializeError> {
        let name = self.element_name(&call.node_kind);
        let classified = classify_arguments(descriptor, &call.arguments);

        let attributes = self.start_attributes(name, &call.node_kind, &classified)?;
        let nested = self.render_nested_parameters(&call.node_kind, &classified)?;

        self.sink.open_element(name.as_str(), &attributes)?;
        self.open.push(name.as_str().to_string());
        self.write_nested_parameters(&nested)
    }

    fn end(&mut self, node_kind: &str) -> Result<(), SerializeError> {
        let name = resolve_element_name(node_kind, self.config).as_str();

        if self.config.strict_nesting {
            match self.open.last() {
                Some(top) if top == name => {}
                Some(top) => {
                    return Err(SerializeError::MismatchedEnd {
                        expected: top.clone(),
                        found: name.to_string(),
                    });
                }
                None => return Err(SerializeError::UnbalancedEnd(name.to_string())),
            }
        }

        self.sink.close_element(name)?;
        self.open.pop();
        Ok(())
    }

    fn leaf(
        &mut self,
        call: &EventCall,
        descriptor: Option<&NodeDescriptor>,
    ) -> Result<(), SerializeError> {
        let name = self.element_name(&call.node_kind);

        if let [arg] = call.arguments.as_slice() {
            let arg_simple = arg.ty.is_simple() || arg.value.is_null();
            match descriptor {
                Some(d) if d.has_single_simple_parameter() && arg_simple => {
                    return self.leaf_text(name, &call.node_kind, &d.parameters()[0], arg);
                }
                _ if arg.ty.is_simple() => warn!(
                    "'{}' has a single simple argument but its descriptor does not declare one; \
                     writing it as a parameter",
                    call.method_name()
                ),
                _ => {}
            }
        }

        let classified = classify_arguments(descriptor, &call.arguments);
        let attributes = self.start_attributes(name, &call.node_kind, &classified)?;
        let nested = self.render_nested_parameters(&call.node_kind, &classified)?;

        self.sink.open_element(name.as_str(), &attributes)?;
        self.write_nested_parameters(&nested)?;
        self.sink.close_element(name.as_str())
    }

    /// Writes `<name>text</name>` for a leaf whose only parameter is a simple scalar.
    /// Null and default values produce an empty element.
    fn leaf_text(
        &mut self,
        name: ElementName<'_>,
        node_kind: &str,
        ty: &ParamType,
        arg: &Argument,
    ) -> Result<(), SerializeError> {
        let text = if arg.value.is_null() || ty.is_default(&arg.value) {
            None
        } else {
            Some(self.converter.to_text(ty, &arg.value).map_err(|source| {
                SerializeError::Convert {
                    node_kind: node_kind.to_string(),
                    index: 0,
                    source,
                }
            })?)
        };

        let attributes = self.substitution_attributes(name);
        self.sink.open_element(name.as_str(), &attributes)?;
        if let Some(text) = text {
            self.sink.text(&text)?;
        }
        self.sink.close_element(name.as_str())
    }

    /// Resolves the element name for an opening tag.
    fn element_name<'k>(&self, node_kind: &'k str) -> ElementName<'k>
    where
        'a: 'k,
    {
        let name = resolve_element_name(node_kind, self.config);
        if name.is_substituted() {
            debug!("Node kind '{}' written as <{}>", node_kind, name.as_str());
        }
        name
    }

    fn substitution_attributes(&self, name: ElementName<'_>) -> Attributes {
        let mut attributes = Attributes::new();
        if let ElementName::Substituted { node_kind, .. } = name {
            attributes.add(self.config.block_name_attribute.as_str(), node_kind);
        }
        attributes
    }

    /// Substitution attribute first, then simple arguments in index order. All values
    /// are converted before anything is written.
    fn start_attributes(
        &self,
        name: ElementName<'_>,
        node_kind: &str,
        classified: &[ClassifiedArgument<'_>],
    ) -> Result<Attributes, SerializeError> {
        let mut attributes = self.substitution_attributes(name);
        for arg in classified
            .iter()
            .filter(|a| a.class == Classification::Attribute)
        {
            let value = self
                .converter
                .to_text(arg.ty, arg.value)
                .map_err(|source| SerializeError::Convert {
                    node_kind: node_kind.to_string(),
                    index: arg.index,
                    source,
                })?;
            attributes.add(self.config.parameter_name(arg.index), value);
        }
        Ok(attributes)
    }

    /// Renders every nested argument, in index order, without touching the sink.
    /// Null values render as an empty child.
    fn render_nested_parameters(
        &self,
        node_kind: &str,
        classified: &[ClassifiedArgument<'_>],
    ) -> Result<Vec<NestedParameter>, SerializeError> {
        classified
            .iter()
            .filter(|a| a.class == Classification::Nested)
            .map(|arg| -> Result<NestedParameter, SerializeError> {
                let content = if arg.value.is_null() {
                    None
                } else {
                    Some(render_nested(
                        self.nested,
                        arg.ty,
                        arg.value,
                        node_kind,
                        arg.index,
                    )?)
                };
                Ok(NestedParameter {
                    element: self.config.parameter_name(arg.index),
                    content,
                })
            })
            .collect()
    }

    /// One `prefix + index` child per rendered argument.
    fn write_nested_parameters(&mut self, nested: &[NestedParameter]) -> Result<(), SerializeError> {
        for parameter in nested {
            self.sink.open_element(&parameter.element, &Attributes::new())?;
            if let Some(content) = &parameter.content {
                self.sink.replay(content)?;
            }
            self.sink.close_element(&parameter.element)?;
        }
        Ok(())
    }
}

/// A nested argument rendered ahead of its parent's open tag.
struct NestedParameter {
    element: String,
    content: Option<RecordingSink>,
}
