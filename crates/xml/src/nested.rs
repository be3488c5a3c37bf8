//! Structured output for composite parameter values.
//!
//! ```xml
//! <p0><item>1</item><item>2</item></p0>
//! <p1><entry><key>style</key><value>color:red</value></entry></p1>
//! <p2><reference>logo.png</reference><field name="2x">true</field></p2>
//! ```

use crate::convert::TextConverter;
use evmark_core::is_valid_element_name;
use evmark_traits::{
    Attributes, ConvertError, MarkupSink, NestedError, NestedValueSerializer, ValueConverter,
};
use evmark_types::{ParamType, Value};
use log::trace;
use std::sync::Arc;

/// The default `NestedValueSerializer`.
///
/// Lists become `<item>` children, maps become `<entry>` children holding a `<key>` and
/// a `<value>`, and record fields become children named after the field. Scalars are
/// written as text through the configured converter. Null writes nothing.
#[derive(Debug, Clone)]
pub struct ParameterSerializer {
    converter: Arc<dyn ValueConverter>,
}

impl Default for ParameterSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterSerializer {
    pub fn new() -> Self {
        Self {
            converter: Arc::new(TextConverter),
        }
    }

    pub fn with_converter(converter: Arc<dyn ValueConverter>) -> Self {
        Self { converter }
    }

    fn write(
        &self,
        ty: &ParamType,
        value: &Value,
        sink: &mut dyn MarkupSink,
    ) -> Result<(), NestedError> {
        if value.is_null() {
            return Ok(());
        }
        match ty {
            ParamType::Any => self.write(&ParamType::infer(value), value, sink),
            ParamType::List(item_ty) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| ConvertError::mismatch(ty, value))?;
                for item in items {
                    wrap(sink, "item", &Attributes::new(), |sink| {
                        self.write(item_ty, item, sink)
                    })?;
                }
                Ok(())
            }
            ParamType::Map(_, value_ty) => {
                let entries = value
                    .as_object()
                    .ok_or_else(|| ConvertError::mismatch(ty, value))?;
                for (key, entry_value) in entries {
                    wrap(sink, "entry", &Attributes::new(), |sink| {
                        wrap(sink, "key", &Attributes::new(), |sink| {
                            sink.characters(key)?;
                            Ok(())
                        })?;
                        wrap(sink, "value", &Attributes::new(), |sink| {
                            self.write(value_ty, entry_value, sink)
                        })
                    })?;
                }
                Ok(())
            }
            ParamType::Record(name) => {
                let fields = value
                    .as_object()
                    .ok_or_else(|| ConvertError::mismatch(ty, value))?;
                trace!("Writing {} field(s) of record {}", fields.len(), name);
                for (field, field_value) in fields {
                    let write_field = |sink: &mut dyn MarkupSink| {
                        self.write(&ParamType::Any, field_value, sink)
                    };
                    if is_valid_element_name(field) {
                        wrap(sink, field, &Attributes::new(), write_field)?;
                    } else {
                        let attributes = Attributes::from_iter([("name", field.as_str())]);
                        wrap(sink, "field", &attributes, write_field)?;
                    }
                }
                Ok(())
            }
            _ => {
                let text = self.converter.to_text(ty, value)?;
                sink.characters(&text)?;
                Ok(())
            }
        }
    }
}

/// Writes `<name>`, then `content`, then `</name>`.
fn wrap<F>(
    sink: &mut dyn MarkupSink,
    name: &str,
    attributes: &Attributes,
    content: F,
) -> Result<(), NestedError>
where
    F: FnOnce(&mut dyn MarkupSink) -> Result<(), NestedError>,
{
    sink.start_element(name, attributes)?;
    content(&mut *sink)?;
    sink.end_element(name)?;
    Ok(())
}

impl NestedValueSerializer for ParameterSerializer {
    fn serialize(
        &self,
        ty: &ParamType,
        value: &Value,
        sink: &mut dyn MarkupSink,
    ) -> Result<(), NestedError> {
        self.write(ty, value, sink)
    }

    fn name(&self) -> &'static str {
        "ParameterSerializer"
    }
}
