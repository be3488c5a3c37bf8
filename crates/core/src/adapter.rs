//! Translates engine emission calls into sink primitives.
//!
//! Every sink failure becomes `SerializeError::SinkWrite`. Nothing is retried.
//! Nested values are rendered off-sink first, so a nested conversion failure never
//! reaches the output target.

use crate::error::SerializeError;
use evmark_traits::{Attributes, MarkupSink, NestedError, NestedValueSerializer, RecordingSink};
use evmark_types::{ParamType, Value};

pub struct SinkAdapter<'a> {
    sink: &'a mut dyn MarkupSink,
}

impl<'a> SinkAdapter<'a> {
    pub fn new(sink: &'a mut dyn MarkupSink) -> Self {
        Self { sink }
    }

    pub fn open_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), SerializeError> {
        Ok(self.sink.start_element(name, attributes)?)
    }

    pub fn close_element(&mut self, name: &str) -> Result<(), SerializeError> {
        Ok(self.sink.end_element(name)?)
    }

    pub fn text(&mut self, value: &str) -> Result<(), SerializeError> {
        Ok(self.sink.characters(value)?)
    }

    /// Writes markup previously captured by `render_nested`.
    pub fn replay(&mut self, rendered: &RecordingSink) -> Result<(), SerializeError> {
        Ok(rendered.replay(&mut *self.sink)?)
    }
}

/// Runs `serializer` for one composite value against an in-memory sink.
///
/// `node_kind` and `index` identify the parameter in conversion errors.
pub fn render_nested(
    serializer: &dyn NestedValueSerializer,
    ty: &ParamType,
    value: &Value,
    node_kind: &str,
    index: usize,
) -> Result<RecordingSink, SerializeError> {
    let mut rendered = RecordingSink::new();
    serializer
        .serialize(ty, value, &mut rendered)
        .map_err(|e| match e {
            NestedError::Sink(source) => SerializeError::SinkWrite(source),
            NestedError::Convert(source) => SerializeError::Convert {
                node_kind: node_kind.to_string(),
                index,
                source,
            },
        })?;
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evmark_traits::{ConvertError, FailingSink, SinkCommand, SinkError};

    #[derive(Debug)]
    struct TextOnly;

    impl NestedValueSerializer for TextOnly {
        fn serialize(
            &self,
            _ty: &ParamType,
            value: &Value,
            sink: &mut dyn MarkupSink,
        ) -> Result<(), NestedError> {
            sink.characters(&value.to_string())?;
            Ok(())
        }

        fn name(&self) -> &'static str {
            "TextOnly"
        }
    }

    #[derive(Debug)]
    struct Rejecting;

    impl NestedValueSerializer for Rejecting {
        fn serialize(
            &self,
            ty: &ParamType,
            value: &Value,
            sink: &mut dyn MarkupSink,
        ) -> Result<(), NestedError> {
            sink.start_element("item", &Attributes::new())?;
            Err(ConvertError::mismatch(ty, value).into())
        }

        fn name(&self) -> &'static str {
            "Rejecting"
        }
    }

    #[test]
    fn test_forwards_calls() {
        let rendered = render_nested(&TextOnly, &ParamType::Any, &Value::from(1), "a", 0).unwrap();
        let mut sink = RecordingSink::new();
        {
            let mut adapter = SinkAdapter::new(&mut sink);
            adapter.open_element("a", &Attributes::new()).unwrap();
            adapter.text("x").unwrap();
            adapter.replay(&rendered).unwrap();
            adapter.close_element("a").unwrap();
        }
        assert_eq!(
            sink.commands(),
            &[
                SinkCommand::Start("a".into(), Attributes::new()),
                SinkCommand::Text("x".into()),
                SinkCommand::Text("1".into()),
                SinkCommand::End("a".into()),
            ]
        );
    }

    #[test]
    fn test_render_nested_failure_is_tagged() {
        let err = render_nested(&Rejecting, &ParamType::Int, &Value::from("x"), "box", 2)
            .unwrap_err();
        assert!(matches!(
            err,
            SerializeError::Convert { ref node_kind, index: 2, .. } if node_kind == "box"
        ));
    }

    #[test]
    fn test_wraps_sink_failures() {
        let mut sink = FailingSink::new(RecordingSink::new(), 1);
        let mut adapter = SinkAdapter::new(&mut sink);
        let err = adapter.text("x").unwrap_err();
        assert!(matches!(err, SerializeError::SinkWrite(SinkError::Io(_))));

        let rendered = render_nested(&TextOnly, &ParamType::Any, &Value::Null, "a", 0).unwrap();
        let err = adapter.replay(&rendered).unwrap_err();
        assert!(err.is_sink_failure());
    }
}
