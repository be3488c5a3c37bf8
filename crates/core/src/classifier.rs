//! Argument classification.
//!
//! Each event argument is written in exactly one of three ways: not at all (it holds
//! its type's default), inline as an attribute (simple scalar), or as a nested
//! parameter element. Classification is a pure function of the declared type and the
//! value.

use evmark_descriptor::NodeDescriptor;
use evmark_types::{Argument, ParamType, Value};
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The value equals its type's default and is not written.
    Omitted,
    /// A simple scalar written as a `prefix + index` attribute.
    Attribute,
    /// Written as a `prefix + index` child element.
    Nested,
}

/// Classifies a value of type `ty`.
pub fn classify(ty: &ParamType, value: &Value) -> Classification {
    classify_declared(ty, ty.is_simple(), value)
}

/// Classifies a value whose type's simplicity is already known.
///
/// Null never becomes an attribute; it is kept as a nested placeholder.
fn classify_declared(ty: &ParamType, simple: bool, value: &Value) -> Classification {
    if value.is_null() {
        Classification::Nested
    } else if ty.is_default(value) {
        Classification::Omitted
    } else if simple {
        Classification::Attribute
    } else {
        Classification::Nested
    }
}

/// An argument together with its position, effective type and classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedArgument<'a> {
    pub index: usize,
    pub ty: &'a ParamType,
    pub value: &'a Value,
    pub class: Classification,
}

/// Classifies every argument of an event.
///
/// Arguments covered by the descriptor use the declared type. Without a descriptor, or
/// past the declared arity, arguments keep their own type and are always nested so that
/// nothing is dropped.
pub fn classify_arguments<'a>(
    descriptor: Option<&'a NodeDescriptor>,
    arguments: &'a [Argument],
) -> Vec<ClassifiedArgument<'a>> {
    arguments
        .iter()
        .enumerate()
        .map(|(index, arg)| {
            let (ty, class) = match descriptor.and_then(|d| d.parameter(index).map(|ty| (d, ty))) {
                Some((d, ty)) => (ty, classify_declared(ty, d.is_simple(index), &arg.value)),
                None => (&arg.ty, Classification::Nested),
            };
            trace!("Parameter {} ({}) classified as {:?}", index, ty, class);
            ClassifiedArgument {
                index,
                ty,
                value: &arg.value,
                class,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> ParamType {
        ParamType::map(ParamType::String, ParamType::String)
    }

    #[test]
    fn test_classify_simple_values() {
        assert_eq!(classify(&ParamType::String, &json!("a")), Classification::Attribute);
        assert_eq!(classify(&ParamType::Int, &json!(4)), Classification::Attribute);
        assert_eq!(classify(&ParamType::Bool, &json!(true)), Classification::Attribute);
        assert_eq!(
            classify(&ParamType::enumeration("Format"), &json!("BOLD")),
            Classification::Attribute
        );
    }

    #[test]
    fn test_classify_defaults_are_omitted() {
        assert_eq!(classify(&ParamType::Int, &json!(0)), Classification::Omitted);
        assert_eq!(classify(&ParamType::Float, &json!(0.0)), Classification::Omitted);
        assert_eq!(classify(&ParamType::Bool, &json!(false)), Classification::Omitted);
        assert_eq!(classify(&params(), &json!({})), Classification::Omitted);
        assert_eq!(
            classify(&ParamType::list(ParamType::Int), &json!([])),
            Classification::Omitted
        );
    }

    #[test]
    fn test_classify_composites_are_nested() {
        assert_eq!(classify(&params(), &json!({"a": "b"})), Classification::Nested);
        assert_eq!(
            classify(&ParamType::record("ResourceReference"), &json!({})),
            Classification::Nested
        );
    }

    #[test]
    fn test_null_is_never_an_attribute() {
        assert_eq!(classify(&ParamType::String, &Value::Null), Classification::Nested);
        assert_eq!(classify(&ParamType::Int, &Value::Null), Classification::Nested);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let cases = [
            (ParamType::Int, json!(0)),
            (ParamType::String, json!("x")),
            (params(), json!({"k": "v"})),
        ];
        for (ty, value) in &cases {
            assert_eq!(classify(ty, value), classify(ty, value));
        }
    }

    #[test]
    fn test_arguments_with_descriptor() {
        let descriptor = NodeDescriptor::new("x", vec![ParamType::String, ParamType::Int, params()]);
        let args = vec![
            Argument::new(ParamType::String, "a"),
            Argument::new(ParamType::Int, 0),
            Argument::new(params(), json!({"k": "v"})),
        ];
        let classes: Vec<_> = classify_arguments(Some(&descriptor), &args)
            .iter()
            .map(|c| c.class)
            .collect();
        assert_eq!(
            classes,
            vec![
                Classification::Attribute,
                Classification::Omitted,
                Classification::Nested
            ]
        );
    }

    #[test]
    fn test_arguments_without_descriptor_are_nested() {
        let args = vec![
            Argument::new(ParamType::Int, 0),
            Argument::new(ParamType::String, "a"),
        ];
        let classified = classify_arguments(None, &args);
        assert!(classified.iter().all(|c| c.class == Classification::Nested));
        assert_eq!(classified[1].ty, &ParamType::String);
    }

    #[test]
    fn test_surplus_arguments_are_nested() {
        let descriptor = NodeDescriptor::new("x", vec![ParamType::Int]);
        let args = vec![
            Argument::new(ParamType::Int, 2),
            Argument::new(ParamType::Int, 0),
        ];
        let classified = classify_arguments(Some(&descriptor), &args);
        assert_eq!(classified[0].class, Classification::Attribute);
        assert_eq!(classified[1].class, Classification::Nested);
    }

    #[test]
    fn test_declared_type_wins_over_argument_type() {
        let descriptor = NodeDescriptor::new("x", vec![ParamType::Int]);
        let args = vec![Argument::new(ParamType::Any, 7)];
        let classified = classify_arguments(Some(&descriptor), &args);
        assert_eq!(classified[0].ty, &ParamType::Int);
        assert_eq!(classified[0].class, Classification::Attribute);
    }
}
