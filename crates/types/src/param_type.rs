//! Semantic parameter types.
//!
//! Every event parameter is described by a `ParamType`. The set is closed: a type is
//! either a simple scalar, which can be written inline as an attribute or as text, or a
//! composite that needs nested markup.
//!
//! Types have a compact textual form used in descriptor documents:
//!
//! | Text                | Type                    |
//! |---------------------|-------------------------|
//! | `bool`              | `ParamType::Bool`       |
//! | `char`              | `ParamType::Char`       |
//! | `int`               | `ParamType::Int`        |
//! | `float`             | `ParamType::Float`      |
//! | `string`            | `ParamType::String`     |
//! | `enum:Format`       | `ParamType::Enum`       |
//! | `list<string>`      | `ParamType::List`       |
//! | `map<string,int>`   | `ParamType::Map`        |
//! | `record:Reference`  | `ParamType::Record`     |
//! | `any`               | `ParamType::Any`        |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a textual type name cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("Unknown parameter type '{0}'")]
    Unknown(String),

    #[error("Malformed parameter type '{input}': {message}")]
    Malformed { input: String, message: String },
}

/// The semantic type of an event parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ParamType {
    Bool,
    Char,
    Int,
    Float,
    String,
    /// An enumeration, carried as its constant name.
    Enum(String),
    List(Box<ParamType>),
    Map(Box<ParamType>, Box<ParamType>),
    /// A named structured value, carried as a JSON object.
    Record(String),
    /// A value with no declared type.
    Any,
}

impl ParamType {
    pub fn list(item: ParamType) -> Self {
        ParamType::List(Box::new(item))
    }

    pub fn map(key: ParamType, value: ParamType) -> Self {
        ParamType::Map(Box::new(key), Box::new(value))
    }

    pub fn record(name: impl Into<String>) -> Self {
        ParamType::Record(name.into())
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        ParamType::Enum(name.into())
    }

    /// Returns true for scalar kinds that can be rendered as a single string.
    pub fn is_simple(&self) -> bool {
        matches!(
            self,
            ParamType::Bool
                | ParamType::Char
                | ParamType::Int
                | ParamType::Float
                | ParamType::String
                | ParamType::Enum(_)
        )
    }

    /// The canonical default value for this type, if it has one.
    ///
    /// Strings, enums, records and untyped values have no default and are never
    /// suppressed.
    pub fn default_value(&self) -> Option<Value> {
        match self {
            ParamType::Bool => Some(Value::Bool(false)),
            ParamType::Char => Some(Value::String("\0".to_string())),
            ParamType::Int => Some(Value::from(0)),
            ParamType::Float => Some(Value::from(0.0)),
            ParamType::List(_) => Some(Value::Array(Vec::new())),
            ParamType::Map(_, _) => Some(Value::Object(serde_json::Map::new())),
            ParamType::String | ParamType::Enum(_) | ParamType::Record(_) | ParamType::Any => {
                None
            }
        }
    }

    /// Returns true if `value` is structurally equal to this type's canonical default.
    ///
    /// Numbers compare by value, so `0`, `0.0` and `-0.0` are all the default of both
    /// `int` and `float`. Null is never a default.
    pub fn is_default(&self, value: &Value) -> bool {
        match self {
            ParamType::Int | ParamType::Float => value.as_f64() == Some(0.0),
            ParamType::Bool => value.as_bool() == Some(false),
            ParamType::Char => value.as_str() == Some("\0"),
            ParamType::List(_) => value.as_array().is_some_and(Vec::is_empty),
            ParamType::Map(_, _) => value.as_object().is_some_and(serde_json::Map::is_empty),
            ParamType::String | ParamType::Enum(_) | ParamType::Record(_) | ParamType::Any => {
                false
            }
        }
    }

    /// Infers a type from the shape of a value. Used when no descriptor declares one.
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::Null => ParamType::Any,
            Value::Bool(_) => ParamType::Bool,
            Value::Number(n) if n.is_f64() => ParamType::Float,
            Value::Number(_) => ParamType::Int,
            Value::String(_) => ParamType::String,
            Value::Array(_) => ParamType::list(ParamType::Any),
            Value::Object(_) => ParamType::map(ParamType::String, ParamType::Any),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Bool => f.write_str("bool"),
            ParamType::Char => f.write_str("char"),
            ParamType::Int => f.write_str("int"),
            ParamType::Float => f.write_str("float"),
            ParamType::String => f.write_str("string"),
            ParamType::Enum(name) => write!(f, "enum:{}", name),
            ParamType::List(item) => write!(f, "list<{}>", item),
            ParamType::Map(key, value) => write!(f, "map<{},{}>", key, value),
            ParamType::Record(name) => write!(f, "record:{}", name),
            ParamType::Any => f.write_str("any"),
        }
    }
}

impl FromStr for ParamType {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let malformed = |message: &str| TypeParseError::Malformed {
            input: input.to_string(),
            message: message.to_string(),
        };

        if let Some(name) = input.strip_prefix("enum:") {
            return named(name, input).map(ParamType::Enum);
        }
        if let Some(name) = input.strip_prefix("record:") {
            return named(name, input).map(ParamType::Record);
        }
        if let Some(inner) = generic_args(input, "list")? {
            if split_top_level(inner).len() != 1 {
                return Err(malformed("list takes exactly one type argument"));
            }
            return Ok(ParamType::list(inner.parse()?));
        }
        if let Some(inner) = generic_args(input, "map")? {
            return match split_top_level(inner).as_slice() {
                [key, value] => Ok(ParamType::map(key.parse()?, value.parse()?)),
                _ => Err(malformed("map takes exactly two type arguments")),
            };
        }

        match input {
            "bool" | "boolean" => Ok(ParamType::Bool),
            "char" => Ok(ParamType::Char),
            "int" | "integer" | "long" => Ok(ParamType::Int),
            "float" | "double" => Ok(ParamType::Float),
            "string" => Ok(ParamType::String),
            "any" => Ok(ParamType::Any),
            _ => Err(TypeParseError::Unknown(input.to_string())),
        }
    }
}

impl TryFrom<String> for ParamType {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ParamType> for String {
    fn from(value: ParamType) -> Self {
        value.to_string()
    }
}

fn named(name: &str, input: &str) -> Result<String, TypeParseError> {
    if name.is_empty() {
        return Err(TypeParseError::Malformed {
            input: input.to_string(),
            message: "missing type name".to_string(),
        });
    }
    Ok(name.to_string())
}

/// Returns the text between `<` and `>` if `input` is `keyword<...>`.
fn generic_args<'a>(input: &'a str, keyword: &str) -> Result<Option<&'a str>, TypeParseError> {
    let Some(rest) = input.strip_prefix(keyword) else {
        return Ok(None);
    };
    let Some(rest) = rest.trim_start().strip_prefix('<') else {
        return Ok(None);
    };
    match rest.strip_suffix('>') {
        Some(inner) if !inner.trim().is_empty() => Ok(Some(inner)),
        _ => Err(TypeParseError::Malformed {
            input: input.to_string(),
            message: format!("unterminated or empty {}<...>", keyword),
        }),
    }
}

/// Splits on commas that are not nested inside angle brackets.
fn split_top_level(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(input[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(input[start..].trim());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_scalars() {
        assert_eq!("bool".parse::<ParamType>().unwrap(), ParamType::Bool);
        assert_eq!("int".parse::<ParamType>().unwrap(), ParamType::Int);
        assert_eq!(" string ".parse::<ParamType>().unwrap(), ParamType::String);
        assert_eq!(
            "enum:Format".parse::<ParamType>().unwrap(),
            ParamType::enumeration("Format")
        );
    }

    #[test]
    fn test_parse_nested_generics() {
        let ty: ParamType = "map<string,list<map<string,int>>>".parse().unwrap();
        assert_eq!(
            ty,
            ParamType::map(
                ParamType::String,
                ParamType::list(ParamType::map(ParamType::String, ParamType::Int))
            )
        );
        assert_eq!(ty.to_string(), "map<string,list<map<string,int>>>");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "widget".parse::<ParamType>(),
            Err(TypeParseError::Unknown(_))
        ));
        assert!(matches!(
            "map<string>".parse::<ParamType>(),
            Err(TypeParseError::Malformed { .. })
        ));
        assert!(matches!(
            "list<>".parse::<ParamType>(),
            Err(TypeParseError::Malformed { .. })
        ));
        assert!(matches!(
            "enum:".parse::<ParamType>(),
            Err(TypeParseError::Malformed { .. })
        ));
    }

    #[test]
    fn test_simple_kinds() {
        assert!(ParamType::String.is_simple());
        assert!(ParamType::enumeration("ListType").is_simple());
        assert!(!ParamType::list(ParamType::String).is_simple());
        assert!(!ParamType::record("ResourceReference").is_simple());
        assert!(!ParamType::Any.is_simple());
    }

    #[test]
    fn test_defaults() {
        assert!(ParamType::Int.is_default(&json!(0)));
        assert!(ParamType::Int.is_default(&json!(0.0)));
        assert!(!ParamType::Int.is_default(&json!(3)));
        assert!(ParamType::Bool.is_default(&json!(false)));
        assert!(ParamType::Char.is_default(&json!("\u{0}")));
        assert!(ParamType::list(ParamType::Int).is_default(&json!([])));
        assert!(ParamType::map(ParamType::String, ParamType::String).is_default(&json!({})));
        assert!(!ParamType::String.is_default(&json!("")));
        assert!(!ParamType::Int.is_default(&Value::Null));
    }

    #[test]
    fn test_default_value_matches_is_default() {
        for ty in [
            ParamType::Bool,
            ParamType::Char,
            ParamType::Int,
            ParamType::Float,
            ParamType::list(ParamType::Any),
            ParamType::map(ParamType::String, ParamType::Any),
        ] {
            let default = ty.default_value().unwrap();
            assert!(ty.is_default(&default), "{} default not recognised", ty);
        }
        assert!(ParamType::String.default_value().is_none());
    }

    #[test]
    fn test_infer() {
        assert_eq!(ParamType::infer(&json!("x")), ParamType::String);
        assert_eq!(ParamType::infer(&json!(2)), ParamType::Int);
        assert_eq!(ParamType::infer(&json!(2.5)), ParamType::Float);
        assert_eq!(ParamType::infer(&Value::Null), ParamType::Any);
        assert!(!ParamType::infer(&json!({"a": 1})).is_simple());
    }

    #[test]
    fn test_serde_uses_text_form() {
        let types: Vec<ParamType> = serde_json::from_value(json!(["int", "list<bool>"])).unwrap();
        assert_eq!(types, vec![ParamType::Int, ParamType::list(ParamType::Bool)]);
        assert_eq!(
            serde_json::to_value(ParamType::record("Ref")).unwrap(),
            json!("record:Ref")
        );
    }
}
