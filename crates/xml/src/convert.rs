use evmark_traits::{ConvertError, ValueConverter};
use evmark_types::{ParamType, Value};

/// The default `ValueConverter`.
///
/// Strings and enum constants are written as-is, numbers in their shortest decimal
/// form and booleans as `true`/`false`. Composite values fall back to compact JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextConverter;

impl TextConverter {
    pub fn new() -> Self {
        Self
    }
}

impl ValueConverter for TextConverter {
    fn to_text(&self, ty: &ParamType, value: &Value) -> Result<String, ConvertError> {
        let mismatch = || ConvertError::mismatch(ty, value);
        match ty {
            ParamType::String | ParamType::Enum(_) => {
                value.as_str().map(str::to_string).ok_or_else(mismatch)
            }
            ParamType::Char => match value.as_str() {
                Some(s) if s.chars().count() == 1 => Ok(s.to_string()),
                _ => Err(mismatch()),
            },
            ParamType::Bool => value.as_bool().map(|b| b.to_string()).ok_or_else(mismatch),
            ParamType::Int => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
                _ => Err(mismatch()),
            },
            ParamType::Float => match value {
                Value::Number(n) => Ok(n.to_string()),
                _ => Err(mismatch()),
            },
            ParamType::List(_) if value.is_array() => Ok(value.to_string()),
            ParamType::Map(_, _) | ParamType::Record(_) if value.is_object() => {
                Ok(value.to_string())
            }
            ParamType::List(_) | ParamType::Map(_, _) | ParamType::Record(_) => Err(mismatch()),
            ParamType::Any => match value {
                Value::Null => Err(ConvertError::Unsupported(
                    "null has no text form".to_string(),
                )),
                Value::String(s) => Ok(s.clone()),
                other => Ok(other.to_string()),
            },
        }
    }

    fn name(&self) -> &'static str {
        "TextConverter"
    }
}
