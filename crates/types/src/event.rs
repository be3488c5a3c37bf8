//! The event model: one `EventCall` per invocation of a listener method.

use crate::param_type::ParamType;
use serde_json::Value;
use std::fmt;

/// The traversal phase an event method belongs to, selected by its name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// `begin<Kind>`: opens a node.
    Begin,
    /// `end<Kind>`: closes the node opened by the matching `begin<Kind>`.
    End,
    /// `on<Kind>`: a node without children.
    Leaf,
}

impl Phase {
    /// Prefixes in the order they are matched against method names.
    pub const ALL: [Phase; 3] = [Phase::Begin, Phase::End, Phase::Leaf];

    pub fn prefix(self) -> &'static str {
        match self {
            Phase::Begin => "begin",
            Phase::End => "end",
            Phase::Leaf => "on",
        }
    }

    /// Splits a listener method name such as `beginParagraph` into its phase and node
    /// kind (`paragraph`). Only the first character of the kind is lower-cased.
    ///
    /// Returns `None` when no prefix matches or nothing follows the prefix.
    pub fn split_method_name(name: &str) -> Option<(Phase, String)> {
        Phase::ALL.into_iter().find_map(|phase| {
            let rest = name.strip_prefix(phase.prefix())?;
            let mut chars = rest.chars();
            let first = chars.next()?;
            let mut kind: String = first.to_lowercase().collect();
            kind.push_str(chars.as_str());
            Some((phase, kind))
        })
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A positional event argument together with its semantic type.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub ty: ParamType,
    pub value: Value,
}

impl Argument {
    pub fn new(ty: ParamType, value: impl Into<Value>) -> Self {
        Self {
            ty,
            value: value.into(),
        }
    }

    /// Builds an argument whose type is inferred from the value.
    pub fn inferred(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            ty: ParamType::infer(&value),
            value,
        }
    }
}

/// One event invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct EventCall {
    pub phase: Phase,
    /// The method name without its phase prefix, first character lower-cased.
    pub node_kind: String,
    pub arguments: Vec<Argument>,
}

impl EventCall {
    pub fn new(phase: Phase, node_kind: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self {
            phase,
            node_kind: node_kind.into(),
            arguments,
        }
    }

    pub fn begin(node_kind: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self::new(Phase::Begin, node_kind, arguments)
    }

    /// End events never carry arguments.
    pub fn end(node_kind: impl Into<String>) -> Self {
        Self::new(Phase::End, node_kind, Vec::new())
    }

    pub fn leaf(node_kind: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self::new(Phase::Leaf, node_kind, arguments)
    }

    /// Rebuilds the listener method name, e.g. `beginParagraph`.
    pub fn method_name(&self) -> String {
        let mut chars = self.node_kind.chars();
        let mut name = String::from(self.phase.prefix());
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
        name
    }
}

impl fmt::Display for EventCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.method_name())?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", arg.ty, arg.value)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_name() {
        assert_eq!(EventCall::begin("paragraph", vec![]).method_name(), "beginParagraph");
        assert_eq!(EventCall::end("listItem").method_name(), "endListItem");
        assert_eq!(EventCall::leaf("newLine", vec![]).method_name(), "onNewLine");
    }

    #[test]
    fn test_split_method_name() {
        assert_eq!(
            Phase::split_method_name("beginParagraph"),
            Some((Phase::Begin, "paragraph".to_string()))
        );
        assert_eq!(
            Phase::split_method_name("endListItem"),
            Some((Phase::End, "listItem".to_string()))
        );
        assert_eq!(
            Phase::split_method_name("onNewLine"),
            Some((Phase::Leaf, "newLine".to_string()))
        );
        assert_eq!(
            Phase::split_method_name("onHTMLBlock"),
            Some((Phase::Leaf, "hTMLBlock".to_string()))
        );
    }

    #[test]
    fn test_split_method_name_rejects() {
        assert_eq!(Phase::split_method_name("setOutputTarget"), None);
        assert_eq!(Phase::split_method_name("begin"), None);
        assert_eq!(Phase::split_method_name("on"), None);
        assert_eq!(Phase::split_method_name(""), None);
    }

    #[test]
    fn test_display() {
        let call = EventCall::leaf("word", vec![Argument::new(ParamType::String, "hi")]);
        assert_eq!(call.to_string(), r#"onWord(string: "hi")"#);
    }

    #[test]
    fn test_inferred_argument() {
        let arg = Argument::inferred(json!([1, 2]));
        assert_eq!(arg.ty, ParamType::list(ParamType::Any));
    }
}
