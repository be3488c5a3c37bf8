#![allow(dead_code)]

use evmark::{EventRecord, EvmarkError, SerializerBuilder, serialize_to_string};
use roxmltree::Node;
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Shorthand for an event record.
pub fn event(name: &str, args: Vec<Value>) -> EventRecord {
    EventRecord::new(name, args)
}

/// Serializes `records` with the default builder.
pub fn to_xml(records: &[EventRecord]) -> Result<String, EvmarkError> {
    serialize_to_string(SerializerBuilder::new(), records)
}

/// Returns the first element child of `node` named `name`, panicking if there is none.
pub fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Node<'a, 'input> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .unwrap_or_else(|| panic!("<{}> has no <{}> child", node.tag_name().name(), name))
}

/// Names of the element children of `node`, in document order.
pub fn child_names(node: Node<'_, '_>) -> Vec<String> {
    node.children()
        .filter(|n| n.is_element())
        .map(|n| n.tag_name().name().to_string())
        .collect()
}
