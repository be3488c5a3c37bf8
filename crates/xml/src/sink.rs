use evmark_traits::{Attributes, MarkupSink, SinkError};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

/// A `MarkupSink` that writes XML to any `io::Write`.
///
/// Attribute values and text are escaped by quick-xml. Elements are always written
/// as start/end pairs, never self-closed.
pub struct XmlSink<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
        }
    }

    /// Indents nested elements by `indent_size` spaces.
    pub fn with_indent(inner: W, indent_size: usize) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', indent_size),
        }
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl XmlSink<Vec<u8>> {
    /// Creates a sink writing into an in-memory buffer.
    pub fn in_memory() -> Self {
        Self::new(Vec::new())
    }

    /// Consumes the sink and returns the document written so far.
    pub fn into_string(self) -> Result<String, SinkError> {
        String::from_utf8(self.into_inner()).map_err(|e| SinkError::Writer(e.to_string()))
    }
}

impl<W: Write> MarkupSink for XmlSink<W> {
    fn start_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), SinkError> {
        let mut start = BytesStart::new(name);
        for (key, value) in attributes.iter() {
            start.push_attribute((key, value));
        }
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<(), SinkError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<(), SinkError> {
        if text.is_empty() {
            return Ok(());
        }
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.get_mut().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_writes_elements_in_order() {
        let mut sink = XmlSink::in_memory();
        sink.start_element("paragraph", &attrs(&[("p0", "a")])).unwrap();
        sink.characters("hello").unwrap();
        sink.end_element("paragraph").unwrap();
        assert_eq!(
            sink.into_string().unwrap(),
            r#"<paragraph p0="a">hello</paragraph>"#
        );
    }

    #[test]
    fn test_empty_element_is_not_self_closed() {
        let mut sink = XmlSink::in_memory();
        sink.start_element("newLine", &Attributes::new()).unwrap();
        sink.end_element("newLine").unwrap();
        assert_eq!(sink.into_string().unwrap(), "<newLine></newLine>");
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        let mut sink = XmlSink::in_memory();
        sink.start_element("word", &attrs(&[("p0", "a<b & \"c\"")]))
            .unwrap();
        sink.characters("1 < 2 && 3 > 2").unwrap();
        sink.end_element("word").unwrap();
        let xml = sink.into_string().unwrap();

        let doc = roxmltree::Document::parse(&xml).unwrap();
        let root = doc.root_element();
        assert_eq!(root.attribute("p0"), Some("a<b & \"c\""));
        assert_eq!(root.text(), Some("1 < 2 && 3 > 2"));
    }

    #[test]
    fn test_indentation() {
        let mut sink = XmlSink::with_indent(Vec::new(), 2);
        sink.start_element("a", &Attributes::new()).unwrap();
        sink.start_element("b", &Attributes::new()).unwrap();
        sink.end_element("b").unwrap();
        sink.end_element("a").unwrap();
        let xml = String::from_utf8(sink.into_inner()).unwrap();
        assert!(xml.contains("\n  <b>"));
        assert!(roxmltree::Document::parse(&xml).is_ok());
    }
}
