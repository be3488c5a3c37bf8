//! MarkupSink trait for abstracting the markup stream.
//!
//! A sink receives the three streaming primitives of a markup document: element
//! open (with its complete attribute list), element close, and character content.
//! Buffering and escaping are the sink's own concern.

use std::fmt;
use thiserror::Error;

/// Error reported by a sink when it cannot accept a write.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Markup writer error: {0}")]
    Writer(String),

    #[error("Sink rejected write: {0}")]
    Rejected(String),
}

/// An ordered attribute list for one open tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute. Callers are responsible for key uniqueness.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// The streaming primitives a markup writer exposes.
pub trait MarkupSink {
    /// Opens an element. The attribute list is complete at this point.
    fn start_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), SinkError>;

    /// Closes the most recently opened element with this name.
    fn end_element(&mut self, name: &str) -> Result<(), SinkError>;

    /// Writes character content inside the current element.
    fn characters(&mut self, text: &str) -> Result<(), SinkError>;

    /// Flushes any buffered output.
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: MarkupSink + ?Sized> MarkupSink for &mut S {
    fn start_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), SinkError> {
        (**self).start_element(name, attributes)
    }

    fn end_element(&mut self, name: &str) -> Result<(), SinkError> {
        (**self).end_element(name)
    }

    fn characters(&mut self, text: &str) -> Result<(), SinkError> {
        (**self).characters(text)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}

impl<S: MarkupSink + ?Sized> MarkupSink for Box<S> {
    fn start_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), SinkError> {
        (**self).start_element(name, attributes)
    }

    fn end_element(&mut self, name: &str) -> Result<(), SinkError> {
        (**self).end_element(name)
    }

    fn characters(&mut self, text: &str) -> Result<(), SinkError> {
        (**self).characters(text)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}

/// A single recorded sink call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCommand {
    Start(String, Attributes),
    End(String),
    Text(String),
}

impl fmt::Display for SinkCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkCommand::Start(name, attributes) => {
                write!(f, "<{}", name)?;
                for (key, value) in attributes.iter() {
                    write!(f, " {}=\"{}\"", key, value)?;
                }
                f.write_str(">")
            }
            SinkCommand::End(name) => write!(f, "</{}>", name),
            SinkCommand::Text(text) => f.write_str(text),
        }
    }
}

/// An in-memory sink that records every call.
///
/// The recorded commands can be inspected directly or replayed onto another sink.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    commands: Vec<SinkCommand>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[SinkCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<SinkCommand> {
        self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Renders the recording as unescaped markup text, for assertions and debugging.
    pub fn to_markup(&self) -> String {
        self.commands.iter().map(ToString::to_string).collect()
    }

    /// Applies every recorded command to `target`, in order.
    pub fn replay(&self, target: &mut dyn MarkupSink) -> Result<(), SinkError> {
        for command in &self.commands {
            match command {
                SinkCommand::Start(name, attributes) => target.start_element(name, attributes)?,
                SinkCommand::End(name) => target.end_element(name)?,
                SinkCommand::Text(text) => target.characters(text)?,
            }
        }
        Ok(())
    }
}

impl MarkupSink for RecordingSink {
    fn start_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), SinkError> {
        self.commands
            .push(SinkCommand::Start(name.to_string(), attributes.clone()));
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<(), SinkError> {
        self.commands.push(SinkCommand::End(name.to_string()));
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<(), SinkError> {
        self.commands.push(SinkCommand::Text(text.to_string()));
        Ok(())
    }
}

/// Wraps a sink and rejects the write with the given 1-based ordinal and every one after it.
#[derive(Debug)]
pub struct FailingSink<S> {
    inner: S,
    fail_at: usize,
    writes: usize,
}

impl<S: MarkupSink> FailingSink<S> {
    pub fn new(inner: S, fail_at: usize) -> Self {
        Self {
            inner,
            fail_at,
            writes: 0,
        }
    }

    /// Number of write attempts seen, including rejected ones.
    pub fn attempts(&self) -> usize {
        self.writes
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn check(&mut self) -> Result<(), SinkError> {
        self.writes += 1;
        if self.writes >= self.fail_at {
            return Err(SinkError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                format!("write {} rejected", self.writes),
            )));
        }
        Ok(())
    }
}

impl<S: MarkupSink> MarkupSink for FailingSink<S> {
    fn start_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), SinkError> {
        self.check()?;
        self.inner.start_element(name, attributes)
    }

    fn end_element(&mut self, name: &str) -> Result<(), SinkError> {
        self.check()?;
        self.inner.end_element(name)
    }

    fn characters(&mut self, text: &str) -> Result<(), SinkError> {
        self.check()?;
        self.inner.characters(text)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_records_in_order() {
        let mut sink = RecordingSink::new();
        let attrs: Attributes = [("p0", "x")].into_iter().collect();
        sink.start_element("paragraph", &attrs).unwrap();
        sink.characters("hi").unwrap();
        sink.end_element("paragraph").unwrap();

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.to_markup(), r#"<paragraph p0="x">hi</paragraph>"#);
    }

    #[test]
    fn test_replay_onto_other_sink() {
        let mut first = RecordingSink::new();
        first.start_element("a", &Attributes::new()).unwrap();
        first.end_element("a").unwrap();

        let mut second = RecordingSink::new();
        first.replay(&mut second).unwrap();
        assert_eq!(first.commands(), second.commands());
    }

    #[test]
    fn test_attributes_lookup() {
        let mut attrs = Attributes::new();
        attrs.add("name", "my block");
        attrs.add("p0", "1");
        assert_eq!(attrs.get("name"), Some("my block"));
        assert_eq!(attrs.get("p1"), None);
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_failing_sink_rejects_from_ordinal() {
        let mut sink = FailingSink::new(RecordingSink::new(), 2);
        assert!(sink.characters("one").is_ok());
        assert!(matches!(sink.characters("two"), Err(SinkError::Io(_))));
        assert!(sink.characters("three").is_err());
        assert_eq!(sink.attempts(), 3);
        assert_eq!(sink.inner().len(), 1);
    }

    #[derive(Default)]
    struct CountingFlushes {
        flushes: usize,
    }

    impl MarkupSink for CountingFlushes {
        fn start_element(&mut self, _: &str, _: &Attributes) -> Result<(), SinkError> {
            Ok(())
        }

        fn end_element(&mut self, _: &str) -> Result<(), SinkError> {
            Ok(())
        }

        fn characters(&mut self, _: &str) -> Result<(), SinkError> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), SinkError> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_failing_sink_forwards_flush() {
        let mut sink = FailingSink::new(CountingFlushes::default(), 1);
        assert!(sink.characters("rejected").is_err());
        sink.flush().unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.attempts(), 1);
        assert_eq!(sink.into_inner().flushes, 2);
    }

    #[test]
    fn test_into_commands_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.start_element("item", &Attributes::new()).unwrap();
        sink.characters("1").unwrap();
        sink.end_element("item").unwrap();

        let commands = sink.into_commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(&commands[0], SinkCommand::Start(name, attrs) if name == "item" && attrs.is_empty()));
        assert!(matches!(&commands[1], SinkCommand::Text(text) if text == "1"));
        assert!(matches!(&commands[2], SinkCommand::End(name) if name == "item"));
    }

    #[test]
    fn test_sink_error_display() {
        let err = SinkError::Rejected("closed".to_string());
        assert!(err.to_string().contains("closed"));
    }
}
