// src/stream.rs
//! Whole event streams.
//!
//! An event stream is a sequence of listener method calls. On disk it is stored as
//! JSON lines, one call per line:
//!
//! ```text
//! {"event": "beginParagraph", "args": [{}]}
//! {"event": "onWord", "args": ["Hello"]}
//! {"event": "endParagraph"}
//! ```

use crate::builder::SerializerBuilder;
use crate::error::EvmarkError;
use evmark_core::EventSerializer;
use evmark_traits::MarkupSink;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufWriter};
use std::path::Path;

/// One listener method call with its raw argument values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
}

impl EventRecord {
    pub fn new(event: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            event: event.into(),
            args,
        }
    }
}

/// Reads a JSON-lines event stream. Blank lines are skipped.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<EventRecord>, EvmarkError> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| EvmarkError::Input {
            line: index + 1,
            message: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Serializes `records` in order, stopping at the first failure, then flushes the
/// output target.
pub fn serialize_events<S: MarkupSink>(
    serializer: &mut EventSerializer<S>,
    records: &[EventRecord],
) -> Result<(), EvmarkError> {
    for (index, record) in records.iter().enumerate() {
        serializer
            .invoke(&record.event, record.args.clone())
            .map_err(|source| EvmarkError::Event {
                index,
                event: record.event.clone(),
                source,
            })?;
    }
    serializer.flush()?;
    Ok(())
}

/// Serializes a complete stream to an XML string.
///
/// Every element opened by the stream must be closed by it.
pub fn serialize_to_string(
    builder: SerializerBuilder,
    records: &[EventRecord],
) -> Result<String, EvmarkError> {
    let mut serializer = builder.build_xml(Vec::new())?;
    serialize_events(&mut serializer, records)?;
    ensure_closed(&serializer)?;

    let sink = serializer
        .take_output_target()?
        .ok_or(evmark_core::SerializeError::NoOutputTarget)?;
    Ok(sink.into_string()?)
}

/// Serializes a complete stream to an XML file, replacing any existing file.
pub fn serialize_to_file<P: AsRef<Path>>(
    builder: SerializerBuilder,
    records: &[EventRecord],
    path: P,
) -> Result<(), EvmarkError> {
    let file = File::create(path.as_ref())?;
    let mut serializer = builder.build_xml(BufWriter::new(file))?;
    serialize_events(&mut serializer, records)?;
    ensure_closed(&serializer)?;
    log::info!(
        "Wrote {} event(s) to {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Fails with `UnclosedElements` if the serializer still has open elements.
pub fn ensure_closed<S: MarkupSink>(serializer: &EventSerializer<S>) -> Result<(), EvmarkError> {
    if serializer.open_elements().is_empty() {
        Ok(())
    } else {
        Err(EvmarkError::UnclosedElements(
            serializer.open_elements().to_vec(),
        ))
    }
}
