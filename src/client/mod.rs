//! Client-side event writer
//!
//! Records mutation calls as encoded wire lines into any `io::Write` sink: a
//! file, a socket, or an in-memory buffer. The resulting log is exactly what
//! a server streams to its subscribers, so the replay producer can play it
//! back later.

use std::io::Write;

use crate::protocol::codec;
use crate::types::{AttributeMap, GraphEvent, StreamResult};

/// Buffered writer for graph mutation events.
///
/// With autoflush on (the default) every call reaches the sink immediately;
/// buffered mode accumulates lines until `flush` for callers that batch.
pub struct StreamWriter<W: Write> {
    out: W,
    buffer: String,
    autoflush: bool,
}

impl<W: Write> StreamWriter<W> {
    /// Writer that flushes after every event.
    pub fn new(out: W) -> Self {
        Self {
            out,
            buffer: String::new(),
            autoflush: true,
        }
    }

    /// Writer that accumulates events until `flush` is called.
    pub fn buffered(out: W) -> Self {
        Self {
            out,
            buffer: String::new(),
            autoflush: false,
        }
    }

    pub fn add_node(&mut self, id: &str, attrs: AttributeMap, t: Option<f64>) -> StreamResult<()> {
        self.push(&GraphEvent::AddNode {
            id: id.to_string(),
            attrs,
            t,
        })
    }

    pub fn change_node(
        &mut self,
        id: &str,
        attrs: AttributeMap,
        t: Option<f64>,
    ) -> StreamResult<()> {
        self.push(&GraphEvent::ChangeNode {
            id: id.to_string(),
            attrs,
            t,
        })
    }

    pub fn delete_node(&mut self, id: &str, t: Option<f64>) -> StreamResult<()> {
        self.push(&GraphEvent::DeleteNode {
            id: id.to_string(),
            t,
        })
    }

    pub fn add_edge(
        &mut self,
        id: &str,
        source: &str,
        target: &str,
        directed: bool,
        attrs: AttributeMap,
        t: Option<f64>,
    ) -> StreamResult<()> {
        self.push(&GraphEvent::AddEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            directed,
            attrs,
            t,
        })
    }

    pub fn change_edge(
        &mut self,
        id: &str,
        attrs: AttributeMap,
        t: Option<f64>,
    ) -> StreamResult<()> {
        self.push(&GraphEvent::ChangeEdge {
            id: id.to_string(),
            attrs,
            t,
        })
    }

    pub fn delete_edge(&mut self, id: &str, t: Option<f64>) -> StreamResult<()> {
        self.push(&GraphEvent::DeleteEdge {
            id: id.to_string(),
            t,
        })
    }

    /// Emit the clear-graph control event.
    pub fn clean(&mut self, t: Option<f64>) -> StreamResult<()> {
        self.push(&GraphEvent::Clear { t })
    }

    /// Write any event.
    pub fn write_event(&mut self, event: &GraphEvent) -> StreamResult<()> {
        self.push(event)
    }

    fn push(&mut self, event: &GraphEvent) -> StreamResult<()> {
        self.buffer.push_str(&codec::encode(event)?);
        self.buffer.push_str("\r\n");
        if self.autoflush {
            self.flush()?;
        }
        Ok(())
    }

    /// Drain the buffer into the sink.
    pub fn flush(&mut self) -> StreamResult<()> {
        if !self.buffer.is_empty() {
            self.out.write_all(self.buffer.as_bytes())?;
            self.out.flush()?;
            self.buffer.clear();
        }
        Ok(())
    }

    /// Flush and give back the sink.
    pub fn into_inner(mut self) -> StreamResult<W> {
        self.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codec;
    use crate::types::AttrValue;

    fn label(text: &str) -> AttributeMap {
        let mut attrs = AttributeMap::new();
        attrs.insert("label".to_string(), AttrValue::Text(text.to_string()));
        attrs
    }

    #[test]
    fn test_written_lines_decode_back() {
        let mut writer = StreamWriter::new(Vec::new());
        writer.add_node("A", label("A"), Some(1.0)).unwrap();
        writer
            .add_edge("e1", "A", "B", true, AttributeMap::new(), Some(2.0))
            .unwrap();
        writer.delete_node("A", Some(3.0)).unwrap();

        let out = writer.into_inner().unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 3);

        let first = codec::decode(lines[0]).unwrap();
        assert_eq!(first.id(), Some("A"));
        assert_eq!(first.timestamp(), Some(1.0));

        match codec::decode(lines[1]).unwrap() {
            GraphEvent::AddEdge { source, target, .. } => {
                assert_eq!(source, "A");
                assert_eq!(target, "B");
            }
            other => panic!("expected AddEdge, got {:?}", other),
        }
    }

    #[test]
    fn test_buffered_mode_holds_until_flush() {
        let mut writer = StreamWriter::buffered(Vec::new());
        writer.add_node("A", AttributeMap::new(), None).unwrap();
        // Nothing written yet; the sink is only reachable through into_inner,
        // which flushes, so check the buffer instead.
        assert!(!writer.buffer.is_empty());

        writer.flush().unwrap();
        assert!(writer.buffer.is_empty());

        let out = writer.into_inner().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"an\":{\"A\":{}}}\r\n");
    }

    #[test]
    fn test_clean_writes_control_event() {
        let mut writer = StreamWriter::new(Vec::new());
        writer.clean(None).unwrap();
        let out = writer.into_inner().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"dn\":{\"filter\":\"ALL\"}}\r\n"
        );
    }
}
