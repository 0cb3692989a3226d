// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured JSON dump output.
//!
//! [`JsonSink`] collects one object per operation; [`JsonSink::write`]
//! emits the whole dump as a JSON array suitable for tooling that inspects
//! recorded lists offline.

use std::io::{self, Write};

use serde_json::{Value, json};

use stratum_core::dump::DumpSink;

/// Collects dump lines as JSON objects.
///
/// Each operation becomes `{"level": .., "name": .., "detail": ..}` with
/// the detail string preformatted by the operation itself.
#[derive(Debug, Default)]
pub struct JsonSink {
    events: Vec<Value>,
}

impl JsonSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of collected operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Writes the collected dump as a JSON array.
    pub fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, &self.events)?;
        writeln!(writer)
    }
}

impl DumpSink for JsonSink {
    fn line(&mut self, level: usize, name: &'static str, detail: core::fmt::Arguments<'_>) {
        self.events.push(json!({
            "level": level,
            "name": name,
            "detail": std::fmt::format(detail),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use stratum_core::dump::DumpFlags;
    use stratum_core::list::DisplayList;
    use stratum_core::pass::ReplayFlags;
    use stratum_core::renderer::{ClipMode, SaveFlags};

    #[test]
    fn collects_one_object_per_op() {
        let mut list = DisplayList::new(32.0, 32.0);
        list.save(SaveFlags::CLIP);
        list.clip_rect(Rect::new(0.0, 0.0, 16.0, 16.0), ClipMode::Intersect);
        list.restore_to_count(1);

        let mut sink = JsonSink::new();
        list.output(&mut sink, 0, DumpFlags::NONE);
        assert_eq!(sink.len(), 3);
        assert_eq!(sink.events[1]["name"], "ClipRect");
        assert_eq!(sink.events[2]["level"], 0);
    }

    #[test]
    fn recursion_raises_the_level() {
        let mut inner = DisplayList::new(8.0, 8.0);
        inner.translate(1.0, 1.0);
        let mut outer = DisplayList::new(32.0, 32.0);
        outer.draw_list(&inner, ReplayFlags::default());

        let mut sink = JsonSink::new();
        outer.output(&mut sink, 0, DumpFlags::RECURSE);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.events[0]["name"], "DrawDisplayList");
        assert_eq!(sink.events[1]["name"], "Translate");
        assert_eq!(sink.events[1]["level"], 1);
    }

    #[test]
    fn writes_a_json_array() {
        let mut list = DisplayList::new(32.0, 32.0);
        list.rotate(45.0);

        let mut sink = JsonSink::new();
        list.output(&mut sink, 0, DumpFlags::NONE);
        let mut buffer = Vec::new();
        sink.write(&mut buffer).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["name"], "Rotate");
    }
}
