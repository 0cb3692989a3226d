// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable dump output.
//!
//! [`PrettyPrintSink`] implements [`DumpSink`] and writes one indented line
//! per operation to a [`Write`](std::io::Write) destination (default:
//! stderr). Indentation follows the nesting level reported by the dump.

use std::io::Write;

use stratum_core::dump::DumpSink;

/// Writes human-readable dump lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> DumpSink for PrettyPrintSink<W> {
    fn line(&mut self, level: usize, name: &'static str, detail: core::fmt::Arguments<'_>) {
        let indent = level * 2;
        let _ = writeln!(self.writer, "{:indent$}{name} {detail}", "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use stratum_core::dump::DumpFlags;
    use stratum_core::list::DisplayList;
    use stratum_core::paint::Paint;
    use stratum_core::renderer::SaveFlags;

    #[test]
    fn pretty_print_indents_by_level() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.line(0, "Save", format_args!("flags=SaveFlags(0x3)"));
        sink.line(1, "DrawRect", format_args!("rect"));
        let output = String::from_utf8(sink.writer).unwrap();
        assert!(output.starts_with("Save "), "got: {output}");
        assert!(output.contains("\n  DrawRect"), "got: {output}");
    }

    #[test]
    fn dumps_a_recorded_list() {
        let mut list = DisplayList::new(64.0, 64.0);
        list.save(SaveFlags::MATRIX_CLIP);
        list.draw_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Paint::default());
        list.restore_to_count(1);

        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        list.output(&mut sink, 0, DumpFlags::NONE);
        let output = String::from_utf8(sink.writer).unwrap();
        assert!(output.contains("Save"), "got: {output}");
        assert!(output.contains("DrawRect"), "got: {output}");
        assert!(output.contains("RestoreToCount count=1"), "got: {output}");
    }
}
