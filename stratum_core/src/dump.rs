// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured dump of recorded operations.
//!
//! A [`DumpSink`] receives one line per operation with its nesting level,
//! so tooling can render an indented trace, feed a log, or build a
//! structured document. `stratum_debug` ships text and JSON sinks; the
//! engine itself never formats.

use core::fmt;
use core::ops::BitOr;

/// Options controlling what a dump walks.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DumpFlags(u32);

impl DumpFlags {
    /// Dump only the receiving list.
    pub const NONE: Self = Self(0);
    /// Descend into nested lists referenced by draw-list ops.
    pub const RECURSE: Self = Self(0x1);

    /// Whether every bit of `other` is set in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for DumpFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for DumpFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DumpFlags({:#x})", self.0)
    }
}

/// Receives one line per dumped operation.
///
/// `level` is the save/list nesting depth, `name` the operation's stable
/// name, and `detail` its preformatted argument summary. The default body
/// discards everything, so a sink overrides only when it wants output.
pub trait DumpSink {
    /// Handles one operation line.
    fn line(&mut self, level: usize, name: &'static str, detail: fmt::Arguments<'_>) {
        _ = (level, name, detail);
    }
}

/// A sink that discards all output.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl DumpSink for NoopSink {}
