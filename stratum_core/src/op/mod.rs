// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The recorded operation model.
//!
//! Every entry in a display list is an [`Op`]: either a [`StateOp`] that
//! mutates renderer state (transform, clip, save stack, ambient draw
//! state) or a [`DrawOp`] that produces output. State ops are plain data;
//! draw ops additionally carry per-pass scratch (quick-reject flag,
//! deferred snapshot) in [`Cell`]s so both execution passes run over a
//! shared `&DisplayList`.
//!
//! [`Cell`]: core::cell::Cell

mod draw;
mod state;

pub use draw::{DrawKind, DrawOp};
pub use state::StateOp;

pub(crate) use draw::bounds_of_points;

use kurbo::{Affine, Rect};

/// State snapshot captured for a draw during the deferred pass.
///
/// `bounds` is the op's conservative local-space coverage and `matrix` the
/// model transform in effect when the op was deferred. A flush-time buffer
/// reads both to decide merge compatibility and overlap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeferredState {
    /// Conservative local-space bounds; [`Rect::ZERO`] when unbounded.
    pub bounds: Rect,
    /// Model transform at deferral time.
    pub matrix: Affine,
}

impl Default for DeferredState {
    fn default() -> Self {
        Self {
            bounds: Rect::ZERO,
            matrix: Affine::IDENTITY,
        }
    }
}

/// One recorded operation.
#[derive(Debug)]
pub enum Op<'a> {
    /// Mutates renderer state without drawing.
    State(StateOp),
    /// Produces rendered output.
    Draw(DrawOp<'a>),
}

impl Op<'_> {
    /// The operation's stable name, as used in dumps.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::State(op) => op.name(),
            Self::Draw(op) => op.name(),
        }
    }
}
