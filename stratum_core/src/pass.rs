// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Execution contexts for the replay and deferred passes.
//!
//! Both passes walk a [`DisplayList`](crate::list::DisplayList) top to
//! bottom on the thread that owns the renderer. Replay issues every op
//! straight into the [`Renderer`]; the deferred pass applies state ops
//! immediately but hands draw ops (and the scope/clip ops that bracket
//! them) to a [`DeferTarget`], which is free to reorder and merge
//! compatible draws before flushing.
//!
//! Each context captures a depth baseline from the renderer at
//! construction. Recorded restore targets use canvas convention (depth 1
//! is the state at root-pass entry) and resolve against that baseline, so
//! the same recording executes correctly whether the renderer sits at its
//! ground state or under extra ambient scopes the caller pushed.

use core::fmt;
use core::ops::BitOr;

use kurbo::Rect;

use crate::op::{DrawOp, StateOp};
use crate::renderer::{DrawStatus, Renderer};

/// Options forwarded to an executing list.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplayFlags(u32);

impl ReplayFlags {
    /// No options.
    pub const NONE: Self = Self(0);
    /// Quick-reject draws that fall wholly outside the current clip.
    pub const CLIP_CHILDREN: Self = Self(0x1);

    /// Whether every bit of `other` is set in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for ReplayFlags {
    fn default() -> Self {
        Self::CLIP_CHILDREN
    }
}

impl BitOr for ReplayFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for ReplayFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReplayFlags({:#x})", self.0)
    }
}

/// Receives operations from the deferred pass for batched flushing.
///
/// The target retains draw ops by reference, so its lifetime parameter is
/// the recording arena's. Scope and clip registrations arrive in program
/// order; draw ops arrive already stamped with their
/// [`DeferredState`](crate::op::DeferredState) snapshot, and the hand-off
/// happens after the pass has applied the op's bracketing state to the
/// renderer, so the target may query current transform and clip.
pub trait DeferTarget<'a, R: Renderer> {
    /// Registers a scope push. `new_save_count` is the depth the renderer
    /// reported for the save the pass just issued.
    fn add_save(&mut self, renderer: &mut R, op: &'a StateOp, new_save_count: u32);

    /// Registers a scope pop to an absolute depth, before the pass issues
    /// it to the renderer.
    fn add_restore_to_count(&mut self, renderer: &mut R, op: &'a StateOp, save_count: u32);

    /// Registers a layer save. The pass installs only the deferred
    /// state-side effects; the target owns issuing the real layer entry at
    /// flush. `save_count` is the depth counter before the save.
    fn add_save_layer(&mut self, renderer: &mut R, op: &'a StateOp, save_count: u32);

    /// Registers a clip, before the pass applies it to the renderer.
    fn add_clip(&mut self, renderer: &mut R, op: &'a StateOp);

    /// Buffers a draw for later flushing.
    fn add_draw_op(&mut self, renderer: &mut R, op: &'a DrawOp<'a>);
}

/// Per-pass state for direct replay.
pub struct ReplayContext<'r, R: Renderer> {
    pub(crate) renderer: &'r mut R,
    pub(crate) flags: ReplayFlags,
    /// Output-space damage accumulated from functor callbacks.
    pub(crate) dirty: Rect,
    pub(crate) status: DrawStatus,
    pub(crate) base_save_count: u32,
}

impl<'r, R: Renderer> ReplayContext<'r, R> {
    /// Creates a replay context. The restore baseline is the renderer's
    /// current depth minus one, so a recorded restore to depth 1 lands on
    /// the state in force right now.
    #[must_use]
    pub fn new(renderer: &'r mut R, flags: ReplayFlags) -> Self {
        let base_save_count = renderer.save_count().saturating_sub(1);
        Self {
            renderer,
            flags,
            dirty: Rect::ZERO,
            status: DrawStatus::DONE,
            base_save_count,
        }
    }

    /// Accumulated status across every draw issued so far.
    #[inline]
    #[must_use]
    pub fn status(&self) -> DrawStatus {
        self.status
    }

    /// Output-space damage reported by functor callbacks.
    #[inline]
    #[must_use]
    pub fn dirty(&self) -> Rect {
        self.dirty
    }

    /// The depth baseline captured at construction.
    #[inline]
    #[must_use]
    pub fn base_save_count(&self) -> u32 {
        self.base_save_count
    }
}

impl<R: Renderer> fmt::Debug for ReplayContext<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplayContext")
            .field("flags", &self.flags)
            .field("dirty", &self.dirty)
            .field("status", &self.status)
            .field("base_save_count", &self.base_save_count)
            .finish_non_exhaustive()
    }
}

/// Per-pass state for deferred execution.
pub struct DeferContext<'r, R: Renderer, T> {
    pub(crate) renderer: &'r mut R,
    pub(crate) target: &'r mut T,
    pub(crate) flags: ReplayFlags,
    pub(crate) base_save_count: u32,
}

impl<'r, R: Renderer, T> DeferContext<'r, R, T> {
    /// Creates a defer context. The restore baseline is the renderer's
    /// current depth minus one, so a recorded restore to depth 1 lands on
    /// the state in force right now.
    #[must_use]
    pub fn new(renderer: &'r mut R, target: &'r mut T, flags: ReplayFlags) -> Self {
        let base_save_count = renderer.save_count().saturating_sub(1);
        Self {
            renderer,
            target,
            flags,
            base_save_count,
        }
    }

    /// The depth baseline captured at construction.
    #[inline]
    #[must_use]
    pub fn base_save_count(&self) -> u32 {
        self.base_save_count
    }
}

impl<R: Renderer, T> fmt::Debug for DeferContext<'_, R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferContext")
            .field("flags", &self.flags)
            .field("base_save_count", &self.base_save_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_clip_children() {
        assert!(ReplayFlags::default().contains(ReplayFlags::CLIP_CHILDREN));
        assert!(!ReplayFlags::NONE.contains(ReplayFlags::CLIP_CHILDREN));
    }
}
