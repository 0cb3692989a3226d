// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer contract for drawing backends.
//!
//! Stratum splits the work of actually producing pixels into a *renderer*
//! collaborator. The engine drives it two ways:
//!
//! - **Replay** — every recorded operation calls straight into the trait in
//!   program order.
//! - **Defer** — state operations call in immediately (so clip and
//!   transform queries stay correct for bounds work), while draw operations
//!   reach the renderer only when the batching buffer flushes.
//!
//! Implementations include GPU command recorders, software rasterizers, and
//! test doubles; `stratum_harness` provides a spying implementation that
//! records every call.
//!
//! # Crate boundaries
//!
//! `stratum_core` owns the operation model, the two execution passes, and
//! this contract module. Renderer crates depend on `stratum_core` and
//! resolve the opaque resource handles captured at record time.

use core::fmt;
use core::ops::{BitOr, BitOrAssign};

use kurbo::{Affine, Point, Rect};

use crate::paint::{BlendMode, Color, Paint};
use crate::resource::{
    BitmapHandle, ColorFilterKey, FunctorKey, LayerKey, PathHandle, RegionHandle, ShaderKey,
    TextRun,
};

/// Outcome of issuing a draw, reported as a small bitmask.
///
/// Callers accumulate statuses across a whole list with `|=` and inspect
/// the result to decide whether a frame needs presenting. The mask is not
/// used for control flow inside the engine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrawStatus(u32);

impl DrawStatus {
    /// No GPU work was issued.
    pub const DONE: Self = Self(0);
    /// GPU work was issued.
    pub const DREW: Self = Self(0x1);
    /// An opaque external callback ran and may itself have drawn.
    pub const INVOKED: Self = Self(0x2);

    /// Whether no bits are set.
    #[inline]
    #[must_use]
    pub const fn is_done(self) -> bool {
        self.0 == 0
    }

    /// Whether every bit of `other` is set in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for DrawStatus {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for DrawStatus {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for DrawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DrawStatus({:#x})", self.0)
    }
}

/// Which pieces of renderer state a `save` preserves.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SaveFlags(u32);

impl SaveFlags {
    /// Preserve nothing beyond the depth counter.
    pub const NONE: Self = Self(0);
    /// Preserve the current transform.
    pub const MATRIX: Self = Self(0x1);
    /// Preserve the current clip.
    pub const CLIP: Self = Self(0x2);
    /// Preserve both transform and clip.
    pub const MATRIX_CLIP: Self = Self(0x3);

    /// Creates flags from raw bits.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SaveFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for SaveFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SaveFlags({:#x})", self.0)
    }
}

/// Set operation a clip applies against the current clip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClipMode {
    /// Intersect with the current clip.
    #[default]
    Intersect,
    /// Union with the current clip.
    Union,
    /// Exclusive-or with the current clip.
    Xor,
    /// Subtract from the current clip.
    Difference,
    /// Subtract the current clip from the shape.
    ReverseDifference,
    /// Replace the current clip.
    Replace,
}

/// Executes primitive drawing and state operations.
///
/// The trait is a capability surface, not a wire protocol: every method is
/// a synchronous call on the thread that owns the renderer, and each draw
/// returns a [`DrawStatus`] the caller accumulates.
///
/// A handful of methods have default bodies — paint filtering defaults to
/// identity and the precache/mark hooks default to no-ops — so simple
/// backends and test doubles implement only what they care about.
pub trait Renderer {
    // -- Save / restore --

    /// Pushes a state scope, returning the new depth counter.
    fn save(&mut self, flags: SaveFlags) -> u32;

    /// Pops one state scope.
    fn restore(&mut self);

    /// Pops state scopes until the depth counter equals `count`.
    fn restore_to_count(&mut self, count: u32);

    /// Returns the current depth counter.
    fn save_count(&self) -> u32;

    /// Saves into an offscreen layer, returning the new depth counter.
    fn save_layer(&mut self, area: Rect, alpha: u8, mode: BlendMode, flags: SaveFlags) -> u32;

    /// State-only variant of [`save_layer`](Self::save_layer): installs the
    /// snapshot a layer save would, without allocating or redirecting
    /// rendering. The real layer entry is issued later, at flush.
    fn save_layer_deferred(
        &mut self,
        area: Rect,
        alpha: u8,
        mode: BlendMode,
        flags: SaveFlags,
    ) -> u32;

    // -- Transform --

    /// Translates the current transform.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Rotates the current transform by `degrees`.
    fn rotate(&mut self, degrees: f64);

    /// Scales the current transform.
    fn scale(&mut self, sx: f64, sy: f64);

    /// Skews the current transform.
    fn skew(&mut self, sx: f64, sy: f64);

    /// Replaces the current transform.
    fn set_matrix(&mut self, matrix: Affine);

    /// Concatenates onto the current transform.
    fn concat_matrix(&mut self, matrix: Affine);

    /// Returns the current model transform.
    fn current_matrix(&self) -> Affine;

    // -- Clip --

    /// Applies a rectangle against the current clip.
    fn clip_rect(&mut self, rect: Rect, mode: ClipMode);

    /// Applies a path against the current clip.
    fn clip_path(&mut self, path: PathHandle, mode: ClipMode);

    /// Applies a region against the current clip.
    fn clip_region(&mut self, region: RegionHandle, mode: ClipMode);

    // -- Ambient draw state --

    /// Binds a shader for subsequent draws.
    fn setup_shader(&mut self, shader: ShaderKey);

    /// Unbinds the current shader.
    fn reset_shader(&mut self);

    /// Binds a color filter for subsequent draws.
    fn setup_color_filter(&mut self, filter: ColorFilterKey);

    /// Unbinds the current color filter.
    fn reset_color_filter(&mut self);

    /// Configures a drop shadow for subsequent draws.
    fn setup_shadow(&mut self, radius: f64, dx: f64, dy: f64, color: Color);

    /// Clears the drop shadow.
    fn reset_shadow(&mut self);

    /// Installs a paint-flag filter applied by
    /// [`filter_paint`](Self::filter_paint).
    fn setup_paint_filter(&mut self, clear_bits: u32, set_bits: u32);

    /// Removes the paint-flag filter.
    fn reset_paint_filter(&mut self);

    /// Applies the ambient paint filter before a draw reads paint fields.
    ///
    /// The default is identity.
    fn filter_paint(&self, paint: Option<&Paint>) -> Option<Paint> {
        paint.copied()
    }

    // -- Draw primitives --

    /// Draws a bitmap with its top-left corner at `(left, top)`.
    fn draw_bitmap(
        &mut self,
        bitmap: BitmapHandle,
        left: f64,
        top: f64,
        paint: Option<&Paint>,
    ) -> DrawStatus;

    /// Draws a bitmap through an explicit transform.
    fn draw_bitmap_matrix(
        &mut self,
        bitmap: BitmapHandle,
        matrix: Affine,
        paint: Option<&Paint>,
    ) -> DrawStatus;

    /// Draws a sub-rectangle of a bitmap into a destination rectangle.
    fn draw_bitmap_rect(
        &mut self,
        bitmap: BitmapHandle,
        src: Rect,
        dst: Rect,
        paint: Option<&Paint>,
    ) -> DrawStatus;

    /// Draws a bitmap whose pixel data is owned by the recorded list's
    /// caller rather than a shared cache.
    fn draw_bitmap_data(
        &mut self,
        bitmap: BitmapHandle,
        left: f64,
        top: f64,
        paint: Option<&Paint>,
    ) -> DrawStatus;

    /// Draws a bitmap warped over a vertex mesh.
    fn draw_bitmap_mesh(
        &mut self,
        bitmap: BitmapHandle,
        mesh_width: u32,
        mesh_height: u32,
        vertices: &[Point],
        colors: &[Color],
        paint: Option<&Paint>,
    ) -> DrawStatus;

    /// Draws a nine-patch stretched into `bounds`.
    fn draw_patch(
        &mut self,
        bitmap: BitmapHandle,
        x_divs: &[i32],
        y_divs: &[i32],
        colors: &[Color],
        bounds: Rect,
        alpha: u8,
        mode: BlendMode,
    ) -> DrawStatus;

    /// Fills the clip with a solid color.
    fn draw_color(&mut self, color: Color, mode: BlendMode) -> DrawStatus;

    /// Draws a rectangle.
    fn draw_rect(&mut self, rect: Rect, paint: Option<&Paint>) -> DrawStatus;

    /// Draws a batch of rectangles sharing one paint.
    fn draw_rects(&mut self, rects: &[Rect], paint: Option<&Paint>) -> DrawStatus;

    /// Draws a rounded rectangle.
    fn draw_round_rect(&mut self, rect: Rect, rx: f64, ry: f64, paint: Option<&Paint>)
    -> DrawStatus;

    /// Draws a circle.
    fn draw_circle(&mut self, x: f64, y: f64, radius: f64, paint: Option<&Paint>) -> DrawStatus;

    /// Draws an oval inscribed in `rect`.
    fn draw_oval(&mut self, rect: Rect, paint: Option<&Paint>) -> DrawStatus;

    /// Draws an arc of the oval inscribed in `rect`.
    fn draw_arc(
        &mut self,
        rect: Rect,
        start_angle: f64,
        sweep_angle: f64,
        use_center: bool,
        paint: Option<&Paint>,
    ) -> DrawStatus;

    /// Draws a path.
    fn draw_path(&mut self, path: PathHandle, paint: Option<&Paint>) -> DrawStatus;

    /// Draws line segments between consecutive point pairs.
    fn draw_lines(&mut self, points: &[Point], paint: Option<&Paint>) -> DrawStatus;

    /// Draws individual points.
    fn draw_points(&mut self, points: &[Point], paint: Option<&Paint>) -> DrawStatus;

    /// Draws a shaped text run at a baseline origin.
    fn draw_text(
        &mut self,
        run: TextRun,
        x: f64,
        y: f64,
        length: f64,
        paint: Option<&Paint>,
    ) -> DrawStatus;

    /// Draws a shaped text run with an explicit position per glyph.
    fn draw_pos_text(
        &mut self,
        run: TextRun,
        positions: &[Point],
        paint: Option<&Paint>,
    ) -> DrawStatus;

    /// Draws a shaped text run along a path.
    fn draw_text_on_path(
        &mut self,
        run: TextRun,
        path: PathHandle,
        h_offset: f64,
        v_offset: f64,
        paint: Option<&Paint>,
    ) -> DrawStatus;

    /// Invokes an external draw callback, which may union the output-space
    /// area it touched into `dirty`.
    fn call_functor(&mut self, functor: FunctorKey, dirty: &mut Rect) -> DrawStatus;

    /// Composites a pre-rendered layer at `(x, y)`.
    fn draw_layer(&mut self, layer: LayerKey, x: f64, y: f64) -> DrawStatus;

    // -- Precache hooks (defaults: no-op) --

    /// Returns the transform glyph rasterization should key its cache on,
    /// given the model transform a deferred text op captured.
    fn glyph_transform_hint(&self, model: Affine) -> Affine {
        model
    }

    /// Warms glyph caches for a run ahead of its deferred draw.
    fn precache_text(&mut self, run: TextRun, paint: Option<&Paint>, transform: Affine) {
        _ = (run, paint, transform);
    }

    /// Warms path-mask caches ahead of a deferred path draw.
    fn precache_path(&mut self, path: PathHandle, paint: Option<&Paint>) {
        _ = (path, paint);
    }

    // -- Diagnostics (defaults: no-op) --

    /// Opens a named span in the backend's GPU debug annotations.
    fn start_mark(&mut self, label: &str) {
        _ = label;
    }

    /// Closes the span opened by [`start_mark`](Self::start_mark).
    fn end_mark(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accumulates_bits() {
        let mut status = DrawStatus::DONE;
        assert!(status.is_done());
        status |= DrawStatus::DREW;
        status |= DrawStatus::INVOKED;
        assert!(!status.is_done());
        assert!(status.contains(DrawStatus::DREW));
        assert!(status.contains(DrawStatus::INVOKED));
    }

    #[test]
    fn done_is_identity_for_or() {
        let status = DrawStatus::DREW | DrawStatus::DONE;
        assert_eq!(status, DrawStatus::DREW);
    }

    #[test]
    fn save_flags_combine() {
        let flags = SaveFlags::MATRIX | SaveFlags::CLIP;
        assert_eq!(flags, SaveFlags::MATRIX_CLIP);
        assert!(flags.contains(SaveFlags::MATRIX));
        assert!(!SaveFlags::MATRIX.contains(flags));
    }
}
