// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw operations: everything that produces rendered output.

use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use kurbo::{Affine, Point, Rect};

use crate::batch::BatchId;
use crate::dump::{DumpFlags, DumpSink};
use crate::list::DisplayList;
use crate::op::DeferredState;
use crate::paint::{BlendMode, Color, Paint};
use crate::pass::ReplayFlags;
use crate::renderer::{DrawStatus, Renderer};
use crate::resource::{BitmapHandle, FunctorKey, LayerKey, PathHandle, TextRun};

/// The shape-specific payload of a draw op.
#[derive(Debug)]
pub enum DrawKind<'a> {
    /// A bitmap at a fixed offset.
    Bitmap {
        /// The bitmap.
        bitmap: BitmapHandle,
        /// Left edge in local space.
        left: f64,
        /// Top edge in local space.
        top: f64,
    },
    /// A bitmap through an explicit transform.
    BitmapMatrix {
        /// The bitmap.
        bitmap: BitmapHandle,
        /// Transform applied to the bitmap's own space.
        matrix: Affine,
    },
    /// A sub-rectangle of a bitmap into a destination rectangle.
    BitmapRect {
        /// The bitmap.
        bitmap: BitmapHandle,
        /// Source rectangle in bitmap space.
        src: Rect,
        /// Destination rectangle in local space.
        dst: Rect,
    },
    /// A bitmap whose pixels are owned by the recording's caller.
    BitmapData {
        /// The bitmap.
        bitmap: BitmapHandle,
        /// Left edge in local space.
        left: f64,
        /// Top edge in local space.
        top: f64,
    },
    /// A bitmap warped over a vertex mesh.
    BitmapMesh {
        /// The bitmap.
        bitmap: BitmapHandle,
        /// Mesh columns.
        mesh_width: u32,
        /// Mesh rows.
        mesh_height: u32,
        /// `(mesh_width + 1) * (mesh_height + 1)` vertex positions.
        vertices: Vec<Point>,
        /// Optional per-vertex colors; empty when unused.
        colors: Vec<Color>,
    },
    /// A nine-patch stretched into its recorded bounds.
    Patch {
        /// The source bitmap.
        bitmap: BitmapHandle,
        /// Stretchable column boundaries in bitmap space.
        x_divs: Vec<i32>,
        /// Stretchable row boundaries in bitmap space.
        y_divs: Vec<i32>,
        /// Optional per-cell colors; empty when unused.
        colors: Vec<Color>,
        /// Opacity applied to the patch.
        alpha: u8,
        /// Blend mode for the patch.
        mode: BlendMode,
    },
    /// A solid color filling the clip.
    Color {
        /// The fill color.
        color: Color,
        /// The blend mode.
        mode: BlendMode,
    },
    /// A rectangle.
    Rect {
        /// The rectangle.
        rect: Rect,
    },
    /// A batch of rectangles sharing one paint.
    Rects {
        /// The rectangles.
        rects: Vec<Rect>,
    },
    /// A rounded rectangle.
    RoundRect {
        /// The rectangle.
        rect: Rect,
        /// Horizontal corner radius.
        rx: f64,
        /// Vertical corner radius.
        ry: f64,
    },
    /// A circle.
    Circle {
        /// Center x.
        x: f64,
        /// Center y.
        y: f64,
        /// Radius.
        radius: f64,
    },
    /// An oval inscribed in a rectangle.
    Oval {
        /// The bounding rectangle.
        rect: Rect,
    },
    /// An arc of an inscribed oval.
    Arc {
        /// The bounding rectangle.
        rect: Rect,
        /// Start angle in degrees.
        start_angle: f64,
        /// Sweep in degrees.
        sweep_angle: f64,
        /// Whether to include the oval's center as a wedge.
        use_center: bool,
    },
    /// A path.
    Path {
        /// The path.
        path: PathHandle,
    },
    /// Line segments between consecutive point pairs.
    Lines {
        /// Segment endpoints, two per line.
        points: Vec<Point>,
    },
    /// Individual points.
    Points {
        /// The points.
        points: Vec<Point>,
    },
    /// A shaped text run at a baseline origin.
    Text {
        /// The run.
        run: TextRun,
        /// Baseline origin x, already alignment-adjusted at record time.
        x: f64,
        /// Baseline origin y.
        y: f64,
        /// Advance width of the run.
        length: f64,
        /// Transform last handed to glyph precache, so repeated deferrals
        /// under the same transform skip redundant cache warming.
        precache_transform: Cell<Option<Affine>>,
    },
    /// A shaped text run with an explicit position per glyph.
    PosText {
        /// The run.
        run: TextRun,
        /// One position per glyph.
        positions: Vec<Point>,
    },
    /// A shaped text run along a path.
    TextOnPath {
        /// The run.
        run: TextRun,
        /// The path to follow.
        path: PathHandle,
        /// Offset along the path.
        h_offset: f64,
        /// Offset perpendicular to the path.
        v_offset: f64,
    },
    /// An external draw callback.
    Functor {
        /// The callback.
        functor: FunctorKey,
    },
    /// A nested display list.
    List {
        /// The nested recording; outlives this op's list.
        list: &'a DisplayList<'a>,
        /// Flags forwarded when the nested list executes.
        flags: ReplayFlags,
    },
    /// A pre-rendered layer composited at an offset.
    Layer {
        /// The layer.
        layer: LayerKey,
        /// Left edge in local space.
        x: f64,
        /// Top edge in local space.
        y: f64,
    },
}

/// A recorded operation that produces output.
///
/// Alongside its immutable payload, a draw op carries two [`Cell`]-backed
/// scratch slots written during execution passes: the quick-reject verdict
/// and the deferred-state snapshot. Both are per-pass transients; a list
/// shared between windows is re-stamped on each pass.
pub struct DrawOp<'a> {
    kind: DrawKind<'a>,
    paint: Option<Paint>,
    /// Conservative local-space bounds, or `None` when the op's coverage
    /// is unknowable (color fills, functors, positioned text).
    bounds: Option<Rect>,
    quick_rejected: Cell<bool>,
    state: Cell<DeferredState>,
}

impl<'a> DrawOp<'a> {
    pub(crate) fn new(kind: DrawKind<'a>, paint: Option<Paint>, bounds: Option<Rect>) -> Self {
        Self {
            kind,
            paint,
            bounds,
            quick_rejected: Cell::new(false),
            state: Cell::new(DeferredState::default()),
        }
    }

    /// The shape-specific payload.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &DrawKind<'a> {
        &self.kind
    }

    /// The recorded paint, if the op takes one.
    #[inline]
    #[must_use]
    pub fn paint(&self) -> Option<&Paint> {
        self.paint.as_ref()
    }

    /// Whether the most recent pass marked this op as outside the clip.
    #[inline]
    #[must_use]
    pub fn quick_rejected(&self) -> bool {
        self.quick_rejected.get()
    }

    /// Stamps the quick-reject verdict for the current pass.
    #[inline]
    pub fn set_quick_rejected(&self, rejected: bool) {
        self.quick_rejected.set(rejected);
    }

    /// The snapshot stamped by the most recent deferred pass.
    #[inline]
    #[must_use]
    pub fn deferred_state(&self) -> DeferredState {
        self.state.get()
    }

    /// Stamps the deferred-state snapshot for the current pass.
    #[inline]
    pub fn set_deferred_state(&self, state: DeferredState) {
        self.state.set(state);
    }

    /// Conservative local-space bounds, grown by stroke geometry where the
    /// paint strokes. `None` means the op's coverage is unknowable and it
    /// must never be quick-rejected.
    #[must_use]
    pub fn local_bounds(&self) -> Option<Rect> {
        let raw = self.bounds?;
        let stroked = self.paint.is_some_and(|p| p.is_stroked());
        if stroked {
            match self.kind {
                DrawKind::Rect { .. }
                | DrawKind::Rects { .. }
                | DrawKind::RoundRect { .. }
                | DrawKind::Circle { .. }
                | DrawKind::Oval { .. }
                | DrawKind::Arc { .. } => {
                    let outset = self.paint.map_or(0.0, |p| p.stroke_outset());
                    return Some(raw.inflate(outset, outset));
                }
                _ => {}
            }
        }
        Some(raw)
    }

    /// Which deferred batch this op may merge into.
    #[must_use]
    pub fn batch_id(&self) -> BatchId {
        match &self.kind {
            DrawKind::Bitmap { .. }
            | DrawKind::BitmapMatrix { .. }
            | DrawKind::BitmapRect { .. }
            | DrawKind::BitmapData { .. }
            | DrawKind::BitmapMesh { .. } => BatchId::Bitmap,
            DrawKind::Patch { .. } => BatchId::Patch,
            DrawKind::Rect { .. }
            | DrawKind::RoundRect { .. }
            | DrawKind::Circle { .. }
            | DrawKind::Oval { .. }
            | DrawKind::Arc { .. } => {
                let paint = self.paint.unwrap_or_default();
                if paint.path_effect {
                    BatchId::AlphaMaskTexture
                } else if paint.anti_alias {
                    BatchId::AlphaVertices
                } else {
                    BatchId::Vertices
                }
            }
            DrawKind::Rects { .. } => BatchId::Vertices,
            DrawKind::Path { .. } => BatchId::AlphaMaskTexture,
            DrawKind::Lines { .. } | DrawKind::Points { .. } => {
                if self.paint.unwrap_or_default().anti_alias {
                    BatchId::AlphaVertices
                } else {
                    BatchId::Vertices
                }
            }
            DrawKind::Text { .. } | DrawKind::PosText { .. } | DrawKind::TextOnPath { .. } => {
                if self.paint.unwrap_or_default().color.is_opaque_black() {
                    BatchId::Text
                } else {
                    BatchId::ColorText
                }
            }
            DrawKind::Color { .. }
            | DrawKind::Functor { .. }
            | DrawKind::List { .. }
            | DrawKind::Layer { .. } => BatchId::None,
        }
    }

    /// The operation's stable name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match &self.kind {
            DrawKind::Bitmap { .. } => "DrawBitmap",
            DrawKind::BitmapMatrix { .. } => "DrawBitmapMatrix",
            DrawKind::BitmapRect { .. } => "DrawBitmapRect",
            DrawKind::BitmapData { .. } => "DrawBitmapData",
            DrawKind::BitmapMesh { .. } => "DrawBitmapMesh",
            DrawKind::Patch { .. } => "DrawPatch",
            DrawKind::Color { .. } => "DrawColor",
            DrawKind::Rect { .. } => "DrawRect",
            DrawKind::Rects { .. } => "DrawRects",
            DrawKind::RoundRect { .. } => "DrawRoundRect",
            DrawKind::Circle { .. } => "DrawCircle",
            DrawKind::Oval { .. } => "DrawOval",
            DrawKind::Arc { .. } => "DrawArc",
            DrawKind::Path { .. } => "DrawPath",
            DrawKind::Lines { .. } => "DrawLines",
            DrawKind::Points { .. } => "DrawPoints",
            DrawKind::Text { .. } => "DrawText",
            DrawKind::PosText { .. } => "DrawPosText",
            DrawKind::TextOnPath { .. } => "DrawTextOnPath",
            DrawKind::Functor { .. } => "DrawFunctor",
            DrawKind::List { .. } => "DrawDisplayList",
            DrawKind::Layer { .. } => "DrawLayer",
        }
    }

    /// Issues this op against `renderer`, accumulating any functor damage
    /// into `dirty`.
    ///
    /// Nested lists are driven by the list walker, not here; a `List` op
    /// reaching this method reports no work.
    pub fn apply_draw<R: Renderer>(&self, renderer: &mut R, dirty: &mut Rect) -> DrawStatus {
        let filtered = renderer.filter_paint(self.paint.as_ref());
        let paint = filtered.as_ref();
        match &self.kind {
            DrawKind::Bitmap { bitmap, left, top } => {
                renderer.draw_bitmap(*bitmap, *left, *top, paint)
            }
            DrawKind::BitmapMatrix { bitmap, matrix } => {
                renderer.draw_bitmap_matrix(*bitmap, *matrix, paint)
            }
            DrawKind::BitmapRect { bitmap, src, dst } => {
                renderer.draw_bitmap_rect(*bitmap, *src, *dst, paint)
            }
            DrawKind::BitmapData { bitmap, left, top } => {
                renderer.draw_bitmap_data(*bitmap, *left, *top, paint)
            }
            DrawKind::BitmapMesh {
                bitmap,
                mesh_width,
                mesh_height,
                vertices,
                colors,
            } => renderer.draw_bitmap_mesh(
                *bitmap,
                *mesh_width,
                *mesh_height,
                vertices,
                colors,
                paint,
            ),
            DrawKind::Patch {
                bitmap,
                x_divs,
                y_divs,
                colors,
                alpha,
                mode,
            } => {
                let bounds = self.bounds.unwrap_or(Rect::ZERO);
                renderer.draw_patch(*bitmap, x_divs, y_divs, colors, bounds, *alpha, *mode)
            }
            DrawKind::Color { color, mode } => renderer.draw_color(*color, *mode),
            DrawKind::Rect { rect } => renderer.draw_rect(*rect, paint),
            DrawKind::Rects { rects } => renderer.draw_rects(rects, paint),
            DrawKind::RoundRect { rect, rx, ry } => renderer.draw_round_rect(*rect, *rx, *ry, paint),
            DrawKind::Circle { x, y, radius } => renderer.draw_circle(*x, *y, *radius, paint),
            DrawKind::Oval { rect } => renderer.draw_oval(*rect, paint),
            DrawKind::Arc {
                rect,
                start_angle,
                sweep_angle,
                use_center,
            } => renderer.draw_arc(*rect, *start_angle, *sweep_angle, *use_center, paint),
            DrawKind::Path { path } => renderer.draw_path(*path, paint),
            DrawKind::Lines { points } => renderer.draw_lines(points, paint),
            DrawKind::Points { points } => renderer.draw_points(points, paint),
            DrawKind::Text { run, x, y, length, .. } => {
                renderer.draw_text(*run, *x, *y, *length, paint)
            }
            DrawKind::PosText { run, positions } => {
                renderer.draw_pos_text(*run, positions, paint)
            }
            DrawKind::TextOnPath {
                run,
                path,
                h_offset,
                v_offset,
            } => renderer.draw_text_on_path(*run, *path, *h_offset, *v_offset, paint),
            DrawKind::Functor { functor } => {
                renderer.start_mark(self.name());
                let status = renderer.call_functor(*functor, dirty);
                renderer.end_mark();
                status
            }
            DrawKind::List { .. } => DrawStatus::DONE,
            DrawKind::Layer { layer, x, y } => renderer.draw_layer(*layer, *x, *y),
        }
    }

    /// Hook run when this op enters a deferral buffer: warms caches whose
    /// contents the flush-time draw will need.
    pub fn on_deferred<R: Renderer>(&self, renderer: &mut R) {
        match &self.kind {
            DrawKind::Path { path } => renderer.precache_path(*path, self.paint.as_ref()),
            DrawKind::Text {
                run,
                precache_transform,
                ..
            } => {
                let transform = renderer.glyph_transform_hint(self.state.get().matrix);
                if precache_transform.get() != Some(transform) {
                    renderer.precache_text(*run, self.paint.as_ref(), transform);
                    precache_transform.set(Some(transform));
                }
            }
            DrawKind::PosText { run, .. } | DrawKind::TextOnPath { run, .. } => {
                renderer.precache_text(*run, self.paint.as_ref(), Affine::IDENTITY);
            }
            _ => {}
        }
    }

    /// Emits this op's dump line, recursing into nested lists when
    /// `flags` asks for it.
    pub fn output(&self, sink: &mut dyn DumpSink, level: usize, flags: DumpFlags) {
        let name = self.name();
        match &self.kind {
            DrawKind::Bitmap { bitmap, left, top }
            | DrawKind::BitmapData { bitmap, left, top } => {
                sink.line(level, name, format_args!("{bitmap:?} at ({left}, {top})"));
            }
            DrawKind::BitmapMatrix { bitmap, matrix } => {
                sink.line(level, name, format_args!("{bitmap:?} matrix={matrix:?}"));
            }
            DrawKind::BitmapRect { bitmap, src, dst } => {
                sink.line(level, name, format_args!("{bitmap:?} {src:?} -> {dst:?}"));
            }
            DrawKind::BitmapMesh {
                bitmap,
                mesh_width,
                mesh_height,
                ..
            } => sink.line(
                level,
                name,
                format_args!("{bitmap:?} mesh={mesh_width}x{mesh_height}"),
            ),
            DrawKind::Patch { bitmap, alpha, mode, .. } => sink.line(
                level,
                name,
                format_args!(
                    "{bitmap:?} bounds={:?} alpha={alpha} mode={mode:?}",
                    self.bounds.unwrap_or(Rect::ZERO)
                ),
            ),
            DrawKind::Color { color, mode } => {
                sink.line(level, name, format_args!("{color:?} mode={mode:?}"));
            }
            DrawKind::Rect { rect } | DrawKind::Oval { rect } => {
                sink.line(level, name, format_args!("{rect:?}"));
            }
            DrawKind::Rects { rects } => {
                sink.line(level, name, format_args!("{} rects", rects.len()));
            }
            DrawKind::RoundRect { rect, rx, ry } => {
                sink.line(level, name, format_args!("{rect:?} radii=({rx}, {ry})"));
            }
            DrawKind::Circle { x, y, radius } => {
                sink.line(level, name, format_args!("({x}, {y}) r={radius}"));
            }
            DrawKind::Arc {
                rect,
                start_angle,
                sweep_angle,
                use_center,
            } => sink.line(
                level,
                name,
                format_args!(
                    "{rect:?} start={start_angle} sweep={sweep_angle} center={use_center}"
                ),
            ),
            DrawKind::Path { path } => sink.line(level, name, format_args!("{path:?}")),
            DrawKind::Lines { points } | DrawKind::Points { points } => {
                sink.line(level, name, format_args!("{} points", points.len()));
            }
            DrawKind::Text { run, x, y, length, .. } => sink.line(
                level,
                name,
                format_args!("{run:?} at ({x}, {y}) length={length}"),
            ),
            DrawKind::PosText { run, positions } => sink.line(
                level,
                name,
                format_args!("{run:?} {} positions", positions.len()),
            ),
            DrawKind::TextOnPath {
                run,
                path,
                h_offset,
                v_offset,
            } => sink.line(
                level,
                name,
                format_args!("{run:?} along {path:?} offset=({h_offset}, {v_offset})"),
            ),
            DrawKind::Functor { functor } => sink.line(level, name, format_args!("{functor:?}")),
            DrawKind::List { list, flags: replay } => {
                sink.line(
                    level,
                    name,
                    format_args!("{} ops, flags={replay:?}", list.op_count()),
                );
                if flags.contains(DumpFlags::RECURSE) {
                    list.output(sink, level + 1, flags);
                }
            }
            DrawKind::Layer { layer, x, y } => {
                sink.line(level, name, format_args!("{layer:?} at ({x}, {y})"));
            }
        }
    }
}

impl fmt::Debug for DrawOp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawOp")
            .field("kind", &self.kind)
            .field("paint", &self.paint)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

/// Axis-aligned bounds of a non-empty point set.
pub(crate) fn bounds_of_points(points: &[Point]) -> Rect {
    assert!(!points.is_empty(), "bounds of an empty point set");
    let first = points[0];
    let mut bounds = Rect::new(first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        bounds.x0 = bounds.x0.min(p.x);
        bounds.y0 = bounds.y0.min(p.y);
        bounds.x1 = bounds.x1.max(p.x);
        bounds.y1 = bounds.y1.max(p.y);
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::PaintStyle;

    #[test]
    fn stroke_grows_rect_bounds() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        let mut paint = Paint::default();
        paint.style = PaintStyle::Stroke;
        paint.stroke_width = 4.0;
        let op = DrawOp::new(DrawKind::Rect { rect }, Some(paint), Some(rect));
        assert_eq!(op.local_bounds(), Some(Rect::new(8.0, 8.0, 22.0, 22.0)));
    }

    #[test]
    fn fill_keeps_recorded_bounds() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        let op = DrawOp::new(DrawKind::Rect { rect }, Some(Paint::default()), Some(rect));
        assert_eq!(op.local_bounds(), Some(rect));
    }

    #[test]
    fn batch_ids_follow_paint() {
        let rect = Rect::new(0.0, 0.0, 1.0, 1.0);

        let plain = DrawOp::new(DrawKind::Rect { rect }, Some(Paint::default()), Some(rect));
        assert_eq!(plain.batch_id(), BatchId::Vertices);

        let mut aa = Paint::default();
        aa.anti_alias = true;
        let smooth = DrawOp::new(DrawKind::Rect { rect }, Some(aa), Some(rect));
        assert_eq!(smooth.batch_id(), BatchId::AlphaVertices);

        let mut dashed = Paint::default();
        dashed.path_effect = true;
        let effect = DrawOp::new(DrawKind::Rect { rect }, Some(dashed), Some(rect));
        assert_eq!(effect.batch_id(), BatchId::AlphaMaskTexture);
    }

    #[test]
    fn path_effect_outranks_antialiasing() {
        let rect = Rect::new(0.0, 0.0, 1.0, 1.0);
        let mut paint = Paint::default();
        paint.style = PaintStyle::Stroke;
        paint.path_effect = true;
        paint.anti_alias = true;
        let op = DrawOp::new(DrawKind::Rect { rect }, Some(paint), Some(rect));
        assert_eq!(op.batch_id(), BatchId::AlphaMaskTexture);
    }

    #[test]
    fn text_batch_splits_on_color() {
        let run = TextRun {
            key: crate::resource::ResourceKey(7),
            glyph_count: 4,
            byte_len: 4,
            ascent: 8.0,
            descent: 2.0,
        };
        let black = DrawOp::new(
            DrawKind::Text {
                run,
                x: 0.0,
                y: 10.0,
                length: 20.0,
                precache_transform: Cell::new(None),
            },
            Some(Paint::default()),
            Some(Rect::new(0.0, 2.0, 20.0, 12.0)),
        );
        assert_eq!(black.batch_id(), BatchId::Text);

        let mut red = Paint::default();
        red.color = Color(0xffff_0000);
        let tinted = DrawOp::new(
            DrawKind::Text {
                run,
                x: 0.0,
                y: 10.0,
                length: 20.0,
                precache_transform: Cell::new(None),
            },
            Some(red),
            Some(Rect::new(0.0, 2.0, 20.0, 12.0)),
        );
        assert_eq!(tinted.batch_id(), BatchId::ColorText);
    }

    #[test]
    fn point_bounds_fold() {
        let points = [
            Point::new(3.0, -1.0),
            Point::new(-2.0, 5.0),
            Point::new(0.0, 0.0),
        ];
        assert_eq!(bounds_of_points(&points), Rect::new(-2.0, -1.0, 3.0, 5.0));
    }

    #[test]
    fn single_point_bounds_are_degenerate() {
        let p = Point::new(4.0, -7.5);
        assert_eq!(bounds_of_points(&[p]), Rect::new(4.0, -7.5, 4.0, -7.5));
    }
}
