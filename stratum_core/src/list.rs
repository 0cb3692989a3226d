// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recorded display lists and the two execution drivers.
//!
//! A [`DisplayList`] is an append-only arena of operations: recording
//! pushes [`Op`]s into a contiguous backing store and hands back [`OpId`]
//! index handles. Individual removal does not exist, so an op's storage
//! lives exactly as long as its list; replacement of the parameters of a
//! few editable op kinds is provided instead (see the `replace_*`
//! methods).
//!
//! Execution walks the arena in recorded order through one of two
//! drivers: [`replay`](DisplayList::replay) issues every op straight into
//! the renderer, while [`defer`](DisplayList::defer) applies state
//! immediately but routes draws through a [`DeferTarget`] for batched
//! flushing.

use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use kurbo::{Affine, Point, Rect};

use crate::dump::{DumpFlags, DumpSink};
use crate::op::{bounds_of_points, DrawKind, DrawOp, Op, StateOp};
use crate::paint::{BlendMode, Color, Paint, TextAlign};
use crate::pass::{DeferContext, DeferTarget, ReplayContext, ReplayFlags};
use crate::renderer::{ClipMode, Renderer, SaveFlags};
use crate::resource::{
    BitmapHandle, ColorFilterKey, FunctorKey, LayerKey, PathHandle, RegionHandle, ShaderKey,
    TextRun,
};

/// Index handle to an operation inside one [`DisplayList`].
///
/// Valid only against the list that returned it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpId(u32);

impl OpId {
    /// The raw index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpId({})", self.0)
    }
}

/// An ordered recording of drawing operations over a fixed-size canvas.
///
/// The lifetime parameter covers nested lists referenced by composition
/// ops; a list without nesting can use `DisplayList<'static>`.
pub struct DisplayList<'a> {
    ops: Vec<Op<'a>>,
    width: f64,
    height: f64,
}

impl<'a> DisplayList<'a> {
    /// Creates an empty recording for a canvas of the given size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            ops: Vec::new(),
            width,
            height,
        }
    }

    /// Declared canvas width.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Declared canvas height.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Number of recorded operations.
    #[inline]
    #[must_use]
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Whether executing this list can have any effect. Composition ops
    /// query this before recursing.
    #[inline]
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        !self.ops.is_empty()
    }

    /// Returns the operation behind a handle.
    ///
    /// Panics if `id` did not come from this list.
    #[must_use]
    pub fn op(&self, id: OpId) -> &Op<'a> {
        &self.ops[id.0 as usize]
    }

    fn push(&mut self, op: Op<'a>) -> OpId {
        let id = OpId(u32::try_from(self.ops.len()).expect("op count exceeds u32"));
        self.ops.push(op);
        id
    }

    fn push_draw(&mut self, kind: DrawKind<'a>, paint: Option<Paint>, bounds: Option<Rect>) -> OpId {
        self.push(Op::Draw(DrawOp::new(kind, paint, bounds)))
    }

    // -- State recording --

    /// Records a scope push.
    pub fn save(&mut self, flags: SaveFlags) -> OpId {
        self.push(Op::State(StateOp::Save { flags }))
    }

    /// Records a scope pop to a canvas-convention depth (1 is the state at
    /// root-pass entry).
    pub fn restore_to_count(&mut self, count: u32) -> OpId {
        self.push(Op::State(StateOp::RestoreToCount { count }))
    }

    /// Records a layer save.
    pub fn save_layer(&mut self, area: Rect, alpha: u8, mode: BlendMode, flags: SaveFlags) -> OpId {
        self.push(Op::State(StateOp::SaveLayer {
            area,
            alpha,
            mode,
            flags,
        }))
    }

    /// Records a translation.
    pub fn translate(&mut self, dx: f64, dy: f64) -> OpId {
        self.push(Op::State(StateOp::Translate { dx, dy }))
    }

    /// Records a rotation in degrees.
    pub fn rotate(&mut self, degrees: f64) -> OpId {
        self.push(Op::State(StateOp::Rotate { degrees }))
    }

    /// Records a scale.
    pub fn scale(&mut self, sx: f64, sy: f64) -> OpId {
        self.push(Op::State(StateOp::Scale { sx, sy }))
    }

    /// Records a skew.
    pub fn skew(&mut self, sx: f64, sy: f64) -> OpId {
        self.push(Op::State(StateOp::Skew { sx, sy }))
    }

    /// Records a transform replacement.
    pub fn set_matrix(&mut self, matrix: Affine) -> OpId {
        self.push(Op::State(StateOp::SetMatrix { matrix }))
    }

    /// Records a transform concatenation.
    pub fn concat_matrix(&mut self, matrix: Affine) -> OpId {
        self.push(Op::State(StateOp::ConcatMatrix { matrix }))
    }

    /// Records a rectangle clip.
    pub fn clip_rect(&mut self, rect: Rect, mode: ClipMode) -> OpId {
        self.push(Op::State(StateOp::ClipRect { rect, mode }))
    }

    /// Records a path clip.
    pub fn clip_path(&mut self, path: PathHandle, mode: ClipMode) -> OpId {
        self.push(Op::State(StateOp::ClipPath { path, mode }))
    }

    /// Records a region clip.
    pub fn clip_region(&mut self, region: RegionHandle, mode: ClipMode) -> OpId {
        self.push(Op::State(StateOp::ClipRegion { region, mode }))
    }

    /// Records a shader bind.
    pub fn setup_shader(&mut self, shader: ShaderKey) -> OpId {
        self.push(Op::State(StateOp::SetupShader { shader }))
    }

    /// Records a shader unbind.
    pub fn reset_shader(&mut self) -> OpId {
        self.push(Op::State(StateOp::ResetShader))
    }

    /// Records a color-filter bind.
    pub fn setup_color_filter(&mut self, filter: ColorFilterKey) -> OpId {
        self.push(Op::State(StateOp::SetupColorFilter { filter }))
    }

    /// Records a color-filter unbind.
    pub fn reset_color_filter(&mut self) -> OpId {
        self.push(Op::State(StateOp::ResetColorFilter))
    }

    /// Records a drop-shadow setup.
    pub fn setup_shadow(&mut self, radius: f64, dx: f64, dy: f64, color: Color) -> OpId {
        self.push(Op::State(StateOp::SetupShadow {
            radius,
            dx,
            dy,
            color,
        }))
    }

    /// Records a drop-shadow clear.
    pub fn reset_shadow(&mut self) -> OpId {
        self.push(Op::State(StateOp::ResetShadow))
    }

    /// Records a paint-flag filter install.
    pub fn setup_paint_filter(&mut self, clear_bits: u32, set_bits: u32) -> OpId {
        self.push(Op::State(StateOp::SetupPaintFilter {
            clear_bits,
            set_bits,
        }))
    }

    /// Records a paint-flag filter removal.
    pub fn reset_paint_filter(&mut self) -> OpId {
        self.push(Op::State(StateOp::ResetPaintFilter))
    }

    // -- Parameter replacement --
    //
    // Editing tools may rewrite the parameters of a few op kinds in place.
    // Every field of the target op is overwritten. Each method panics when
    // the handle points at a different kind.

    /// Replaces the parameters of a recorded [`StateOp::Save`].
    pub fn replace_save(&mut self, id: OpId, flags: SaveFlags) {
        match &mut self.ops[id.0 as usize] {
            Op::State(op @ StateOp::Save { .. }) => *op = StateOp::Save { flags },
            other => panic!("replace_save on {}", other.name()),
        }
    }

    /// Replaces the parameters of a recorded [`StateOp::RestoreToCount`].
    pub fn replace_restore_to_count(&mut self, id: OpId, count: u32) {
        match &mut self.ops[id.0 as usize] {
            Op::State(op @ StateOp::RestoreToCount { .. }) => {
                *op = StateOp::RestoreToCount { count };
            }
            other => panic!("replace_restore_to_count on {}", other.name()),
        }
    }

    /// Replaces the parameters of a recorded [`StateOp::SaveLayer`].
    pub fn replace_save_layer(
        &mut self,
        id: OpId,
        area: Rect,
        alpha: u8,
        mode: BlendMode,
        flags: SaveFlags,
    ) {
        match &mut self.ops[id.0 as usize] {
            Op::State(op @ StateOp::SaveLayer { .. }) => {
                *op = StateOp::SaveLayer {
                    area,
                    alpha,
                    mode,
                    flags,
                };
            }
            other => panic!("replace_save_layer on {}", other.name()),
        }
    }

    /// Replaces the parameters of a recorded [`StateOp::ClipRect`].
    pub fn replace_clip_rect(&mut self, id: OpId, rect: Rect, mode: ClipMode) {
        match &mut self.ops[id.0 as usize] {
            Op::State(op @ StateOp::ClipRect { .. }) => *op = StateOp::ClipRect { rect, mode },
            other => panic!("replace_clip_rect on {}", other.name()),
        }
    }

    /// Stamps the quick-reject verdict on a draw op.
    ///
    /// Panics when `id` does not point at a draw.
    pub fn set_quick_rejected(&self, id: OpId, rejected: bool) {
        match &self.ops[id.0 as usize] {
            Op::Draw(op) => op.set_quick_rejected(rejected),
            other => panic!("set_quick_rejected on {}", other.name()),
        }
    }

    // -- Draw recording --

    /// Records a bitmap draw at `(left, top)`.
    pub fn draw_bitmap(
        &mut self,
        bitmap: BitmapHandle,
        left: f64,
        top: f64,
        paint: Option<Paint>,
    ) -> OpId {
        let bounds = Rect::new(left, top, left + bitmap.width, top + bitmap.height);
        self.push_draw(DrawKind::Bitmap { bitmap, left, top }, paint, Some(bounds))
    }

    /// Records a bitmap draw through an explicit transform.
    pub fn draw_bitmap_matrix(
        &mut self,
        bitmap: BitmapHandle,
        matrix: Affine,
        paint: Option<Paint>,
    ) -> OpId {
        let local = Rect::new(0.0, 0.0, bitmap.width, bitmap.height);
        let bounds = matrix.transform_rect_bbox(local);
        self.push_draw(DrawKind::BitmapMatrix { bitmap, matrix }, paint, Some(bounds))
    }

    /// Records a bitmap sub-rectangle draw into `dst`.
    pub fn draw_bitmap_rect(
        &mut self,
        bitmap: BitmapHandle,
        src: Rect,
        dst: Rect,
        paint: Option<Paint>,
    ) -> OpId {
        self.push_draw(DrawKind::BitmapRect { bitmap, src, dst }, paint, Some(dst))
    }

    /// Records a caller-owned-pixels bitmap draw at `(left, top)`.
    pub fn draw_bitmap_data(
        &mut self,
        bitmap: BitmapHandle,
        left: f64,
        top: f64,
        paint: Option<Paint>,
    ) -> OpId {
        let bounds = Rect::new(left, top, left + bitmap.width, top + bitmap.height);
        self.push_draw(DrawKind::BitmapData { bitmap, left, top }, paint, Some(bounds))
    }

    /// Records a bitmap mesh draw.
    ///
    /// Panics unless `vertices` holds `(mesh_width + 1) * (mesh_height +
    /// 1)` points.
    pub fn draw_bitmap_mesh(
        &mut self,
        bitmap: BitmapHandle,
        mesh_width: u32,
        mesh_height: u32,
        vertices: Vec<Point>,
        colors: Vec<Color>,
        paint: Option<Paint>,
    ) -> OpId {
        let expected = (mesh_width as usize + 1) * (mesh_height as usize + 1);
        assert_eq!(
            vertices.len(),
            expected,
            "mesh of {mesh_width}x{mesh_height} needs {expected} vertices"
        );
        let bounds = bounds_of_points(&vertices);
        self.push_draw(
            DrawKind::BitmapMesh {
                bitmap,
                mesh_width,
                mesh_height,
                vertices,
                colors,
            },
            paint,
            Some(bounds),
        )
    }

    /// Records a nine-patch draw stretched into `bounds`.
    pub fn draw_patch(
        &mut self,
        bitmap: BitmapHandle,
        x_divs: Vec<i32>,
        y_divs: Vec<i32>,
        colors: Vec<Color>,
        bounds: Rect,
        alpha: u8,
        mode: BlendMode,
    ) -> OpId {
        self.push_draw(
            DrawKind::Patch {
                bitmap,
                x_divs,
                y_divs,
                colors,
                alpha,
                mode,
            },
            None,
            Some(bounds),
        )
    }

    /// Records a solid-color fill of the clip. Unbounded.
    pub fn draw_color(&mut self, color: Color, mode: BlendMode) -> OpId {
        self.push_draw(DrawKind::Color { color, mode }, None, None)
    }

    /// Records a rectangle draw.
    pub fn draw_rect(&mut self, rect: Rect, paint: Paint) -> OpId {
        self.push_draw(DrawKind::Rect { rect }, Some(paint), Some(rect))
    }

    /// Records a multi-rectangle draw sharing one paint.
    ///
    /// Panics on an empty slice.
    pub fn draw_rects(&mut self, rects: Vec<Rect>, paint: Paint) -> OpId {
        assert!(!rects.is_empty(), "draw_rects with no rects");
        let bounds = rects[1..]
            .iter()
            .fold(rects[0], |acc, r| acc.union(*r));
        self.push_draw(DrawKind::Rects { rects }, Some(paint), Some(bounds))
    }

    /// Records a rounded-rectangle draw.
    pub fn draw_round_rect(&mut self, rect: Rect, rx: f64, ry: f64, paint: Paint) -> OpId {
        self.push_draw(DrawKind::RoundRect { rect, rx, ry }, Some(paint), Some(rect))
    }

    /// Records a circle draw.
    pub fn draw_circle(&mut self, x: f64, y: f64, radius: f64, paint: Paint) -> OpId {
        let bounds = Rect::new(x - radius, y - radius, x + radius, y + radius);
        self.push_draw(DrawKind::Circle { x, y, radius }, Some(paint), Some(bounds))
    }

    /// Records an oval draw.
    pub fn draw_oval(&mut self, rect: Rect, paint: Paint) -> OpId {
        self.push_draw(DrawKind::Oval { rect }, Some(paint), Some(rect))
    }

    /// Records an arc draw.
    pub fn draw_arc(
        &mut self,
        rect: Rect,
        start_angle: f64,
        sweep_angle: f64,
        use_center: bool,
        paint: Paint,
    ) -> OpId {
        self.push_draw(
            DrawKind::Arc {
                rect,
                start_angle,
                sweep_angle,
                use_center,
            },
            Some(paint),
            Some(rect),
        )
    }

    /// Records a path draw. The handle's bounds already cover stroke
    /// geometry, so no further outsetting happens at execution time.
    pub fn draw_path(&mut self, path: PathHandle, paint: Paint) -> OpId {
        self.push_draw(DrawKind::Path { path }, Some(paint), Some(path.bounds))
    }

    /// Records a line-segment draw; consecutive point pairs form segments.
    ///
    /// Panics on an empty slice. Stroke outsetting is folded into the
    /// recorded bounds here because the point fold is only available at
    /// record time.
    pub fn draw_lines(&mut self, points: Vec<Point>, paint: Paint) -> OpId {
        let outset = paint.stroke_outset();
        let bounds = bounds_of_points(&points).inflate(outset, outset);
        self.push_draw(DrawKind::Lines { points }, Some(paint), Some(bounds))
    }

    /// Records a point draw.
    ///
    /// Panics on an empty slice.
    pub fn draw_points(&mut self, points: Vec<Point>, paint: Paint) -> OpId {
        let outset = paint.stroke_outset();
        let bounds = bounds_of_points(&points).inflate(outset, outset);
        self.push_draw(DrawKind::Points { points }, Some(paint), Some(bounds))
    }

    /// Records a text draw at a baseline origin. The horizontal origin is
    /// alignment-adjusted here so execution never consults the alignment
    /// again.
    pub fn draw_text(&mut self, run: TextRun, x: f64, y: f64, length: f64, paint: Paint) -> OpId {
        let aligned_x = match paint.align {
            TextAlign::Left => x,
            TextAlign::Center => x - length / 2.0,
            TextAlign::Right => x - length,
        };
        let bounds = Rect::new(aligned_x, y - run.ascent, aligned_x + length, y + run.descent);
        self.push_draw(
            DrawKind::Text {
                run,
                x: aligned_x,
                y,
                length,
                precache_transform: Cell::new(None),
            },
            Some(paint),
            Some(bounds),
        )
    }

    /// Records a per-glyph-positioned text draw. Unbounded.
    pub fn draw_pos_text(&mut self, run: TextRun, positions: Vec<Point>, paint: Paint) -> OpId {
        self.push_draw(DrawKind::PosText { run, positions }, Some(paint), None)
    }

    /// Records a text-on-path draw. Unbounded.
    pub fn draw_text_on_path(
        &mut self,
        run: TextRun,
        path: PathHandle,
        h_offset: f64,
        v_offset: f64,
        paint: Paint,
    ) -> OpId {
        self.push_draw(
            DrawKind::TextOnPath {
                run,
                path,
                h_offset,
                v_offset,
            },
            Some(paint),
            None,
        )
    }

    /// Records an external draw callback. Unbounded.
    pub fn draw_functor(&mut self, functor: FunctorKey) -> OpId {
        self.push_draw(DrawKind::Functor { functor }, None, None)
    }

    /// Records a nested-list composition. Bounds are the nested list's
    /// declared size, fixed at record time.
    pub fn draw_list(&mut self, list: &'a DisplayList<'a>, flags: ReplayFlags) -> OpId {
        let bounds = Rect::new(0.0, 0.0, list.width(), list.height());
        self.push_draw(DrawKind::List { list, flags }, None, Some(bounds))
    }

    /// Records a pre-rendered layer composite. Unbounded; the layer's
    /// content size is owned by the layer cache, not the recording.
    pub fn draw_layer(&mut self, layer: LayerKey, x: f64, y: f64) -> OpId {
        self.push_draw(DrawKind::Layer { layer, x, y }, None, None)
    }

    // -- Execution --

    /// Replays every operation directly into the context's renderer.
    ///
    /// `level` is the nesting depth, for diagnostics only.
    pub fn replay<R: Renderer>(&self, ctx: &mut ReplayContext<'_, R>, level: usize) {
        for op in &self.ops {
            match op {
                Op::State(state) => state.apply_state(ctx.renderer, ctx.base_save_count),
                Op::Draw(draw) => {
                    if let DrawKind::List { list, flags } = draw.kind() {
                        if list.is_renderable() {
                            let outer = ctx.flags;
                            ctx.flags = *flags;
                            list.replay(ctx, level + 1);
                            ctx.flags = outer;
                        }
                        continue;
                    }
                    if draw.quick_rejected() && ctx.flags.contains(ReplayFlags::CLIP_CHILDREN) {
                        continue;
                    }
                    let status = draw.apply_draw(ctx.renderer, &mut ctx.dirty);
                    ctx.status |= status;
                }
            }
        }
    }

    /// Defers every operation: state applies immediately, draws route to
    /// the context's target for batched flushing.
    ///
    /// `level` is the nesting depth, for diagnostics only.
    pub fn defer<R, T>(&'a self, ctx: &mut DeferContext<'_, R, T>, level: usize)
    where
        R: Renderer,
        T: DeferTarget<'a, R>,
    {
        for op in &self.ops {
            match op {
                Op::State(state) => match *state {
                    StateOp::Save { flags } => {
                        let new_count = ctx.renderer.save(flags);
                        ctx.target.add_save(ctx.renderer, state, new_count);
                    }
                    StateOp::RestoreToCount { count } => {
                        let target_count = ctx.base_save_count + count;
                        ctx.target.add_restore_to_count(ctx.renderer, state, target_count);
                        ctx.renderer.restore_to_count(target_count);
                    }
                    StateOp::SaveLayer {
                        area,
                        alpha,
                        mode,
                        flags,
                    } => {
                        let count = ctx.renderer.save_count();
                        ctx.target.add_save_layer(ctx.renderer, state, count);
                        ctx.renderer.save_layer_deferred(area, alpha, mode, flags);
                    }
                    _ if state.is_clip() => {
                        // The target must see the clip that was active just
                        // before this op, so registration precedes apply.
                        ctx.target.add_clip(ctx.renderer, state);
                        state.apply_state(ctx.renderer, ctx.base_save_count);
                    }
                    _ => state.apply_state(ctx.renderer, ctx.base_save_count),
                },
                Op::Draw(draw) => {
                    if let DrawKind::List { list, flags } = draw.kind() {
                        if list.is_renderable() {
                            let outer = ctx.flags;
                            ctx.flags = *flags;
                            list.defer(ctx, level + 1);
                            ctx.flags = outer;
                        }
                        continue;
                    }
                    if draw.quick_rejected() && ctx.flags.contains(ReplayFlags::CLIP_CHILDREN) {
                        continue;
                    }
                    draw.set_deferred_state(crate::op::DeferredState {
                        bounds: draw.local_bounds().unwrap_or(Rect::ZERO),
                        matrix: ctx.renderer.current_matrix(),
                    });
                    ctx.target.add_draw_op(ctx.renderer, draw);
                    draw.on_deferred(ctx.renderer);
                }
            }
        }
    }

    /// Dumps every operation into `sink` at the given nesting level.
    pub fn output(&self, sink: &mut dyn DumpSink, level: usize, flags: DumpFlags) {
        for op in &self.ops {
            match op {
                Op::State(state) => state.output(sink, level),
                Op::Draw(draw) => draw.output(sink, level, flags),
            }
        }
    }
}

impl fmt::Debug for DisplayList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayList")
            .field("ops", &self.ops.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn bitmap() -> BitmapHandle {
        BitmapHandle {
            key: crate::resource::ResourceKey(1),
            width: 16.0,
            height: 8.0,
        }
    }

    #[test]
    fn records_in_order() {
        let mut list = DisplayList::new(100.0, 100.0);
        let save = list.save(SaveFlags::MATRIX_CLIP);
        let rect = list.draw_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Paint::default());
        let restore = list.restore_to_count(1);
        assert_eq!(list.op_count(), 3);
        assert_eq!(save.index(), 0);
        assert_eq!(rect.index(), 1);
        assert_eq!(restore.index(), 2);
        assert_eq!(list.op(rect).name(), "DrawRect");
    }

    #[test]
    fn empty_list_is_not_renderable() {
        let list = DisplayList::new(100.0, 100.0);
        assert!(!list.is_renderable());
        let mut list = list;
        list.translate(1.0, 2.0);
        assert!(list.is_renderable());
    }

    #[test]
    fn bitmap_bounds_from_handle_size() {
        let mut list = DisplayList::new(100.0, 100.0);
        let id = list.draw_bitmap(bitmap(), 5.0, 7.0, None);
        let Op::Draw(op) = list.op(id) else {
            panic!("expected draw")
        };
        assert_eq!(op.local_bounds(), Some(Rect::new(5.0, 7.0, 21.0, 15.0)));
    }

    #[test]
    fn bitmap_matrix_bounds_are_transformed() {
        let mut list = DisplayList::new(100.0, 100.0);
        let id = list.draw_bitmap_matrix(bitmap(), Affine::translate((10.0, 20.0)), None);
        let Op::Draw(op) = list.op(id) else {
            panic!("expected draw")
        };
        assert_eq!(op.local_bounds(), Some(Rect::new(10.0, 20.0, 26.0, 28.0)));
    }

    #[test]
    fn lines_bounds_include_stroke() {
        let mut list = DisplayList::new(100.0, 100.0);
        let mut paint = Paint::default();
        paint.stroke_width = 2.0;
        let id = list.draw_lines(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            paint,
        );
        let Op::Draw(op) = list.op(id) else {
            panic!("expected draw")
        };
        assert_eq!(op.local_bounds(), Some(Rect::new(-1.0, -1.0, 11.0, 1.0)));
    }

    #[test]
    fn center_aligned_text_shifts_origin() {
        let mut list = DisplayList::new(100.0, 100.0);
        let run = TextRun {
            key: crate::resource::ResourceKey(9),
            glyph_count: 4,
            byte_len: 4,
            ascent: 8.0,
            descent: 2.0,
        };
        let mut paint = Paint::default();
        paint.align = TextAlign::Center;
        let id = list.draw_text(run, 50.0, 20.0, 30.0, paint);
        let Op::Draw(op) = list.op(id) else {
            panic!("expected draw")
        };
        assert_eq!(op.local_bounds(), Some(Rect::new(35.0, 12.0, 65.0, 22.0)));
    }

    #[test]
    fn unbounded_ops_report_none() {
        let mut list = DisplayList::new(100.0, 100.0);
        let id = list.draw_color(Color(0xff12_3456), BlendMode::SourceOver);
        let Op::Draw(op) = list.op(id) else {
            panic!("expected draw")
        };
        assert_eq!(op.local_bounds(), None);
    }

    #[test]
    fn replace_clip_rect_overwrites_all_fields() {
        let mut list = DisplayList::new(100.0, 100.0);
        let id = list.clip_rect(Rect::new(0.0, 0.0, 1.0, 1.0), ClipMode::Intersect);
        list.replace_clip_rect(id, Rect::new(5.0, 5.0, 9.0, 9.0), ClipMode::Replace);
        let Op::State(StateOp::ClipRect { rect, mode }) = list.op(id) else {
            panic!("expected clip rect")
        };
        assert_eq!(*rect, Rect::new(5.0, 5.0, 9.0, 9.0));
        assert_eq!(*mode, ClipMode::Replace);
    }

    #[test]
    #[should_panic(expected = "replace_save on Translate")]
    fn replace_save_rejects_other_kinds() {
        let mut list = DisplayList::new(100.0, 100.0);
        let id = list.translate(1.0, 1.0);
        list.replace_save(id, SaveFlags::MATRIX);
    }

    #[test]
    #[should_panic(expected = "set_quick_rejected on Save")]
    fn quick_reject_requires_a_draw() {
        let mut list = DisplayList::new(100.0, 100.0);
        let id = list.save(SaveFlags::MATRIX_CLIP);
        list.set_quick_rejected(id, true);
    }

    #[test]
    #[should_panic(expected = "needs")]
    fn mesh_vertex_count_is_checked() {
        let mut list = DisplayList::new(100.0, 100.0);
        list.draw_bitmap_mesh(bitmap(), 2, 2, vec![Point::ZERO; 4], vec![], None);
    }
}
