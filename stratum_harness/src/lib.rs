// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spy renderer and deferral target for exercising stratum end to end.
//!
//! [`SpyRenderer`] implements [`Renderer`] by logging every call into a
//! [`Call`] vector while maintaining a real save stack and transform, so
//! tests can assert both the exact call sequence and the state the engine
//! left behind. [`CollectingTarget`] implements
//! [`DeferTarget`](stratum_core::pass::DeferTarget) by recording what the
//! deferred pass hands it, without flushing anything.

#![no_std]

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect};

use stratum_core::op::{DrawOp, StateOp};
use stratum_core::paint::{BlendMode, Color, Paint};
use stratum_core::pass::DeferTarget;
use stratum_core::renderer::{ClipMode, DrawStatus, Renderer, SaveFlags};
use stratum_core::resource::{
    BitmapHandle, ColorFilterKey, FunctorKey, LayerKey, PathHandle, RegionHandle, ShaderKey,
    TextRun,
};

/// One renderer invocation, as logged by [`SpyRenderer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Call {
    /// `save` with its flags.
    Save(SaveFlags),
    /// `restore`.
    Restore,
    /// `restore_to_count` with its absolute target.
    RestoreToCount(u32),
    /// `save_layer` with its area and alpha.
    SaveLayer(Rect, u8),
    /// `save_layer_deferred` with its area and alpha.
    SaveLayerDeferred(Rect, u8),
    /// `translate`.
    Translate(f64, f64),
    /// `rotate`.
    Rotate(f64),
    /// `scale`.
    Scale(f64, f64),
    /// `skew`.
    Skew(f64, f64),
    /// `set_matrix`.
    SetMatrix(Affine),
    /// `concat_matrix`.
    ConcatMatrix(Affine),
    /// `clip_rect`.
    ClipRect(Rect, ClipMode),
    /// `clip_path`.
    ClipPath(PathHandle, ClipMode),
    /// `clip_region`.
    ClipRegion(RegionHandle, ClipMode),
    /// `setup_shader`.
    SetupShader(ShaderKey),
    /// `reset_shader`.
    ResetShader,
    /// `setup_color_filter`.
    SetupColorFilter(ColorFilterKey),
    /// `reset_color_filter`.
    ResetColorFilter,
    /// `setup_shadow` with its radius.
    SetupShadow(f64),
    /// `reset_shadow`.
    ResetShadow,
    /// `setup_paint_filter`.
    SetupPaintFilter(u32, u32),
    /// `reset_paint_filter`.
    ResetPaintFilter,
    /// `draw_bitmap`.
    DrawBitmap(BitmapHandle),
    /// `draw_bitmap_matrix`.
    DrawBitmapMatrix(BitmapHandle),
    /// `draw_bitmap_rect`.
    DrawBitmapRect(BitmapHandle),
    /// `draw_bitmap_data`.
    DrawBitmapData(BitmapHandle),
    /// `draw_bitmap_mesh` with its vertex count.
    DrawBitmapMesh(usize),
    /// `draw_patch`.
    DrawPatch(BitmapHandle),
    /// `draw_color`.
    DrawColor(Color, BlendMode),
    /// `draw_rect`.
    DrawRect(Rect),
    /// `draw_rects` with its rect count.
    DrawRects(usize),
    /// `draw_round_rect`.
    DrawRoundRect(Rect),
    /// `draw_circle`.
    DrawCircle(f64, f64, f64),
    /// `draw_oval`.
    DrawOval(Rect),
    /// `draw_arc`.
    DrawArc(Rect),
    /// `draw_path`.
    DrawPath(PathHandle),
    /// `draw_lines` with its point count.
    DrawLines(usize),
    /// `draw_points` with its point count.
    DrawPoints(usize),
    /// `draw_text`.
    DrawText(TextRun),
    /// `draw_pos_text`.
    DrawPosText(TextRun),
    /// `draw_text_on_path`.
    DrawTextOnPath(TextRun),
    /// `call_functor`.
    CallFunctor(FunctorKey),
    /// `draw_layer`.
    DrawLayer(LayerKey),
    /// `precache_path`.
    PrecachePath(PathHandle),
    /// `precache_text`.
    PrecacheText(TextRun),
    /// `start_mark`.
    StartMark,
    /// `end_mark`.
    EndMark,
}

impl Call {
    /// Whether this call issues draw work.
    #[must_use]
    pub const fn is_draw(&self) -> bool {
        matches!(
            self,
            Self::DrawBitmap(_)
                | Self::DrawBitmapMatrix(_)
                | Self::DrawBitmapRect(_)
                | Self::DrawBitmapData(_)
                | Self::DrawBitmapMesh(_)
                | Self::DrawPatch(_)
                | Self::DrawColor(..)
                | Self::DrawRect(_)
                | Self::DrawRects(_)
                | Self::DrawRoundRect(_)
                | Self::DrawCircle(..)
                | Self::DrawOval(_)
                | Self::DrawArc(_)
                | Self::DrawPath(_)
                | Self::DrawLines(_)
                | Self::DrawPoints(_)
                | Self::DrawText(_)
                | Self::DrawPosText(_)
                | Self::DrawTextOnPath(_)
                | Self::CallFunctor(_)
                | Self::DrawLayer(_)
        )
    }
}

/// A [`Renderer`] that logs every call and models the save stack.
///
/// The save stack holds one transform per depth; `save` duplicates the
/// top, the restores truncate. Clips are logged but not evaluated, since
/// quick rejection is an external pass in this engine.
#[derive(Debug)]
pub struct SpyRenderer {
    calls: Vec<Call>,
    stack: Vec<Affine>,
}

impl Default for SpyRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpyRenderer {
    /// Creates a spy at the canvas ground state (depth 1, identity).
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            stack: vec![Affine::IDENTITY],
        }
    }

    /// Every call logged so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Number of logged calls that issue draw work.
    #[must_use]
    pub fn draw_call_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_draw()).count()
    }

    fn top(&mut self) -> &mut Affine {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn concat(&mut self, m: Affine) {
        let top = self.top();
        *top = *top * m;
    }

    fn drew(&mut self, call: Call) -> DrawStatus {
        self.calls.push(call);
        DrawStatus::DREW
    }
}

impl Renderer for SpyRenderer {
    fn save(&mut self, flags: SaveFlags) -> u32 {
        self.calls.push(Call::Save(flags));
        let top = *self.top();
        self.stack.push(top);
        self.save_count()
    }

    fn restore(&mut self) {
        self.calls.push(Call::Restore);
        if self.stack.len() > 1 {
            let _ = self.stack.pop();
        }
    }

    fn restore_to_count(&mut self, count: u32) {
        self.calls.push(Call::RestoreToCount(count));
        let depth = (count.max(1)) as usize;
        self.stack.truncate(depth);
    }

    fn save_count(&self) -> u32 {
        u32::try_from(self.stack.len()).unwrap_or(u32::MAX)
    }

    fn save_layer(&mut self, area: Rect, alpha: u8, _mode: BlendMode, _flags: SaveFlags) -> u32 {
        self.calls.push(Call::SaveLayer(area, alpha));
        let top = *self.top();
        self.stack.push(top);
        self.save_count()
    }

    fn save_layer_deferred(
        &mut self,
        area: Rect,
        alpha: u8,
        _mode: BlendMode,
        _flags: SaveFlags,
    ) -> u32 {
        self.calls.push(Call::SaveLayerDeferred(area, alpha));
        let top = *self.top();
        self.stack.push(top);
        self.save_count()
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.calls.push(Call::Translate(dx, dy));
        self.concat(Affine::translate((dx, dy)));
    }

    fn rotate(&mut self, degrees: f64) {
        self.calls.push(Call::Rotate(degrees));
        self.concat(Affine::rotate(degrees.to_radians()));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.calls.push(Call::Scale(sx, sy));
        self.concat(Affine::scale_non_uniform(sx, sy));
    }

    fn skew(&mut self, sx: f64, sy: f64) {
        self.calls.push(Call::Skew(sx, sy));
        self.concat(Affine::skew(sx, sy));
    }

    fn set_matrix(&mut self, matrix: Affine) {
        self.calls.push(Call::SetMatrix(matrix));
        *self.top() = matrix;
    }

    fn concat_matrix(&mut self, matrix: Affine) {
        self.calls.push(Call::ConcatMatrix(matrix));
        self.concat(matrix);
    }

    fn current_matrix(&self) -> Affine {
        self.stack[self.stack.len() - 1]
    }

    fn clip_rect(&mut self, rect: Rect, mode: ClipMode) {
        self.calls.push(Call::ClipRect(rect, mode));
    }

    fn clip_path(&mut self, path: PathHandle, mode: ClipMode) {
        self.calls.push(Call::ClipPath(path, mode));
    }

    fn clip_region(&mut self, region: RegionHandle, mode: ClipMode) {
        self.calls.push(Call::ClipRegion(region, mode));
    }

    fn setup_shader(&mut self, shader: ShaderKey) {
        self.calls.push(Call::SetupShader(shader));
    }

    fn reset_shader(&mut self) {
        self.calls.push(Call::ResetShader);
    }

    fn setup_color_filter(&mut self, filter: ColorFilterKey) {
        self.calls.push(Call::SetupColorFilter(filter));
    }

    fn reset_color_filter(&mut self) {
        self.calls.push(Call::ResetColorFilter);
    }

    fn setup_shadow(&mut self, radius: f64, _dx: f64, _dy: f64, _color: Color) {
        self.calls.push(Call::SetupShadow(radius));
    }

    fn reset_shadow(&mut self) {
        self.calls.push(Call::ResetShadow);
    }

    fn setup_paint_filter(&mut self, clear_bits: u32, set_bits: u32) {
        self.calls.push(Call::SetupPaintFilter(clear_bits, set_bits));
    }

    fn reset_paint_filter(&mut self) {
        self.calls.push(Call::ResetPaintFilter);
    }

    fn draw_bitmap(
        &mut self,
        bitmap: BitmapHandle,
        _left: f64,
        _top: f64,
        _paint: Option<&Paint>,
    ) -> DrawStatus {
        self.drew(Call::DrawBitmap(bitmap))
    }

    fn draw_bitmap_matrix(
        &mut self,
        bitmap: BitmapHandle,
        _matrix: Affine,
        _paint: Option<&Paint>,
    ) -> DrawStatus {
        self.drew(Call::DrawBitmapMatrix(bitmap))
    }

    fn draw_bitmap_rect(
        &mut self,
        bitmap: BitmapHandle,
        _src: Rect,
        _dst: Rect,
        _paint: Option<&Paint>,
    ) -> DrawStatus {
        self.drew(Call::DrawBitmapRect(bitmap))
    }

    fn draw_bitmap_data(
        &mut self,
        bitmap: BitmapHandle,
        _left: f64,
        _top: f64,
        _paint: Option<&Paint>,
    ) -> DrawStatus {
        self.drew(Call::DrawBitmapData(bitmap))
    }

    fn draw_bitmap_mesh(
        &mut self,
        _bitmap: BitmapHandle,
        _mesh_width: u32,
        _mesh_height: u32,
        vertices: &[Point],
        _colors: &[Color],
        _paint: Option<&Paint>,
    ) -> DrawStatus {
        self.drew(Call::DrawBitmapMesh(vertices.len()))
    }

    fn draw_patch(
        &mut self,
        bitmap: BitmapHandle,
        _x_divs: &[i32],
        _y_divs: &[i32],
        _colors: &[Color],
        _bounds: Rect,
        _alpha: u8,
        _mode: BlendMode,
    ) -> DrawStatus {
        self.drew(Call::DrawPatch(bitmap))
    }

    fn draw_color(&mut self, color: Color, mode: BlendMode) -> DrawStatus {
        self.drew(Call::DrawColor(color, mode))
    }

    fn draw_rect(&mut self, rect: Rect, _paint: Option<&Paint>) -> DrawStatus {
        self.drew(Call::DrawRect(rect))
    }

    fn draw_rects(&mut self, rects: &[Rect], _paint: Option<&Paint>) -> DrawStatus {
        self.drew(Call::DrawRects(rects.len()))
    }

    fn draw_round_rect(
        &mut self,
        rect: Rect,
        _rx: f64,
        _ry: f64,
        _paint: Option<&Paint>,
    ) -> DrawStatus {
        self.drew(Call::DrawRoundRect(rect))
    }

    fn draw_circle(&mut self, x: f64, y: f64, radius: f64, _paint: Option<&Paint>) -> DrawStatus {
        self.drew(Call::DrawCircle(x, y, radius))
    }

    fn draw_oval(&mut self, rect: Rect, _paint: Option<&Paint>) -> DrawStatus {
        self.drew(Call::DrawOval(rect))
    }

    fn draw_arc(
        &mut self,
        rect: Rect,
        _start_angle: f64,
        _sweep_angle: f64,
        _use_center: bool,
        _paint: Option<&Paint>,
    ) -> DrawStatus {
        self.drew(Call::DrawArc(rect))
    }

    fn draw_path(&mut self, path: PathHandle, _paint: Option<&Paint>) -> DrawStatus {
        self.drew(Call::DrawPath(path))
    }

    fn draw_lines(&mut self, points: &[Point], _paint: Option<&Paint>) -> DrawStatus {
        self.drew(Call::DrawLines(points.len()))
    }

    fn draw_points(&mut self, points: &[Point], _paint: Option<&Paint>) -> DrawStatus {
        self.drew(Call::DrawPoints(points.len()))
    }

    fn draw_text(
        &mut self,
        run: TextRun,
        _x: f64,
        _y: f64,
        _length: f64,
        _paint: Option<&Paint>,
    ) -> DrawStatus {
        self.drew(Call::DrawText(run))
    }

    fn draw_pos_text(
        &mut self,
        run: TextRun,
        _positions: &[Point],
        _paint: Option<&Paint>,
    ) -> DrawStatus {
        self.drew(Call::DrawPosText(run))
    }

    fn draw_text_on_path(
        &mut self,
        run: TextRun,
        _path: PathHandle,
        _h_offset: f64,
        _v_offset: f64,
        _paint: Option<&Paint>,
    ) -> DrawStatus {
        self.drew(Call::DrawTextOnPath(run))
    }

    fn call_functor(&mut self, functor: FunctorKey, dirty: &mut Rect) -> DrawStatus {
        self.calls.push(Call::CallFunctor(functor));
        *dirty = dirty.union(Rect::new(0.0, 0.0, 1.0, 1.0));
        DrawStatus::INVOKED
    }

    fn draw_layer(&mut self, layer: LayerKey, _x: f64, _y: f64) -> DrawStatus {
        self.drew(Call::DrawLayer(layer))
    }

    fn precache_text(&mut self, run: TextRun, _paint: Option<&Paint>, _transform: Affine) {
        self.calls.push(Call::PrecacheText(run));
    }

    fn precache_path(&mut self, path: PathHandle, _paint: Option<&Paint>) {
        self.calls.push(Call::PrecachePath(path));
    }

    fn start_mark(&mut self, _label: &str) {
        self.calls.push(Call::StartMark);
    }

    fn end_mark(&mut self) {
        self.calls.push(Call::EndMark);
    }
}

/// One registration received from the deferred pass.
#[derive(Debug)]
pub enum Deferred<'a> {
    /// A scope push, with the depth the renderer reported.
    Save(&'a StateOp, u32),
    /// A scope pop, with its resolved absolute target.
    RestoreToCount(&'a StateOp, u32),
    /// A layer save, with the depth before the save.
    SaveLayer(&'a StateOp, u32),
    /// A clip, registered before it applied.
    Clip(&'a StateOp),
    /// A buffered draw.
    Draw(&'a DrawOp<'a>),
}

/// A [`DeferTarget`] that records registrations without flushing.
#[derive(Debug, Default)]
pub struct CollectingTarget<'a> {
    records: Vec<Deferred<'a>>,
}

impl<'a> CollectingTarget<'a> {
    /// Creates an empty target.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every registration received so far, in order.
    #[must_use]
    pub fn records(&self) -> &[Deferred<'a>] {
        &self.records
    }

    /// Number of buffered draws.
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r, Deferred::Draw(_)))
            .count()
    }

    /// Number of registered clips.
    #[must_use]
    pub fn clip_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r, Deferred::Clip(_)))
            .count()
    }
}

impl<'a, R: Renderer> DeferTarget<'a, R> for CollectingTarget<'a> {
    fn add_save(&mut self, _renderer: &mut R, op: &'a StateOp, new_save_count: u32) {
        self.records.push(Deferred::Save(op, new_save_count));
    }

    fn add_restore_to_count(&mut self, _renderer: &mut R, op: &'a StateOp, save_count: u32) {
        self.records.push(Deferred::RestoreToCount(op, save_count));
    }

    fn add_save_layer(&mut self, _renderer: &mut R, op: &'a StateOp, save_count: u32) {
        self.records.push(Deferred::SaveLayer(op, save_count));
    }

    fn add_clip(&mut self, _renderer: &mut R, op: &'a StateOp) {
        self.records.push(Deferred::Clip(op));
    }

    fn add_draw_op(&mut self, _renderer: &mut R, op: &'a DrawOp<'a>) {
        self.records.push(Deferred::Draw(op));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    use stratum_core::batch::BatchId;
    use stratum_core::list::DisplayList;
    use stratum_core::op::Op;
    use stratum_core::paint::{BlendMode, Color, Paint};
    use stratum_core::pass::{DeferContext, ReplayContext, ReplayFlags};
    use stratum_core::resource::ResourceKey;

    fn rect_paint() -> Paint {
        Paint::default()
    }

    fn path_handle(key: u64) -> PathHandle {
        PathHandle {
            key: ResourceKey(key),
            bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
        }
    }

    fn text_run(key: u64) -> TextRun {
        TextRun {
            key: ResourceKey(key),
            glyph_count: 5,
            byte_len: 5,
            ascent: 8.0,
            descent: 2.0,
        }
    }

    #[test]
    fn replay_issues_calls_in_program_order() {
        let mut list = DisplayList::new(100.0, 100.0);
        list.save(SaveFlags::MATRIX_CLIP);
        list.translate(10.0, 20.0);
        list.draw_rect(Rect::new(0.0, 0.0, 50.0, 50.0), rect_paint());
        list.restore_to_count(1);

        let mut spy = SpyRenderer::new();
        let mut ctx = ReplayContext::new(&mut spy, ReplayFlags::default());
        list.replay(&mut ctx, 0);
        assert!(ctx.status().contains(DrawStatus::DREW));

        assert_eq!(
            spy.calls(),
            [
                Call::Save(SaveFlags::MATRIX_CLIP),
                Call::Translate(10.0, 20.0),
                Call::DrawRect(Rect::new(0.0, 0.0, 50.0, 50.0)),
                Call::RestoreToCount(1),
            ]
        );
        assert_eq!(spy.save_count(), 1);
    }

    #[test]
    fn restore_targets_follow_an_ambient_save() {
        let mut list = DisplayList::new(100.0, 100.0);
        list.save(SaveFlags::MATRIX_CLIP);
        list.restore_to_count(1);

        let mut spy = SpyRenderer::new();
        let _ = spy.save(SaveFlags::MATRIX_CLIP);
        let mut ctx = ReplayContext::new(&mut spy, ReplayFlags::default());
        list.replay(&mut ctx, 0);

        // Baseline is depth 2, so the recorded depth-1 target resolves to 2
        // and the caller's ambient save survives.
        assert_eq!(spy.calls()[2], Call::RestoreToCount(2));
        assert_eq!(spy.save_count(), 2);
    }

    #[test]
    fn defer_registers_clip_but_skips_rejected_draw() {
        let mut list = DisplayList::new(100.0, 100.0);
        list.clip_rect(Rect::new(0.0, 0.0, 20.0, 20.0), ClipMode::Intersect);
        let rect = list.draw_rect(Rect::new(500.0, 500.0, 600.0, 600.0), rect_paint());
        list.set_quick_rejected(rect, true);

        let mut spy = SpyRenderer::new();
        let mut target = CollectingTarget::new();
        let mut ctx = DeferContext::new(&mut spy, &mut target, ReplayFlags::default());
        list.defer(&mut ctx, 0);

        assert_eq!(target.clip_count(), 1);
        assert_eq!(target.draw_count(), 0);
        assert_eq!(
            spy.calls(),
            [Call::ClipRect(
                Rect::new(0.0, 0.0, 20.0, 20.0),
                ClipMode::Intersect
            )]
        );
        assert_eq!(spy.draw_call_count(), 0);
    }

    #[test]
    fn rejected_draw_executes_when_clipping_is_off() {
        let mut list = DisplayList::new(100.0, 100.0);
        let rect = list.draw_rect(Rect::new(500.0, 500.0, 600.0, 600.0), rect_paint());
        list.set_quick_rejected(rect, true);

        let mut spy = SpyRenderer::new();
        let mut ctx = ReplayContext::new(&mut spy, ReplayFlags::NONE);
        list.replay(&mut ctx, 0);
        assert_eq!(spy.draw_call_count(), 1);
    }

    #[test]
    fn replay_skips_rejected_draw_entirely() {
        let mut list = DisplayList::new(100.0, 100.0);
        let rect = list.draw_rect(Rect::new(500.0, 500.0, 600.0, 600.0), rect_paint());
        list.set_quick_rejected(rect, true);

        let mut spy = SpyRenderer::new();
        let mut ctx = ReplayContext::new(&mut spy, ReplayFlags::default());
        list.replay(&mut ctx, 0);
        assert!(ctx.status().is_done());
        assert!(spy.calls().is_empty());
    }

    #[test]
    fn replay_is_deterministic() {
        let mut list = DisplayList::new(100.0, 100.0);
        list.save(SaveFlags::MATRIX);
        list.rotate(30.0);
        list.draw_circle(10.0, 10.0, 5.0, rect_paint());
        list.draw_color(Color(0x80ff_0000), BlendMode::SourceOver);
        list.restore_to_count(1);

        let mut first = SpyRenderer::new();
        let mut ctx = ReplayContext::new(&mut first, ReplayFlags::default());
        list.replay(&mut ctx, 0);

        let mut second = SpyRenderer::new();
        let mut ctx = ReplayContext::new(&mut second, ReplayFlags::default());
        list.replay(&mut ctx, 0);

        assert_eq!(first.calls(), second.calls());
    }

    #[test]
    fn batch_ids_separate_interposed_kinds() {
        let mut list = DisplayList::new(100.0, 100.0);
        let a = list.draw_rect(Rect::new(0.0, 0.0, 10.0, 10.0), rect_paint());
        let t = list.draw_text(text_run(1), 0.0, 50.0, 25.0, rect_paint());
        let b = list.draw_rect(Rect::new(20.0, 0.0, 30.0, 10.0), rect_paint());

        let batch_of = |id| match list.op(id) {
            Op::Draw(op) => op.batch_id(),
            Op::State(_) => panic!("expected draw"),
        };
        assert_eq!(batch_of(a), batch_of(b));
        assert_eq!(batch_of(a), BatchId::Vertices);
        assert_eq!(batch_of(t), BatchId::Text);
        assert_ne!(batch_of(a), batch_of(t));
    }

    #[test]
    fn defer_stamps_snapshot_and_buffers_draws() {
        let mut list = DisplayList::new(100.0, 100.0);
        list.translate(5.0, 5.0);
        let id = list.draw_rect(Rect::new(0.0, 0.0, 10.0, 10.0), rect_paint());

        let mut spy = SpyRenderer::new();
        let mut target = CollectingTarget::new();
        let mut ctx = DeferContext::new(&mut spy, &mut target, ReplayFlags::default());
        list.defer(&mut ctx, 0);

        assert_eq!(target.draw_count(), 1);
        // No draw reached the renderer during the pass.
        assert_eq!(spy.draw_call_count(), 0);

        let Op::Draw(op) = list.op(id) else {
            panic!("expected draw")
        };
        let state = op.deferred_state();
        assert_eq!(state.bounds, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(state.matrix, Affine::translate((5.0, 5.0)));
    }

    #[test]
    fn save_layer_defers_to_placeholder() {
        let mut list = DisplayList::new(100.0, 100.0);
        let area = Rect::new(0.0, 0.0, 50.0, 50.0);
        list.save_layer(area, 128, BlendMode::SourceOver, SaveFlags::MATRIX_CLIP);
        list.draw_rect(Rect::new(0.0, 0.0, 10.0, 10.0), rect_paint());
        list.restore_to_count(1);

        let mut spy = SpyRenderer::new();
        let mut target = CollectingTarget::new();
        let mut ctx = DeferContext::new(&mut spy, &mut target, ReplayFlags::default());
        list.defer(&mut ctx, 0);

        assert!(spy.calls().contains(&Call::SaveLayerDeferred(area, 128)));
        assert!(!spy.calls().iter().any(|c| matches!(c, Call::SaveLayer(..))));
        let save_layers = target
            .records()
            .iter()
            .filter(|r| matches!(r, Deferred::SaveLayer(_, 1)))
            .count();
        assert_eq!(save_layers, 1);
    }

    #[test]
    fn defer_threads_save_counts() {
        let mut list = DisplayList::new(100.0, 100.0);
        list.save(SaveFlags::MATRIX_CLIP);
        list.draw_rect(Rect::new(0.0, 0.0, 10.0, 10.0), rect_paint());
        list.restore_to_count(1);

        let mut spy = SpyRenderer::new();
        let mut target = CollectingTarget::new();
        let mut ctx = DeferContext::new(&mut spy, &mut target, ReplayFlags::default());
        list.defer(&mut ctx, 0);

        assert!(matches!(target.records()[0], Deferred::Save(_, 2)));
        assert!(matches!(target.records()[2], Deferred::RestoreToCount(_, 1)));
        assert_eq!(spy.save_count(), 1);
    }

    #[test]
    fn nested_lists_recurse_under_root_baseline() {
        let mut inner = DisplayList::new(50.0, 50.0);
        inner.save(SaveFlags::MATRIX);
        inner.translate(1.0, 1.0);
        inner.draw_rect(Rect::new(0.0, 0.0, 5.0, 5.0), rect_paint());
        inner.restore_to_count(2);

        let mut outer = DisplayList::new(100.0, 100.0);
        outer.save(SaveFlags::MATRIX_CLIP);
        outer.draw_list(&inner, ReplayFlags::default());
        outer.restore_to_count(1);

        let mut spy = SpyRenderer::new();
        let mut ctx = ReplayContext::new(&mut spy, ReplayFlags::default());
        outer.replay(&mut ctx, 0);

        assert_eq!(
            spy.calls(),
            [
                Call::Save(SaveFlags::MATRIX_CLIP),
                Call::Save(SaveFlags::MATRIX),
                Call::Translate(1.0, 1.0),
                Call::DrawRect(Rect::new(0.0, 0.0, 5.0, 5.0)),
                Call::RestoreToCount(2),
                Call::RestoreToCount(1),
            ]
        );
        assert_eq!(spy.save_count(), 1);
    }

    #[test]
    fn nested_list_flags_govern_the_nested_walk() {
        let mut inner = DisplayList::new(50.0, 50.0);
        let rejected = inner.draw_rect(Rect::new(500.0, 500.0, 600.0, 600.0), rect_paint());
        inner.set_quick_rejected(rejected, true);

        let mut outer = DisplayList::new(100.0, 100.0);
        outer.draw_list(&inner, ReplayFlags::NONE);

        // The composition op suppresses clipping, so the rejected draw
        // still executes even though the pass itself clips children.
        let mut spy = SpyRenderer::new();
        let mut ctx = ReplayContext::new(&mut spy, ReplayFlags::default());
        outer.replay(&mut ctx, 0);
        assert_eq!(spy.draw_call_count(), 1);

        // The suppression ends with the nested walk: a rejected draw after
        // the composition op is still skipped.
        let sibling = outer.draw_rect(Rect::new(500.0, 500.0, 600.0, 600.0), rect_paint());
        outer.set_quick_rejected(sibling, true);
        let mut spy = SpyRenderer::new();
        let mut ctx = ReplayContext::new(&mut spy, ReplayFlags::default());
        outer.replay(&mut ctx, 0);
        assert_eq!(spy.draw_call_count(), 1);
    }

    #[test]
    fn empty_nested_list_is_skipped() {
        let inner = DisplayList::new(50.0, 50.0);
        let mut outer = DisplayList::new(100.0, 100.0);
        outer.draw_list(&inner, ReplayFlags::default());

        let mut spy = SpyRenderer::new();
        let mut ctx = ReplayContext::new(&mut spy, ReplayFlags::default());
        outer.replay(&mut ctx, 0);
        let status = ctx.status();
        assert!(spy.calls().is_empty());
        assert!(status.is_done());
    }

    #[test]
    fn functor_reports_invoked_and_damage() {
        let mut list = DisplayList::new(100.0, 100.0);
        list.draw_functor(FunctorKey(3));

        let mut spy = SpyRenderer::new();
        let mut ctx = ReplayContext::new(&mut spy, ReplayFlags::default());
        list.replay(&mut ctx, 0);

        assert!(ctx.status().contains(DrawStatus::INVOKED));
        assert!(!ctx.status().contains(DrawStatus::DREW));
        assert!(ctx.dirty().area() > 0.0);
        assert_eq!(
            spy.calls(),
            [Call::StartMark, Call::CallFunctor(FunctorKey(3)), Call::EndMark]
        );
    }

    #[test]
    fn defer_precaches_paths_and_text_once() {
        let mut list = DisplayList::new(100.0, 100.0);
        list.draw_path(path_handle(4), rect_paint());
        list.draw_text(text_run(5), 0.0, 20.0, 30.0, rect_paint());

        let mut spy = SpyRenderer::new();
        let mut target = CollectingTarget::new();
        let mut ctx = DeferContext::new(&mut spy, &mut target, ReplayFlags::default());
        list.defer(&mut ctx, 0);

        let precache_text = |spy: &SpyRenderer| {
            spy.calls()
                .iter()
                .filter(|c| matches!(c, Call::PrecacheText(_)))
                .count()
        };
        assert!(spy.calls().contains(&Call::PrecachePath(path_handle(4))));
        assert_eq!(precache_text(&spy), 1);

        // Same transform again: the glyph cache is already warm.
        let mut target = CollectingTarget::new();
        let mut ctx = DeferContext::new(&mut spy, &mut target, ReplayFlags::default());
        list.defer(&mut ctx, 0);
        assert_eq!(precache_text(&spy), 1);
    }

    #[test]
    fn pos_text_defers_unbounded() {
        let mut list = DisplayList::new(100.0, 100.0);
        let id = list.draw_pos_text(
            text_run(6),
            vec![Point::new(0.0, 0.0), Point::new(8.0, 0.0)],
            rect_paint(),
        );

        let mut spy = SpyRenderer::new();
        let mut target = CollectingTarget::new();
        let mut ctx = DeferContext::new(&mut spy, &mut target, ReplayFlags::default());
        list.defer(&mut ctx, 0);

        assert_eq!(target.draw_count(), 1);
        let Op::Draw(op) = list.op(id) else {
            panic!("expected draw")
        };
        // Unresolvable bounds defer as empty, not as a rejection.
        assert_eq!(op.deferred_state().bounds, Rect::ZERO);
    }
}
