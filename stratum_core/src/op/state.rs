// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State operations: save stack, transform, clip, and ambient draw state.

use kurbo::{Affine, Rect};

use crate::dump::DumpSink;
use crate::paint::{BlendMode, Color};
use crate::renderer::{ClipMode, Renderer, SaveFlags};
use crate::resource::{ColorFilterKey, PathHandle, RegionHandle, ShaderKey};

/// A recorded operation that mutates renderer state.
///
/// State ops apply immediately in both passes; the deferred pass
/// additionally registers save, restore, save-layer, and clip ops with the
/// flush target so it can re-establish the right scopes around merged
/// draws.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StateOp {
    /// Pushes a state scope.
    Save {
        /// Which state the scope preserves.
        flags: SaveFlags,
    },
    /// Pops scopes down to a recorded depth, in canvas convention: depth 1
    /// is the state at root-pass entry. The absolute target resolves
    /// against the executing context's baseline, so one recording replays
    /// correctly at any nesting depth.
    RestoreToCount {
        /// Target depth, where 1 means root-pass entry state.
        count: u32,
    },
    /// Pushes a state scope that redirects rendering into an offscreen
    /// layer composited on restore.
    SaveLayer {
        /// Layer bounds in local space.
        area: Rect,
        /// Layer opacity applied at composite time.
        alpha: u8,
        /// Blend mode used to composite the layer.
        mode: BlendMode,
        /// Which state the scope preserves.
        flags: SaveFlags,
    },
    /// Translates the transform.
    Translate {
        /// Horizontal offset.
        dx: f64,
        /// Vertical offset.
        dy: f64,
    },
    /// Rotates the transform.
    Rotate {
        /// Rotation in degrees.
        degrees: f64,
    },
    /// Scales the transform.
    Scale {
        /// Horizontal factor.
        sx: f64,
        /// Vertical factor.
        sy: f64,
    },
    /// Skews the transform.
    Skew {
        /// Horizontal skew factor.
        sx: f64,
        /// Vertical skew factor.
        sy: f64,
    },
    /// Replaces the transform.
    SetMatrix {
        /// The new transform.
        matrix: Affine,
    },
    /// Concatenates onto the transform.
    ConcatMatrix {
        /// The transform to concatenate.
        matrix: Affine,
    },
    /// Applies a rectangle against the clip.
    ClipRect {
        /// The rectangle, in local space.
        rect: Rect,
        /// The set operation.
        mode: ClipMode,
    },
    /// Applies a path against the clip.
    ClipPath {
        /// The path.
        path: PathHandle,
        /// The set operation.
        mode: ClipMode,
    },
    /// Applies a region against the clip.
    ClipRegion {
        /// The region.
        region: RegionHandle,
        /// The set operation.
        mode: ClipMode,
    },
    /// Binds a shader.
    SetupShader {
        /// The shader to bind.
        shader: ShaderKey,
    },
    /// Unbinds the shader.
    ResetShader,
    /// Binds a color filter.
    SetupColorFilter {
        /// The filter to bind.
        filter: ColorFilterKey,
    },
    /// Unbinds the color filter.
    ResetColorFilter,
    /// Configures a drop shadow.
    SetupShadow {
        /// Blur radius.
        radius: f64,
        /// Horizontal offset.
        dx: f64,
        /// Vertical offset.
        dy: f64,
        /// Shadow color.
        color: Color,
    },
    /// Clears the drop shadow.
    ResetShadow,
    /// Installs a paint-flag filter.
    SetupPaintFilter {
        /// Paint flag bits to clear.
        clear_bits: u32,
        /// Paint flag bits to set.
        set_bits: u32,
    },
    /// Removes the paint-flag filter.
    ResetPaintFilter,
}

impl StateOp {
    /// The operation's stable name.
    ///
    /// A layer save that only fades (partial alpha composited source-over)
    /// reports itself as `SaveLayerAlpha`, matching how it was recorded.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Save { .. } => "Save",
            Self::RestoreToCount { .. } => "RestoreToCount",
            Self::SaveLayer { alpha, mode, .. } => {
                if *alpha < u8::MAX && *mode == BlendMode::SourceOver {
                    "SaveLayerAlpha"
                } else {
                    "SaveLayer"
                }
            }
            Self::Translate { .. } => "Translate",
            Self::Rotate { .. } => "Rotate",
            Self::Scale { .. } => "Scale",
            Self::Skew { .. } => "Skew",
            Self::SetMatrix { .. } => "SetMatrix",
            Self::ConcatMatrix { .. } => "ConcatMatrix",
            Self::ClipRect { .. } => "ClipRect",
            Self::ClipPath { .. } => "ClipPath",
            Self::ClipRegion { .. } => "ClipRegion",
            Self::SetupShader { .. } => "SetupShader",
            Self::ResetShader => "ResetShader",
            Self::SetupColorFilter { .. } => "SetupColorFilter",
            Self::ResetColorFilter => "ResetColorFilter",
            Self::SetupShadow { .. } => "SetupShadow",
            Self::ResetShadow => "ResetShadow",
            Self::SetupPaintFilter { .. } => "SetupPaintFilter",
            Self::ResetPaintFilter => "ResetPaintFilter",
        }
    }

    /// Whether this op is a clip.
    #[inline]
    #[must_use]
    pub const fn is_clip(&self) -> bool {
        matches!(
            self,
            Self::ClipRect { .. } | Self::ClipPath { .. } | Self::ClipRegion { .. }
        )
    }

    /// Whether applying this clip can leave the clip non-rectangular.
    ///
    /// Any mode other than intersect or replace can, and so can
    /// intersecting or replacing with a non-rectangular shape. A deferral
    /// buffer stops merging across such ops.
    #[must_use]
    pub const fn can_cause_complex_clip(&self) -> bool {
        match self {
            Self::ClipRect { mode, .. } => {
                !matches!(mode, ClipMode::Intersect | ClipMode::Replace)
            }
            Self::ClipPath { .. } | Self::ClipRegion { .. } => true,
            _ => false,
        }
    }

    /// Applies this op to `renderer`.
    ///
    /// `base_save_count` is the renderer depth at which execution of the
    /// outermost list began; relative restore targets resolve against it.
    pub fn apply_state<R: Renderer>(&self, renderer: &mut R, base_save_count: u32) {
        match *self {
            Self::Save { flags } => {
                renderer.save(flags);
            }
            Self::RestoreToCount { count } => {
                renderer.restore_to_count(base_save_count + count);
            }
            Self::SaveLayer {
                area,
                alpha,
                mode,
                flags,
            } => {
                renderer.save_layer(area, alpha, mode, flags);
            }
            Self::Translate { dx, dy } => renderer.translate(dx, dy),
            Self::Rotate { degrees } => renderer.rotate(degrees),
            Self::Scale { sx, sy } => renderer.scale(sx, sy),
            Self::Skew { sx, sy } => renderer.skew(sx, sy),
            Self::SetMatrix { matrix } => renderer.set_matrix(matrix),
            Self::ConcatMatrix { matrix } => renderer.concat_matrix(matrix),
            Self::ClipRect { rect, mode } => renderer.clip_rect(rect, mode),
            Self::ClipPath { path, mode } => renderer.clip_path(path, mode),
            Self::ClipRegion { region, mode } => renderer.clip_region(region, mode),
            Self::SetupShader { shader } => renderer.setup_shader(shader),
            Self::ResetShader => renderer.reset_shader(),
            Self::SetupColorFilter { filter } => renderer.setup_color_filter(filter),
            Self::ResetColorFilter => renderer.reset_color_filter(),
            Self::SetupShadow {
                radius,
                dx,
                dy,
                color,
            } => renderer.setup_shadow(radius, dx, dy, color),
            Self::ResetShadow => renderer.reset_shadow(),
            Self::SetupPaintFilter {
                clear_bits,
                set_bits,
            } => renderer.setup_paint_filter(clear_bits, set_bits),
            Self::ResetPaintFilter => renderer.reset_paint_filter(),
        }
    }

    /// Emits this op's dump line at the given nesting level.
    pub fn output(&self, sink: &mut dyn DumpSink, level: usize) {
        let name = self.name();
        match *self {
            Self::Save { flags } => sink.line(level, name, format_args!("flags={flags:?}")),
            Self::RestoreToCount { count } => {
                sink.line(level, name, format_args!("count={count}"));
            }
            Self::SaveLayer {
                area, alpha, mode, ..
            } => sink.line(
                level,
                name,
                format_args!("area={area:?} alpha={alpha} mode={mode:?}"),
            ),
            Self::Translate { dx, dy } => sink.line(level, name, format_args!("{dx}, {dy}")),
            Self::Rotate { degrees } => sink.line(level, name, format_args!("{degrees}")),
            Self::Scale { sx, sy } | Self::Skew { sx, sy } => {
                sink.line(level, name, format_args!("{sx}, {sy}"));
            }
            Self::SetMatrix { matrix } | Self::ConcatMatrix { matrix } => {
                sink.line(level, name, format_args!("{matrix:?}"));
            }
            Self::ClipRect { rect, mode } => {
                sink.line(level, name, format_args!("{rect:?} mode={mode:?}"));
            }
            Self::ClipPath { path, mode } => {
                sink.line(level, name, format_args!("{path:?} mode={mode:?}"));
            }
            Self::ClipRegion { region, mode } => {
                sink.line(level, name, format_args!("{region:?} mode={mode:?}"));
            }
            Self::SetupShader { shader } => sink.line(level, name, format_args!("{shader:?}")),
            Self::SetupColorFilter { filter } => {
                sink.line(level, name, format_args!("{filter:?}"));
            }
            Self::SetupShadow {
                radius,
                dx,
                dy,
                color,
            } => sink.line(
                level,
                name,
                format_args!("radius={radius} offset=({dx}, {dy}) color={color:?}"),
            ),
            Self::SetupPaintFilter {
                clear_bits,
                set_bits,
            } => sink.line(
                level,
                name,
                format_args!("clear={clear_bits:#x} set={set_bits:#x}"),
            ),
            Self::ResetShader
            | Self::ResetColorFilter
            | Self::ResetShadow
            | Self::ResetPaintFilter => sink.line(level, name, format_args!("")),
        }
    }
}
