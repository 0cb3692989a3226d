// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opaque handles for externally owned drawing resources.
//!
//! The engine never touches pixel or outline data. Bitmaps, paths, regions,
//! shaders, filters, functors, and pre-rendered layers are owned by the
//! caller's resource system; operations capture handles at record time and
//! the renderer resolves them at execution time. Handles must stay valid
//! from an operation's construction until the owning
//! [`DisplayList`](crate::list::DisplayList)'s last execution — that
//! lifetime contract is the caller's responsibility.
//!
//! Where the original object would have been consulted for geometry at
//! record time (bitmap dimensions, path bounds, font metrics), the handle
//! carries that metadata by value instead.

use core::fmt;

use kurbo::Rect;

/// An opaque key to a backend-managed resource.
///
/// Keys are assigned by the caller's resource system and passed through
/// without interpretation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey(pub u64);

impl fmt::Debug for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceKey({})", self.0)
    }
}

/// A bitmap handle plus its record-time dimensions.
///
/// Dimensions feed local-bounds computation; the pixel data itself is
/// resolved by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BitmapHandle {
    /// Backend key for the pixel data.
    pub key: ResourceKey,
    /// Width in local units.
    pub width: f64,
    /// Height in local units.
    pub height: f64,
}

/// A path handle plus its record-time conservative bounds.
///
/// The bounds are expected to already account for stroke geometry and
/// effect outsets, the way a path cache reports them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathHandle {
    /// Backend key for the outline.
    pub key: ResourceKey,
    /// Conservative axis-aligned bounds of the rendered path.
    pub bounds: Rect,
}

/// A region handle plus its record-time bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionHandle {
    /// Backend key for the region.
    pub key: ResourceKey,
    /// Axis-aligned bounds of the region.
    pub bounds: Rect,
}

/// An opaque key to a shader program bound by `setup_shader`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderKey(pub u64);

impl fmt::Debug for ShaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShaderKey({})", self.0)
    }
}

/// An opaque key to a color filter bound by `setup_color_filter`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorFilterKey(pub u64);

impl fmt::Debug for ColorFilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColorFilterKey({})", self.0)
    }
}

/// An opaque key to an external draw callback.
///
/// Invoking a functor hands control to foreign code that may issue its own
/// GPU work; draws report it through
/// [`DrawStatus::INVOKED`](crate::renderer::DrawStatus::INVOKED).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctorKey(pub u64);

impl fmt::Debug for FunctorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctorKey({})", self.0)
    }
}

/// An opaque key to a pre-rendered layer composited by `draw_layer`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerKey(pub u64);

impl fmt::Debug for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerKey({})", self.0)
    }
}

/// A shaped text run plus the metrics local-bounds computation needs.
///
/// Shaping happens upstream; the run key resolves to glyphs on the renderer
/// side. Ascent and descent are positive distances from the baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextRun {
    /// Backend key for the shaped glyphs.
    pub key: ResourceKey,
    /// Number of glyphs in the run.
    pub glyph_count: u32,
    /// Length of the source text in bytes.
    pub byte_len: u32,
    /// Distance from baseline to the top of the run.
    pub ascent: f64,
    /// Distance from baseline to the bottom of the run.
    pub descent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_debug_formats() {
        use alloc::format;

        assert_eq!(format!("{:?}", ResourceKey(7)), "ResourceKey(7)");
        assert_eq!(format!("{:?}", ShaderKey(1)), "ShaderKey(1)");
        assert_eq!(format!("{:?}", FunctorKey(2)), "FunctorKey(2)");
        assert_eq!(format!("{:?}", LayerKey(3)), "LayerKey(3)");
    }
}
