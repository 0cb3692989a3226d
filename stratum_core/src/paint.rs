// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint descriptor read by draw operations.
//!
//! A [`Paint`] captures the styling fields this engine actually inspects:
//! batch classification reads [`anti_alias`](Paint::anti_alias),
//! [`path_effect`](Paint::path_effect), and [`color`](Paint::color); bounds
//! resolution reads [`style`](Paint::style) and
//! [`stroke_width`](Paint::stroke_width); text bounds read
//! [`align`](Paint::align). Everything else about paint (shader programs,
//! filter chains) lives behind renderer-side keys and is opaque here.

use core::fmt;

/// A 32-bit ARGB color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    /// Opaque black, the fast path for monochrome text batching.
    pub const BLACK: Self = Self(0xff00_0000);

    /// Fully transparent.
    pub const TRANSPARENT: Self = Self(0);

    /// Returns the alpha channel.
    #[inline]
    #[must_use]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Whether this color is exactly opaque black.
    ///
    /// Text drawn in opaque black takes a dedicated monochrome batch; any
    /// other color routes through the tinted-text batch.
    #[inline]
    #[must_use]
    pub const fn is_opaque_black(self) -> bool {
        self.0 == 0xff00_0000
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:08x})", self.0)
    }
}

/// Whether a shape is filled, stroked, or both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PaintStyle {
    /// Fill the interior.
    #[default]
    Fill,
    /// Stroke the outline.
    Stroke,
    /// Stroke the outline and fill the interior.
    StrokeAndFill,
}

/// Horizontal anchoring of a text draw relative to its origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// The origin is the left edge of the advance.
    #[default]
    Left,
    /// The origin is the center of the advance.
    Center,
    /// The origin is the right edge of the advance.
    Right,
}

/// Blend mode for compositing a draw or a saved layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Standard source-over alpha compositing.
    #[default]
    SourceOver,
    /// Replace destination with source.
    Source,
    /// Clear the destination.
    Clear,
    /// Multiply blend.
    Multiply,
    /// Screen blend.
    Screen,
}

/// Styling captured with a draw operation at record time.
///
/// Paints are immutable once recorded. Draw operations that accept no paint
/// (nine-patches, solid color fills, functors) record `None` instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    /// Source color.
    pub color: Color,
    /// Fill or stroke.
    pub style: PaintStyle,
    /// Stroke width in local units; half of it outsets stroked bounds.
    pub stroke_width: f64,
    /// Whether edges are antialiased.
    pub anti_alias: bool,
    /// Whether a path effect (dash, corner rounding) is attached.
    ///
    /// A path effect forces stroked shapes through the texture-masked
    /// batch, since the effect geometry is rasterized to an alpha mask.
    pub path_effect: bool,
    /// Text anchoring for text draws.
    pub align: TextAlign,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            style: PaintStyle::Fill,
            stroke_width: 0.0,
            anti_alias: false,
            path_effect: false,
            align: TextAlign::Left,
        }
    }
}

impl Paint {
    /// Half the stroke width: the amount stroked bounds outset on each side.
    #[inline]
    #[must_use]
    pub fn stroke_outset(&self) -> f64 {
        self.stroke_width * 0.5
    }

    /// Whether this paint strokes its shape (and so outsets its bounds).
    #[inline]
    #[must_use]
    pub fn is_stroked(&self) -> bool {
        self.style != PaintStyle::Fill
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paint_is_opaque_black_fill() {
        let paint = Paint::default();
        assert_eq!(paint.color, Color::BLACK);
        assert_eq!(paint.style, PaintStyle::Fill);
        assert!(!paint.is_stroked());
    }

    #[test]
    fn opaque_black_detection() {
        assert!(Color::BLACK.is_opaque_black());
        assert!(!Color(0xff00_0001).is_opaque_black());
        // Translucent black is not the fast path.
        assert!(!Color(0x8000_0000).is_opaque_black());
    }

    #[test]
    fn stroke_outset_is_half_width() {
        let paint = Paint {
            style: PaintStyle::Stroke,
            stroke_width: 4.0,
            ..Paint::default()
        };
        assert_eq!(paint.stroke_outset(), 2.0);
        assert!(paint.is_stroked());
    }

    #[test]
    fn alpha_channel() {
        assert_eq!(Color::BLACK.alpha(), 0xff);
        assert_eq!(Color::TRANSPARENT.alpha(), 0);
        assert_eq!(Color(0x7f12_3456).alpha(), 0x7f);
    }
}
