// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batch classification for the deferred pass.
//!
//! Draws that share a [`BatchId`] hit the same GPU resources (shader,
//! texture atlas, vertex format), so a deferral buffer may merge them into
//! one submission when the ops between them do not overlap or change state.
//! The id is a *compatibility key*, not a draw mode: two draws with the
//! same id and non-overlapping deferred bounds can be reordered past each
//! other without changing the rendered result.

/// Grouping key describing which deferred batch a draw may merge into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BatchId {
    /// Never merged. Used by ops with unknowable output (functors, nested
    /// lists, solid-color fills over the whole clip).
    #[default]
    None,
    /// Opaque textured quads from the bitmap cache.
    Bitmap,
    /// Nine-patch meshes.
    Patch,
    /// Plain vertex geometry without per-pixel coverage.
    Vertices,
    /// Vertex geometry carrying anti-aliased coverage ramps.
    AlphaVertices,
    /// Geometry rendered through a cached alpha mask texture.
    AlphaMaskTexture,
    /// Glyph quads drawn in opaque black, which skip color modulation.
    Text,
    /// Glyph quads requiring per-draw color.
    ColorText,
}

impl BatchId {
    /// Whether draws with this id are ever merged.
    #[inline]
    #[must_use]
    pub const fn is_mergeable(self) -> bool {
        !matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_not_mergeable() {
        assert!(!BatchId::None.is_mergeable());
        assert!(BatchId::Text.is_mergeable());
        assert!(BatchId::Bitmap.is_mergeable());
    }
}
