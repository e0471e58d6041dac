//! Font backend abstraction.
//!
//! A [`FontBackend`] turns raw font bytes into a face handle and answers the
//! metric and rasterization queries the glyph cache needs. All metrics are in
//! font units unless stated otherwise; [`FontBackend::scale_for_pixel_height`]
//! converts them to pixels.

#[cfg(feature = "ttf")]
mod ttf;

#[cfg(feature = "ttf")]
pub use ttf::{TtfBackend, TtfFace};

use crate::font::FontData;

/// Ink bounding box of a glyph in font units, y-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl GlyphBox {
    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }
}

/// Vertical font metrics in font units. `descent` is usually negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerticalMetrics {
    pub ascent: i32,
    pub descent: i32,
    pub line_gap: i32,
}

impl VerticalMetrics {
    /// Distance between consecutive baselines, in font units.
    pub fn line_height(&self) -> i32 {
        self.ascent - self.descent + self.line_gap
    }
}

/// Parameters for one SDF rasterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SdfRequest {
    /// Font units to pixels.
    pub scale: f32,
    pub glyph_index: u32,
    /// Empty border around the ink box, in pixels.
    pub padding: u32,
    /// Texel value stored exactly on the outline.
    pub on_edge_value: u8,
    /// Texel value change per pixel of distance.
    pub pixel_dist_scale: f32,
}

/// A single-channel SDF image, row-major, row 0 at the top.
///
/// The top-left texel sits at `(box.x0 * scale - padding, box.y1 * scale + padding)`
/// in y-up pixel space.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SdfBitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Font parsing, metrics and SDF rasterization.
pub trait FontBackend {
    /// Parsed face handle.
    type Face;

    /// Parse one face out of `data`. `None` means the data was rejected.
    fn parse(&self, data: FontData, face_index: u32) -> Option<Self::Face>;

    /// Glyph index for `codepoint`, `0` when the face has no glyph for it.
    fn glyph_index(&self, face: &Self::Face, codepoint: u32) -> u32;

    /// Ink box of `glyph`. Empty for glyphs without an outline.
    fn glyph_box(&self, face: &Self::Face, glyph: u32) -> GlyphBox;

    /// Scale factor mapping font units to `pixel_height` pixels.
    fn scale_for_pixel_height(&self, face: &Self::Face, pixel_height: f32) -> f32;

    /// Horizontal advance of `glyph` in font units.
    fn h_metrics(&self, face: &Self::Face, glyph: u32) -> i32;

    fn v_metrics(&self, face: &Self::Face) -> VerticalMetrics;

    /// Rasterize an SDF image. `None` when the glyph has no outline.
    fn sdf_bitmap(&self, face: &Self::Face, request: &SdfRequest) -> Option<SdfBitmap>;
}
