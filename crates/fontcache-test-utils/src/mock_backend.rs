//! Scripted font backend.
//!
//! Fonts are registered under a name; "font data" handed to the context is
//! simply that name as UTF-8 bytes. Any other bytes fail to parse.

use std::sync::Arc;

use fontcache::{FontBackend, FontData, GlyphBox, SdfBitmap, SdfRequest, VerticalMetrics};
use fontcache_core::alloc::HashMap;
use parking_lot::Mutex;

/// Units per pixel-height span of [`MockFont::latin`]. Chosen so that the
/// scale at 32px is exactly `1/32`.
pub const MOCK_UNITS: i32 = 1024;

/// Advance of every printable glyph in [`MockFont::latin`], in font units.
pub const MOCK_ADVANCE: i32 = 512;

/// Advance of the space glyph in [`MockFont::latin`], in font units.
pub const MOCK_SPACE_ADVANCE: i32 = 256;

/// Ink box of every printable glyph in [`MockFont::latin`].
pub const MOCK_BOX: GlyphBox = GlyphBox {
    x0: 64,
    y0: 0,
    x1: 448,
    y1: 704,
};

/// One scripted glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockGlyph {
    pub index: u32,
    pub advance: i32,
    pub bounds: GlyphBox,
}

/// A scripted font: a codepoint map plus vertical metrics.
#[derive(Debug, Clone, Default)]
pub struct MockFont {
    glyphs: HashMap<u32, MockGlyph>,
    by_index: HashMap<u32, MockGlyph>,
    metrics: VerticalMetrics,
}

impl MockFont {
    /// A font with no glyphs and `MOCK_UNITS` tall metrics.
    pub fn empty() -> Self {
        Self {
            metrics: VerticalMetrics {
                ascent: 800,
                descent: 800 - MOCK_UNITS,
                line_gap: 0,
            },
            ..Default::default()
        }
    }

    /// Printable ASCII with identical boxes and advances, plus a blank space.
    ///
    /// Glyph indices equal codepoints.
    pub fn latin() -> Self {
        let mut font = Self::empty().with_glyph(0x20, MOCK_SPACE_ADVANCE, GlyphBox::default());
        for codepoint in 0x21..=0x7E {
            font = font.with_glyph(codepoint, MOCK_ADVANCE, MOCK_BOX);
        }
        font
    }

    /// Add a glyph whose index equals its codepoint.
    pub fn with_glyph(mut self, codepoint: u32, advance: i32, bounds: GlyphBox) -> Self {
        let glyph = MockGlyph {
            index: codepoint,
            advance,
            bounds,
        };
        self.glyphs.insert(codepoint, glyph);
        self.by_index.insert(codepoint, glyph);
        self
    }

    pub fn with_metrics(mut self, metrics: VerticalMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

/// A parsed [`MockFont`].
#[derive(Debug, Clone)]
pub struct MockFace {
    pub name: String,
    pub face_index: u32,
    font: Arc<MockFont>,
}

/// A recorded backend query.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Parse { name: String, face_index: u32 },
    GlyphIndex { font: String, codepoint: u32 },
    SdfBitmap { font: String, glyph_index: u32, scale: f32, padding: u32 },
}

/// [`FontBackend`] serving [`MockFont`]s by name.
#[derive(Debug, Default)]
pub struct MockFontBackend {
    fonts: HashMap<String, Arc<MockFont>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockFontBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `font` so that parsing the bytes of `name` yields it.
    pub fn with_font(mut self, name: &str, font: MockFont) -> Self {
        self.fonts.insert(name.to_string(), Arc::new(font));
        self
    }

    /// All recorded calls.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Count SDF rasterizations.
    pub fn count_sdf_calls(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, MockCall::SdfBitmap { .. }))
            .count()
    }

    /// Count glyph index lookups against the font registered as `font`.
    pub fn count_glyph_index_calls(&self, font: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, MockCall::GlyphIndex { font: f, .. } if f == font))
            .count()
    }

    /// Count parse attempts, successful or not.
    pub fn count_parses(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, MockCall::Parse { .. }))
            .count()
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().push(call);
    }
}

impl FontBackend for MockFontBackend {
    type Face = MockFace;

    fn parse(&self, data: FontData, face_index: u32) -> Option<MockFace> {
        let name = String::from_utf8_lossy(data.as_bytes()).into_owned();
        self.record(MockCall::Parse {
            name: name.clone(),
            face_index,
        });
        let font = self.fonts.get(&name)?.clone();
        Some(MockFace {
            name,
            face_index,
            font,
        })
    }

    fn glyph_index(&self, face: &MockFace, codepoint: u32) -> u32 {
        self.record(MockCall::GlyphIndex {
            font: face.name.clone(),
            codepoint,
        });
        face.font.glyphs.get(&codepoint).map_or(0, |glyph| glyph.index)
    }

    fn glyph_box(&self, face: &MockFace, glyph: u32) -> GlyphBox {
        face.font
            .by_index
            .get(&glyph)
            .map(|g| g.bounds)
            .unwrap_or_default()
    }

    fn scale_for_pixel_height(&self, face: &MockFace, pixel_height: f32) -> f32 {
        let metrics = face.font.metrics;
        pixel_height / (metrics.ascent - metrics.descent) as f32
    }

    fn h_metrics(&self, face: &MockFace, glyph: u32) -> i32 {
        face.font.by_index.get(&glyph).map_or(0, |g| g.advance)
    }

    fn v_metrics(&self, face: &MockFace) -> VerticalMetrics {
        face.font.metrics
    }

    fn sdf_bitmap(&self, face: &MockFace, request: &SdfRequest) -> Option<SdfBitmap> {
        self.record(MockCall::SdfBitmap {
            font: face.name.clone(),
            glyph_index: request.glyph_index,
            scale: request.scale,
            padding: request.padding,
        });

        let bounds = self.glyph_box(face, request.glyph_index);
        if bounds.is_empty() {
            return None;
        }
        let ink_w = ((bounds.x1 - bounds.x0) as f32 * request.scale).ceil() as u32;
        let ink_h = ((bounds.y1 - bounds.y0) as f32 * request.scale).ceil() as u32;
        let width = ink_w + 2 * request.padding;
        let height = ink_h + 2 * request.padding;
        Some(SdfBitmap {
            width,
            height,
            pixels: vec![request.on_edge_value; (width * height) as usize],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_name() {
        let backend = MockFontBackend::new().with_font("latin", MockFont::latin());
        assert!(backend.parse(FontData::from(b"latin"), 0).is_some());
        assert!(backend.parse(FontData::from(b"other"), 0).is_none());
        assert_eq!(backend.count_parses(), 2);
    }

    #[test]
    fn test_latin_metrics() {
        let backend = MockFontBackend::new().with_font("latin", MockFont::latin());
        let face = backend.parse(FontData::from(b"latin"), 0);
        let Some(face) = face else {
            panic!("latin should parse");
        };
        assert_eq!(backend.scale_for_pixel_height(&face, 32.0), 1.0 / 32.0);
        assert_eq!(backend.glyph_index(&face, u32::from('A')), 0x41);
        assert_eq!(backend.glyph_index(&face, 0x4E2D), 0);
        assert_eq!(backend.h_metrics(&face, 0x20), MOCK_SPACE_ADVANCE);
    }

    #[test]
    fn test_sdf_size() {
        let backend = MockFontBackend::new().with_font("latin", MockFont::latin());
        let Some(face) = backend.parse(FontData::from(b"latin"), 0) else {
            panic!("latin should parse");
        };
        let request = SdfRequest {
            scale: 1.0 / 32.0,
            glyph_index: 0x41,
            padding: 4,
            on_edge_value: 204,
            pixel_dist_scale: 32.0,
        };
        let bitmap = backend.sdf_bitmap(&face, &request);
        assert_eq!(bitmap.as_ref().map(|b| (b.width, b.height)), Some((20, 30)));

        let space = SdfRequest {
            glyph_index: 0x20,
            ..request
        };
        assert!(backend.sdf_bitmap(&face, &space).is_none());
        assert_eq!(backend.count_sdf_calls(), 2);
    }
}
