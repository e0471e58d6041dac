//! TrueType / OpenType backend built on `ttf-parser`.

use ttf_parser::{GlyphId, OutlineBuilder};

use super::{FontBackend, GlyphBox, SdfBitmap, SdfRequest, VerticalMetrics};
use crate::font::FontData;
use crate::sdf::{Outline, SdfConfig, generate_sdf};
use fontcache_core::math::vec2;

/// [`FontBackend`] for TrueType and OpenType fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TtfBackend;

impl TtfBackend {
    pub fn new() -> Self {
        Self
    }
}

/// A validated face.
///
/// Keeps the font bytes and the global metrics, and re-parses a
/// `ttf_parser::Face` for each query. Parsing only validates headers and
/// builds an offset table, so this stays cheap.
#[derive(Debug, Clone)]
pub struct TtfFace {
    data: FontData,
    index: u32,
    units_per_em: u16,
    metrics: VerticalMetrics,
}

impl TtfFace {
    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(self.data.as_bytes(), self.index).ok()
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph_id(glyph: u32) -> Option<GlyphId> {
        u16::try_from(glyph).ok().map(GlyphId)
    }
}

impl FontBackend for TtfBackend {
    type Face = TtfFace;

    fn parse(&self, data: FontData, face_index: u32) -> Option<TtfFace> {
        let face = ttf_parser::Face::parse(data.as_bytes(), face_index).ok()?;
        let units_per_em = face.units_per_em();
        let metrics = VerticalMetrics {
            ascent: i32::from(face.ascender()),
            descent: i32::from(face.descender()),
            line_gap: i32::from(face.line_gap()),
        };
        Some(TtfFace {
            data,
            index: face_index,
            units_per_em,
            metrics,
        })
    }

    fn glyph_index(&self, face: &TtfFace, codepoint: u32) -> u32 {
        let Some(ch) = char::from_u32(codepoint) else {
            return 0;
        };
        face.face()
            .and_then(|f| f.glyph_index(ch))
            .map_or(0, |id| u32::from(id.0))
    }

    fn glyph_box(&self, face: &TtfFace, glyph: u32) -> GlyphBox {
        let Some(id) = TtfFace::glyph_id(glyph) else {
            return GlyphBox::default();
        };
        face.face()
            .and_then(|f| f.glyph_bounding_box(id))
            .map(|rect| GlyphBox {
                x0: i32::from(rect.x_min),
                y0: i32::from(rect.y_min),
                x1: i32::from(rect.x_max),
                y1: i32::from(rect.y_max),
            })
            .unwrap_or_default()
    }

    fn scale_for_pixel_height(&self, face: &TtfFace, pixel_height: f32) -> f32 {
        // Ascender to descender spans the requested height.
        let span = face.metrics.ascent - face.metrics.descent;
        let span = if span > 0 {
            span
        } else {
            i32::from(face.units_per_em.max(1))
        };
        pixel_height / span as f32
    }

    fn h_metrics(&self, face: &TtfFace, glyph: u32) -> i32 {
        TtfFace::glyph_id(glyph)
            .and_then(|id| face.face()?.glyph_hor_advance(id))
            .map_or(0, i32::from)
    }

    fn v_metrics(&self, face: &TtfFace) -> VerticalMetrics {
        face.metrics
    }

    fn sdf_bitmap(&self, face: &TtfFace, request: &SdfRequest) -> Option<SdfBitmap> {
        let id = TtfFace::glyph_id(request.glyph_index)?;
        let parsed = face.face()?;

        let mut builder = ScaledOutline {
            outline: Outline::new(),
            scale: request.scale,
        };
        let rect = parsed.outline_glyph(id, &mut builder)?;
        builder.outline.close();
        if builder.outline.is_empty() {
            return None;
        }

        let scale = request.scale;
        let padding = request.padding as f32;
        let ink_w = (f32::from(rect.x_max) - f32::from(rect.x_min)) * scale;
        let ink_h = (f32::from(rect.y_max) - f32::from(rect.y_min)) * scale;
        let width = ink_w.ceil() as u32 + 2 * request.padding;
        let height = ink_h.ceil() as u32 + 2 * request.padding;

        let top_left = vec2(
            f32::from(rect.x_min) * scale - padding,
            f32::from(rect.y_max) * scale + padding,
        );
        let config = SdfConfig::new()
            .edge_value(f32::from(request.on_edge_value) / 255.0)
            .pixel_dist_scale(request.pixel_dist_scale);
        let pixels = generate_sdf(&builder.outline, top_left, width, height, &config);

        Some(SdfBitmap {
            width,
            height,
            pixels,
        })
    }
}

/// Feeds `ttf-parser` outline commands into an [`Outline`] in pixel units.
struct ScaledOutline {
    outline: Outline,
    scale: f32,
}

impl OutlineBuilder for ScaledOutline {
    fn move_to(&mut self, x: f32, y: f32) {
        self.outline.move_to(x * self.scale, y * self.scale);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.outline.line_to(x * self.scale, y * self.scale);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let s = self.scale;
        self.outline.quad_to(x1 * s, y1 * s, x * s, y * s);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let s = self.scale;
        self.outline
            .curve_to(x1 * s, y1 * s, x2 * s, y2 * s, x * s, y * s);
    }

    fn close(&mut self) {
        self.outline.close();
    }
}
