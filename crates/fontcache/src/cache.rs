//! Glyph resolution: cache lookup, fallback scan and rasterization.

use tracing::{debug, trace};

use fontcache_core::profiling::profile_function;

use crate::atlas::{AtlasAllocator, AtlasRegion, RectPacker};
use crate::backend::{FontBackend, SdfRequest};
use crate::font::{FontId, FontRegistry};
use crate::glyph::Glyph;
use crate::sdf::SdfConfig;
use crate::sink::RenderSink;

/// Glyph cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from a glyph table.
    pub hits: u64,
    /// Lookups that had to rasterize.
    pub misses: u64,
    /// Misses that could not be placed in the atlas.
    pub atlas_failures: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, `0.0` before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Borrowed view of everything a glyph lookup touches.
pub(crate) struct GlyphCache<'a, B: FontBackend, S, P> {
    pub fonts: &'a mut FontRegistry<B::Face>,
    pub backend: &'a B,
    pub atlas: &'a mut AtlasAllocator<P>,
    pub sink: &'a mut S,
    pub sdf: &'a SdfConfig,
    pub stats: &'a mut CacheStats,
}

impl<B, S, P> GlyphCache<'_, B, S, P>
where
    B: FontBackend,
    S: RenderSink,
    P: RectPacker,
{
    /// Find or create the glyph for `(codepoint, size)` in `font`.
    ///
    /// Glyphs resolved through a fallback font are stored in `font`'s own
    /// table, so later lookups skip the fallback scan.
    pub fn get(&mut self, font: FontId, codepoint: u32, size: u32, padding: u32) -> Option<Glyph> {
        let base = self.fonts.get(font)?;
        if let Some(glyph) = base.glyphs().find(codepoint, size) {
            trace!(codepoint, size, %font, "glyph cache hit");
            self.stats.hits += 1;
            return Some(*glyph);
        }

        profile_function!();
        self.stats.misses += 1;

        let (render_font, index) = self.resolve_index(font, codepoint);
        let glyph = self.rasterize(render_font, codepoint, index, size, padding)?;

        debug!(
            codepoint,
            size,
            %font,
            fallback = render_font != font,
            glyph_index = index,
            "rasterized glyph"
        );
        self.fonts.get_mut(font)?.glyphs_mut().insert(glyph).copied()
    }

    /// Pick the font that will draw `codepoint`: the base font if it has a
    /// glyph, else the first fallback that does. Falls back to the base
    /// font's missing-glyph box.
    fn resolve_index(&self, font: FontId, codepoint: u32) -> (FontId, u32) {
        let Some(base) = self.fonts.get(font) else {
            return (font, 0);
        };
        let index = self.backend.glyph_index(base.face(), codepoint);
        if index != 0 {
            return (font, index);
        }

        base.fallbacks()
            .iter()
            .find_map(|&fallback| {
                let face = self.fonts.get(fallback)?.face();
                let index = self.backend.glyph_index(face, codepoint);
                (index != 0).then_some((fallback, index))
            })
            .unwrap_or((font, 0))
    }

    fn rasterize(
        &mut self,
        render_font: FontId,
        codepoint: u32,
        index: u32,
        size: u32,
        padding: u32,
    ) -> Option<Glyph> {
        let face = self.fonts.get(render_font)?.face();
        let scale = self.backend.scale_for_pixel_height(face, size as f32);
        let bounds = self.backend.glyph_box(face, index);
        let bitmap = self
            .backend
            .sdf_bitmap(
                face,
                &SdfRequest {
                    scale,
                    glyph_index: index,
                    padding,
                    on_edge_value: self.sdf.on_edge_byte(),
                    pixel_dist_scale: self.sdf.pixel_dist_scale,
                },
            )
            .filter(|bitmap| bitmap.width > 0 && bitmap.height > 0);
        let advance = self.backend.h_metrics(face, index) as f32 * scale;

        let pad = padding as f32;
        let x0 = bounds.x0 as f32 * scale - pad;
        let y1 = bounds.y1 as f32 * scale + pad;

        let (region, x1, y0) = match bitmap {
            Some(bitmap) => {
                let Some(region) = self.atlas.allocate(bitmap.width, bitmap.height, &mut *self.sink)
                else {
                    self.stats.atlas_failures += 1;
                    return None;
                };
                self.sink.update_atlas(region, &bitmap.pixels);
                (
                    region,
                    x0 + bitmap.width as f32,
                    y1 - bitmap.height as f32,
                )
            }
            None => (
                AtlasRegion::default(),
                bounds.x1 as f32 * scale + pad,
                bounds.y0 as f32 * scale - pad,
            ),
        };

        Some(Glyph {
            codepoint,
            index,
            size,
            advance,
            x0,
            y0,
            x1,
            y1,
            s0: region.x,
            t0: region.y + region.height,
            s1: region.x + region.width,
            t1: region.y,
        })
    }
}
