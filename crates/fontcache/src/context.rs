//! The text context: fonts, style stack, atlas and vertex batch in one place.

use std::ops::{Deref, DerefMut};
use std::path::Path;

use tracing::{debug, warn};

use fontcache_core::Color;
use fontcache_core::math::{Vec2, vec2};
use fontcache_core::profiling::profile_function;

use crate::atlas::{AtlasAllocator, RectPacker, ShelfPacker};
use crate::backend::{FontBackend, VerticalMetrics};
use crate::batch::{FlushMode, Vertex, VertexBatch, glyph_quad};
use crate::cache::{CacheStats, GlyphCache};
use crate::config::ContextConfig;
use crate::error::{FontCacheError, FontCacheResult};
use crate::font::{Font, FontData, FontId, FontRegistry};
use crate::glyph::Glyph;
use crate::layout::{self, InkExtents};
use crate::sink::RenderSink;
use crate::state::{Align, StateStack, StyleState};
use crate::utf8::Codepoints;

/// Vertical metrics of the current font at the current size, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    /// Usually negative.
    pub descent: f32,
    /// Distance between consecutive baselines.
    pub line_height: f32,
}

/// Snapshot of context counters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContextStats {
    pub fonts: usize,
    /// Glyphs resident across every font's table.
    pub glyphs: usize,
    pub cache: CacheStats,
    /// Non-empty batches handed to the sink.
    pub flushes: u64,
}

/// An SDF text context bound to one atlas.
///
/// Owns the font backend, the render sink and the packer. Text is drawn with
/// the style on top of the state stack; output goes to the sink as vertex
/// batches, new glyph images go to the sink as atlas updates.
///
/// # Example
///
/// ```no_run
/// use fontcache::{Align, Color, Context, ContextConfig, TtfBackend};
/// # use fontcache::{AtlasRegion, RenderSink, Vertex};
/// # struct MySink;
/// # impl RenderSink for MySink {
/// #     fn update_atlas(&mut self, _: AtlasRegion, _: &[u8]) {}
/// #     fn draw(&mut self, _: &mut [Vertex]) {}
/// # }
///
/// let mut ctx = Context::new(ContextConfig::default(), TtfBackend::new(), MySink)?;
/// let font = ctx.add_font_file("assets/Roboto-Regular.ttf", 0)?;
///
/// ctx.set_font(font);
/// ctx.set_size(24.0);
/// ctx.set_color(Color::BLACK);
/// ctx.set_align(Align::CENTER | Align::BASELINE);
/// ctx.draw_text(400.0, 300.0, "Hello,\nWorld!");
/// # Ok::<(), fontcache::FontCacheError>(())
/// ```
pub struct Context<B: FontBackend, S: RenderSink, P: RectPacker = ShelfPacker> {
    config: ContextConfig,
    backend: B,
    sink: S,
    fonts: FontRegistry<B::Face>,
    atlas: AtlasAllocator<P>,
    states: StateStack,
    batch: VertexBatch,
    flush_mode: FlushMode,
    stats: CacheStats,
}

impl<B, S> Context<B, S>
where
    B: FontBackend,
    S: RenderSink,
{
    /// Create a context packing glyphs with a [`ShelfPacker`].
    pub fn new(config: ContextConfig, backend: B, sink: S) -> FontCacheResult<Self> {
        Self::with_packer(config, backend, sink, ShelfPacker::default())
    }
}

impl<B, S, P> Context<B, S, P>
where
    B: FontBackend,
    S: RenderSink,
    P: RectPacker,
{
    /// Create a context with an explicit packer.
    ///
    /// If the sink refuses to create the atlas, no context exists and the
    /// sink's `destroy` is not called.
    pub fn with_packer(
        config: ContextConfig,
        backend: B,
        mut sink: S,
        packer: P,
    ) -> FontCacheResult<Self> {
        config.validate()?;

        let batch = VertexBatch::new(config.max_quads)?;
        let (width, height) = (config.atlas_width, config.atlas_height);
        if !sink.create(width, height) {
            warn!(width, height, "render sink refused to create the atlas");
            return Err(FontCacheError::SinkCreateFailed { width, height });
        }

        debug!(
            width,
            height,
            glyph_size = config.glyph_size,
            max_quads = config.max_quads,
            "created text context"
        );

        Ok(Self {
            fonts: FontRegistry::new(config.max_fallbacks),
            atlas: AtlasAllocator::new(packer, width, height),
            states: StateStack::new(config.max_states),
            batch,
            flush_mode: FlushMode::default(),
            stats: CacheStats::default(),
            config,
            backend,
            sink,
        })
    }

    /// Tear the context down. Equivalent to dropping it.
    pub fn destroy(self) {}

    // Fonts

    /// Register a font face.
    ///
    /// Pass a `Vec<u8>` or `Arc<[u8]>` to hand ownership to the context, or a
    /// `&'static [u8]` to keep the bytes borrowed.
    pub fn add_font(&mut self, data: impl Into<FontData>, face_index: u32) -> FontCacheResult<FontId> {
        self.fonts.add(&self.backend, data.into(), face_index)
    }

    /// Read a font file and register one of its faces.
    pub fn add_font_file(&mut self, path: impl AsRef<Path>, face_index: u32) -> FontCacheResult<FontId> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| FontCacheError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_font(bytes, face_index)
    }

    /// Use `fallback` for codepoints `base` cannot draw.
    ///
    /// Returns `false` if either handle is invalid or `base` already has the
    /// maximum number of fallbacks.
    pub fn add_fallback(&mut self, base: FontId, fallback: FontId) -> bool {
        self.fonts.add_fallback(base, fallback)
    }

    pub fn font(&self, id: FontId) -> Option<&Font<B::Face>> {
        self.fonts.get(id)
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    // State

    /// Save the current style. Reports [`ErrorCode::StatesOverflow`] to the
    /// sink when the stack is full.
    ///
    /// [`ErrorCode::StatesOverflow`]: crate::ErrorCode::StatesOverflow
    pub fn push_state(&mut self) {
        if let Err(code) = self.states.push() {
            warn!(depth = self.states.depth(), "style stack overflow");
            self.sink.error(code);
        }
    }

    /// Restore the last saved style. Reports [`ErrorCode::StatesUnderflow`]
    /// to the sink when only the base style is left.
    ///
    /// [`ErrorCode::StatesUnderflow`]: crate::ErrorCode::StatesUnderflow
    pub fn pop_state(&mut self) {
        if let Err(code) = self.states.pop() {
            warn!("style stack underflow");
            self.sink.error(code);
        }
    }

    /// Reset the current style to defaults.
    pub fn clear_state(&mut self) {
        self.states.clear();
    }

    pub fn state(&self) -> &StyleState {
        self.states.top()
    }

    pub fn state_depth(&self) -> usize {
        self.states.depth()
    }

    /// Text size in pixels.
    pub fn set_size(&mut self, size: f32) {
        self.states.top_mut().size = size;
    }

    pub fn set_color(&mut self, color: Color) {
        self.states.top_mut().color = color;
    }

    pub fn set_font(&mut self, font: FontId) {
        self.states.top_mut().font = Some(font);
    }

    pub fn set_align(&mut self, align: Align) {
        self.states.top_mut().align = align;
    }

    // Batching

    pub fn flush_mode(&self) -> FlushMode {
        self.flush_mode
    }

    pub fn set_flush_mode(&mut self, mode: FlushMode) {
        self.flush_mode = mode;
    }

    /// Switch to `mode` until the returned guard is dropped.
    pub fn scoped_flush_mode(&mut self, mode: FlushMode) -> FlushModeGuard<'_, B, S, P> {
        FlushModeGuard::new(self, mode)
    }

    /// Send buffered vertices to the sink. Returns whether anything was drawn.
    pub fn flush(&mut self) -> bool {
        self.batch.flush(&mut self.sink)
    }

    /// Size in bytes of a full vertex buffer.
    pub fn max_buffer_bytes(&self) -> usize {
        self.batch.max_bytes()
    }

    /// Vertices waiting for the next flush.
    pub fn pending_vertices(&self) -> &[Vertex] {
        self.batch.pending()
    }

    // Glyphs

    /// Look up or rasterize one glyph.
    ///
    /// Returns `None` for an invalid font, when the atlas has no room even
    /// after the retry, or when the glyph table cannot grow.
    pub fn get_glyph(&mut self, font: FontId, codepoint: u32, size: u32, padding: u32) -> Option<Glyph> {
        GlyphCache {
            fonts: &mut self.fonts,
            backend: &self.backend,
            atlas: &mut self.atlas,
            sink: &mut self.sink,
            sdf: &self.config.sdf,
            stats: &mut self.stats,
        }
        .get(font, codepoint, size, padding)
    }

    fn glyph(&mut self, font: FontId, codepoint: u32) -> Option<Glyph> {
        let (size, padding) = (self.config.glyph_size, self.config.glyph_padding);
        self.get_glyph(font, codepoint, size, padding)
    }

    /// Drop every cached glyph and start the atlas over.
    ///
    /// Pending vertices are flushed first since they reference the old atlas.
    /// The sink keeps its pixels; new glyphs overwrite them as they arrive.
    pub fn reset_atlas(&mut self) {
        self.batch.flush(&mut self.sink);
        let dropped = self.fonts.glyph_count();
        self.fonts.clear_glyphs();
        self.atlas.reset();
        debug!(dropped, "glyph atlas reset");
    }

    // Drawing

    /// Draw `text` with its first baseline at `(x, y)`.
    ///
    /// Lines break on `\n`, `\r` and `\r\n`; each following line starts one
    /// line height lower (coordinates are y-up). Returns the pen position
    /// after the last glyph, or at the start of the next line when the text
    /// ends with a break.
    pub fn draw_text(&mut self, x: f32, y: f32, text: impl AsRef<[u8]>) -> Vec2 {
        profile_function!();
        let text = text.as_ref();
        let Some((font, style)) = self.current_style() else {
            return vec2(x, y);
        };
        let line_height = self.line_metrics(font, style.size).line_height;

        let mut pen = vec2(x, y);
        {
            let mut ctx = self.scoped_flush_mode(FlushMode::Manual);
            for line in layout::lines(text) {
                let end = ctx.emit_line(font, &style, line.text, pen);
                if line.has_break {
                    pen = vec2(x, pen.y - line_height);
                } else {
                    pen = end;
                }
            }
        }
        self.end_draw();
        pen
    }

    /// Draw a single line. Line break bytes are treated like any other
    /// codepoint. Returns the pen position after the last glyph.
    pub fn draw_line(&mut self, x: f32, y: f32, text: impl AsRef<[u8]>) -> Vec2 {
        profile_function!();
        let Some((font, style)) = self.current_style() else {
            return vec2(x, y);
        };
        self.emit_line(font, &style, text.as_ref(), vec2(x, y))
    }

    /// Ink bounds `draw_text` would cover, without emitting vertices.
    ///
    /// Glyphs are still rasterized into the atlas as needed. Returns `None`
    /// when no valid font is selected.
    pub fn text_bounds(&mut self, x: f32, y: f32, text: impl AsRef<[u8]>) -> Option<InkExtents> {
        let (font, style) = self.current_style()?;
        let metrics = self.line_metrics(font, style.size);

        let mut pen = vec2(x, y);
        let mut bounds = InkExtents {
            min: pen,
            max: pen,
            advance: 0.0,
        };
        for line in layout::lines(text.as_ref()) {
            let (extents, offset) = self.measure_line(font, &style, line.text);
            bounds = bounds.union(&extents.translate(pen + offset));
            pen.y -= metrics.line_height;
        }
        Some(bounds)
    }

    /// Metrics of the current font at the current size.
    pub fn vertical_metrics(&self) -> Option<LineMetrics> {
        let (font, style) = self.current_style()?;
        Some(self.line_metrics(font, style.size))
    }

    fn current_style(&self) -> Option<(FontId, StyleState)> {
        let style = *self.states.top();
        match style.font {
            Some(font) if self.fonts.contains(font) => Some((font, style)),
            font => {
                debug!(?font, "no valid font selected, skipping text");
                None
            }
        }
    }

    fn font_metrics(&self, font: FontId, size: f32) -> (VerticalMetrics, f32) {
        self.fonts
            .get(font)
            .map(|f| {
                let face = f.face();
                (
                    self.backend.v_metrics(face),
                    self.backend.scale_for_pixel_height(face, size),
                )
            })
            .unwrap_or_default()
    }

    fn line_metrics(&self, font: FontId, size: f32) -> LineMetrics {
        let (metrics, scale) = self.font_metrics(font, size);
        LineMetrics {
            ascent: metrics.ascent as f32 * scale,
            descent: metrics.descent as f32 * scale,
            line_height: layout::line_height(&metrics, scale),
        }
    }

    /// Measure a line and compute the offset from the pen to the line's
    /// aligned glyph origin.
    fn measure_line(&mut self, font: FontId, style: &StyleState, text: &[u8]) -> (InkExtents, Vec2) {
        let ratio = style.size / self.config.glyph_size as f32;
        let extents = layout::measure_line(Codepoints::new(text), ratio, |codepoint| {
            self.glyph(font, codepoint)
        });

        let (metrics, scale) = self.font_metrics(font, style.size);
        let offset = vec2(
            layout::horizontal_offset(&extents, style.align.horizontal()),
            layout::vertical_offset(&metrics, scale, style.align.vertical()),
        );
        (extents, offset)
    }

    fn emit_line(&mut self, font: FontId, style: &StyleState, text: &[u8], pen: Vec2) -> Vec2 {
        let ratio = style.size / self.config.glyph_size as f32;
        let (_, offset) = self.measure_line(font, style, text);
        let atlas_size = (self.atlas.width(), self.atlas.height());

        let origin = pen + offset;
        let mut x = origin.x;
        for codepoint in Codepoints::new(text) {
            let Some(glyph) = self.glyph(font, codepoint) else {
                continue;
            };
            if glyph.has_ink() {
                let quad = glyph_quad(&glyph, x, origin.y, ratio, atlas_size, style.color);
                self.batch.push_quad(&quad, &mut self.sink);
            }
            x += glyph.advance * ratio;
        }

        self.end_draw();
        vec2(x, pen.y)
    }

    fn end_draw(&mut self) {
        if self.flush_mode == FlushMode::Automatic {
            self.batch.flush(&mut self.sink);
        }
    }

    // Access

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn packer(&self) -> &P {
        self.atlas.packer()
    }

    pub fn stats(&self) -> ContextStats {
        ContextStats {
            fonts: self.fonts.len(),
            glyphs: self.fonts.glyph_count(),
            cache: self.stats,
            flushes: self.batch.flushes(),
        }
    }
}

impl<B, S, P> Drop for Context<B, S, P>
where
    B: FontBackend,
    S: RenderSink,
    P: RectPacker,
{
    fn drop(&mut self) {
        debug!(fonts = self.fonts.len(), "destroying text context");
        self.fonts.clear();
        self.sink.destroy();
    }
}

/// Overrides a context's flush mode until dropped.
///
/// Derefs to the context, so draw calls can be made through the guard.
pub struct FlushModeGuard<'a, B: FontBackend, S: RenderSink, P: RectPacker> {
    ctx: &'a mut Context<B, S, P>,
    previous: FlushMode,
}

impl<'a, B, S, P> FlushModeGuard<'a, B, S, P>
where
    B: FontBackend,
    S: RenderSink,
    P: RectPacker,
{
    fn new(ctx: &'a mut Context<B, S, P>, mode: FlushMode) -> Self {
        let previous = ctx.flush_mode;
        ctx.flush_mode = mode;
        Self { ctx, previous }
    }

    /// Mode that will be restored on drop.
    pub fn previous(&self) -> FlushMode {
        self.previous
    }
}

impl<B, S, P> Deref for FlushModeGuard<'_, B, S, P>
where
    B: FontBackend,
    S: RenderSink,
    P: RectPacker,
{
    type Target = Context<B, S, P>;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl<B, S, P> DerefMut for FlushModeGuard<'_, B, S, P>
where
    B: FontBackend,
    S: RenderSink,
    P: RectPacker,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl<B, S, P> Drop for FlushModeGuard<'_, B, S, P>
where
    B: FontBackend,
    S: RenderSink,
    P: RectPacker,
{
    fn drop(&mut self) {
        self.ctx.flush_mode = self.previous;
    }
}
