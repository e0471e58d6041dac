//! Vertex batching.

use static_assertions::const_assert_eq;
use tracing::debug;

use fontcache_core::Color;
use fontcache_core::profiling::profile_function;

use crate::error::{FontCacheError, FontCacheResult};
use crate::glyph::Glyph;
use crate::sink::RenderSink;

/// Vertices emitted per glyph quad (two triangles).
pub const VERTICES_PER_QUAD: usize = 6;

/// Vertex data for SDF text rendering.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<Vertex>(), 32);

impl Vertex {
    pub fn new(x: f32, y: f32, s: f32, t: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            tex_coords: [s, t],
            color,
        }
    }
}

/// When buffered vertices are handed to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushMode {
    /// Flush when the buffer fills and at the end of every draw call.
    #[default]
    Automatic,
    /// Flush only when the buffer fills or on an explicit flush.
    Manual,
}

/// Build the six vertices for `glyph` drawn with its origin at `(x, y)`.
///
/// `ratio` scales cached glyph pixels to draw pixels; texel coordinates are
/// normalized by the atlas size.
pub fn glyph_quad(
    glyph: &Glyph,
    x: f32,
    y: f32,
    ratio: f32,
    atlas_size: (u32, u32),
    color: Color,
) -> [Vertex; VERTICES_PER_QUAD] {
    let x0 = x + glyph.x0 * ratio;
    let y0 = y + glyph.y0 * ratio;
    let x1 = x + glyph.x1 * ratio;
    let y1 = y + glyph.y1 * ratio;

    let (w, h) = (atlas_size.0 as f32, atlas_size.1 as f32);
    let s0 = glyph.s0 as f32 / w;
    let t0 = glyph.t0 as f32 / h;
    let s1 = glyph.s1 as f32 / w;
    let t1 = glyph.t1 as f32 / h;

    let c = color.to_array();
    let bottom_left = Vertex::new(x0, y0, s0, t0, c);
    let top_left = Vertex::new(x0, y1, s0, t1, c);
    let bottom_right = Vertex::new(x1, y0, s1, t0, c);
    let top_right = Vertex::new(x1, y1, s1, t1, c);

    [
        bottom_left,
        top_left,
        bottom_right,
        bottom_right,
        top_left,
        top_right,
    ]
}

/// Fixed-capacity vertex buffer.
#[derive(Debug)]
pub struct VertexBatch {
    vertices: Vec<Vertex>,
    max_vertices: usize,
    flushes: u64,
}

impl VertexBatch {
    /// Allocate room for `max_quads` quads up front.
    pub fn new(max_quads: usize) -> FontCacheResult<Self> {
        let max_vertices = max_quads
            .checked_mul(VERTICES_PER_QUAD)
            .ok_or(FontCacheError::OutOfMemory("vertex"))?;
        let mut vertices = Vec::new();
        vertices
            .try_reserve_exact(max_vertices)
            .map_err(|_| FontCacheError::OutOfMemory("vertex"))?;
        Ok(Self {
            vertices,
            max_vertices,
            flushes: 0,
        })
    }

    /// Append a quad, flushing first if it would not fit.
    pub fn push_quad<S: RenderSink>(&mut self, quad: &[Vertex; VERTICES_PER_QUAD], sink: &mut S) {
        if self.vertices.len() + VERTICES_PER_QUAD > self.max_vertices {
            self.flush(sink);
        }
        self.vertices.extend_from_slice(quad);
    }

    /// Hand buffered vertices to `sink`. Returns whether anything was drawn.
    pub fn flush<S: RenderSink>(&mut self, sink: &mut S) -> bool {
        if self.vertices.is_empty() {
            return false;
        }
        profile_function!();

        debug!(vertices = self.vertices.len(), "flushing text batch");
        sink.draw(&mut self.vertices);
        self.vertices.clear();
        self.flushes += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    /// Size of a full buffer in bytes.
    pub fn max_bytes(&self) -> usize {
        self.max_vertices * std::mem::size_of::<Vertex>()
    }

    /// Number of non-empty flushes so far.
    pub fn flushes(&self) -> u64 {
        self.flushes
    }

    /// Vertices waiting to be flushed.
    pub fn pending(&self) -> &[Vertex] {
        &self.vertices
    }
}
