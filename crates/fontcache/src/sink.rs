use crate::atlas::AtlasRegion;
use crate::batch::Vertex;
use crate::error::ErrorCode;

/// Receiver for everything the cache produces.
///
/// The sink owns the atlas texture and the draw path. All methods are invoked
/// synchronously from inside [`Context`](crate::Context) calls.
///
/// # Example
///
/// ```
/// use fontcache::{AtlasRegion, ErrorCode, RenderSink, Vertex};
///
/// #[derive(Default)]
/// struct CpuAtlas {
///     width: u32,
///     pixels: Vec<u8>,
///     vertices: Vec<Vertex>,
/// }
///
/// impl RenderSink for CpuAtlas {
///     fn create(&mut self, width: u32, height: u32) -> bool {
///         self.width = width;
///         self.pixels = vec![0; (width * height) as usize];
///         true
///     }
///
///     fn update_atlas(&mut self, region: AtlasRegion, pixels: &[u8]) {
///         for row in 0..region.height {
///             let src = (row * region.width) as usize;
///             let dst = ((region.y + row) * self.width + region.x) as usize;
///             let len = region.width as usize;
///             self.pixels[dst..dst + len].copy_from_slice(&pixels[src..src + len]);
///         }
///     }
///
///     fn draw(&mut self, vertices: &mut [Vertex]) {
///         self.vertices.extend_from_slice(vertices);
///     }
/// }
/// ```
pub trait RenderSink {
    /// Create the `width` x `height` single-channel atlas.
    ///
    /// Returning `false` aborts context creation.
    fn create(&mut self, width: u32, height: u32) -> bool {
        let _ = (width, height);
        true
    }

    /// Copy a freshly rasterized glyph into the atlas. `pixels` is row-major,
    /// `region.width * region.height` bytes, row 0 at the region's top.
    fn update_atlas(&mut self, region: AtlasRegion, pixels: &[u8]);

    /// Draw a batch of triangles. The slice is only valid for this call.
    fn draw(&mut self, vertices: &mut [Vertex]);

    /// Release the atlas. Called exactly once, when the context goes away.
    fn destroy(&mut self) {}

    /// A recoverable capacity condition occurred.
    fn error(&mut self, code: ErrorCode) {
        let _ = code;
    }
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn create(&mut self, width: u32, height: u32) -> bool {
        (**self).create(width, height)
    }

    fn update_atlas(&mut self, region: AtlasRegion, pixels: &[u8]) {
        (**self).update_atlas(region, pixels);
    }

    fn draw(&mut self, vertices: &mut [Vertex]) {
        (**self).draw(vertices);
    }

    fn destroy(&mut self) {
        (**self).destroy();
    }

    fn error(&mut self, code: ErrorCode) {
        (**self).error(code);
    }
}
