//! Atlas rectangle packing.
//!
//! [`RectPacker`] is the placement strategy; [`AtlasAllocator`] wraps one and
//! turns exhaustion into an [`ErrorCode::AtlasFull`] notification followed by
//! exactly one retry, giving the sink a chance to react.

use tracing::warn;

use crate::error::ErrorCode;
use crate::sink::RenderSink;

/// Rectangle placement inside a fixed-size surface.
pub trait RectPacker {
    /// Start over on an empty `width` x `height` surface.
    fn init(&mut self, width: u32, height: u32);

    /// Place a `width` x `height` rectangle, returning its top-left corner.
    fn pack(&mut self, width: u32, height: u32) -> Option<(u32, u32)>;
}

/// A packed rectangle in atlas texels, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AtlasRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl AtlasRegion {
    /// Normalized UV coordinates `(u0, v0, u1, v1)`.
    pub fn uv_coords(&self, atlas_width: u32, atlas_height: u32) -> (f32, f32, f32, f32) {
        let u0 = self.x as f32 / atlas_width as f32;
        let v0 = self.y as f32 / atlas_height as f32;
        let u1 = (self.x + self.width) as f32 / atlas_width as f32;
        let v1 = (self.y + self.height) as f32 / atlas_height as f32;
        (u0, v0, u1, v1)
    }

    pub fn area(&self) -> u32 {
        self.width * self.height
    }
}

/// Row-based shelf packer.
///
/// Rectangles are placed left to right; when a row is full the cursor drops
/// below the tallest rectangle of that row.
#[derive(Debug, Clone, Default)]
pub struct ShelfPacker {
    width: u32,
    height: u32,
    current_x: u32,
    current_y: u32,
    row_height: u32,
}

impl ShelfPacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Height consumed so far, including the open row.
    pub fn used_height(&self) -> u32 {
        self.current_y + self.row_height
    }
}

impl RectPacker for ShelfPacker {
    fn init(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    fn pack(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        if width > self.width {
            return None;
        }

        // Try to fit in current row
        if self.current_x + width > self.width {
            self.current_x = 0;
            self.current_y += self.row_height;
            self.row_height = 0;
        }

        if self.current_y + height > self.height {
            return None;
        }

        let placement = (self.current_x, self.current_y);
        self.current_x += width;
        self.row_height = self.row_height.max(height);
        Some(placement)
    }
}

/// Packer plus the atlas dimensions it was initialized with.
#[derive(Debug, Clone)]
pub struct AtlasAllocator<P> {
    packer: P,
    width: u32,
    height: u32,
}

impl<P: RectPacker> AtlasAllocator<P> {
    pub fn new(mut packer: P, width: u32, height: u32) -> Self {
        packer.init(width, height);
        Self {
            packer,
            width,
            height,
        }
    }

    /// Reserve a region, reporting [`ErrorCode::AtlasFull`] to `sink` on the
    /// first failure and retrying once.
    pub fn allocate<S: RenderSink>(
        &mut self,
        width: u32,
        height: u32,
        sink: &mut S,
    ) -> Option<AtlasRegion> {
        let (x, y) = match self.packer.pack(width, height) {
            Some(placement) => placement,
            None => {
                warn!(width, height, "glyph atlas full");
                sink.error(ErrorCode::AtlasFull);
                self.packer.pack(width, height)?
            }
        };
        Some(AtlasRegion {
            x,
            y,
            width,
            height,
        })
    }

    /// Forget every placement.
    pub fn reset(&mut self) {
        self.packer.init(self.width, self.height);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn packer(&self) -> &P {
        &self.packer
    }

    pub fn packer_mut(&mut self) -> &mut P {
        &mut self.packer
    }
}
