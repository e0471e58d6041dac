//! Per-font glyph table.
//!
//! Glyphs live in an append-only `Vec` and are looked up through a fixed
//! 256-bucket table. Each bucket holds the index of the most recently inserted
//! glyph with that hash; each glyph links to the previous head of its bucket,
//! so every entry stays reachable from its bucket chain.

use tracing::warn;

/// Number of buckets in the lookup table.
pub const HASH_LUT_SIZE: usize = 256;

/// Capacity reserved the first time a table grows.
pub const INITIAL_GLYPH_CAPACITY: usize = 256;

/// A rasterized glyph resident in the atlas.
///
/// `x0..x1` / `y0..y1` is the ink box in pixels at `size`, y-up, already
/// widened by the SDF padding. `s0..s1` / `t0..t1` are atlas texels with `t`
/// stored flipped (`t0` is the bottom row) for a bottom-left-origin atlas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Glyph {
    pub codepoint: u32,
    /// Backend glyph index in the font that produced the outline.
    pub index: u32,
    /// Pixel size the glyph was rasterized at.
    pub size: u32,
    /// Horizontal advance in pixels at `size`.
    pub advance: f32,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub s0: u32,
    pub t0: u32,
    pub s1: u32,
    pub t1: u32,
}

impl Glyph {
    /// Whether this glyph has an atlas image to draw.
    ///
    /// Non-printing glyphs (space, tab) have a zero-area texture rectangle
    /// and only advance the pen.
    pub fn has_ink(&self) -> bool {
        self.s0 != self.s1 && self.t0 != self.t1
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// Integer avalanche hash used to pick a glyph bucket.
pub fn hash_codepoint(codepoint: u32) -> u32 {
    let mut a = codepoint;
    a = a.wrapping_add(!(a << 15));
    a ^= a >> 10;
    a = a.wrapping_add(a << 3);
    a ^= a >> 6;
    a = a.wrapping_add(!(a << 11));
    a ^= a >> 16;
    a
}

fn bucket(codepoint: u32) -> usize {
    (hash_codepoint(codepoint) as usize) & (HASH_LUT_SIZE - 1)
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    glyph: Glyph,
    next: Option<u32>,
}

/// Hash-chained glyph storage for one font.
#[derive(Debug, Clone)]
pub struct GlyphTable {
    entries: Vec<Entry>,
    lut: [Option<u32>; HASH_LUT_SIZE],
}

impl Default for GlyphTable {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphTable {
    /// Create an empty table. No storage is allocated until the first insert.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            lut: [None; HASH_LUT_SIZE],
        }
    }

    /// Find the glyph cached for `(codepoint, size)`.
    pub fn find(&self, codepoint: u32, size: u32) -> Option<&Glyph> {
        let mut cursor = self.lut[bucket(codepoint)];
        while let Some(i) = cursor {
            let entry = self.entries.get(i as usize)?;
            if entry.glyph.codepoint == codepoint && entry.glyph.size == size {
                return Some(&entry.glyph);
            }
            cursor = entry.next;
        }
        None
    }

    /// Append a glyph and link it into its bucket.
    ///
    /// Storage grows by doubling. If growing fails the table is left exactly
    /// as it was and `None` is returned.
    pub fn insert(&mut self, glyph: Glyph) -> Option<&Glyph> {
        if self.entries.len() == self.entries.capacity() {
            let additional = self.entries.capacity().max(INITIAL_GLYPH_CAPACITY);
            if self.entries.try_reserve_exact(additional).is_err() {
                warn!(
                    capacity = self.entries.capacity(),
                    "glyph table allocation failed"
                );
                return None;
            }
        }

        let index = u32::try_from(self.entries.len()).ok()?;
        let slot = bucket(glyph.codepoint);
        self.entries.push(Entry {
            glyph,
            next: self.lut[slot],
        });
        self.lut[slot] = Some(index);
        self.entries.last().map(|entry| &entry.glyph)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Drop every glyph but keep the allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lut = [None; HASH_LUT_SIZE];
    }

    /// Glyphs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Glyph> {
        self.entries.iter().map(|entry| &entry.glyph)
    }
}
