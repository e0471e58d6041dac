//! Signed Distance Field (SDF) generation.
//!
//! SDF glyphs store, per texel, the distance to the nearest outline edge
//! instead of coverage, so one rasterization serves every draw size:
//! - Exactly on the edge: `on_edge_value`
//! - Inside the glyph: larger values, rising by `pixel_dist_scale` per pixel
//! - Outside the glyph: smaller values, falling by `pixel_dist_scale` per pixel
//!
//! [`Outline`] collects a glyph contour as flattened line segments in pixel
//! space (y-up); [`generate_sdf`] then measures each texel center against it.

use fontcache_core::math::{Vec2, vec2};

/// SDF generation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SdfConfig {
    /// Normalized value stored on the outline (0.0 to 1.0).
    pub edge_value: f32,
    /// Value change per pixel of distance, in 0-255 texel units.
    pub pixel_dist_scale: f32,
}

impl Default for SdfConfig {
    fn default() -> Self {
        Self {
            edge_value: 0.8,
            pixel_dist_scale: 32.0,
        }
    }
}

impl SdfConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the normalized edge value.
    pub fn edge_value(mut self, value: f32) -> Self {
        self.edge_value = value.clamp(0.0, 1.0);
        self
    }

    /// Set the distance scale.
    pub fn pixel_dist_scale(mut self, scale: f32) -> Self {
        self.pixel_dist_scale = scale.max(0.0);
        self
    }

    /// Edge value as stored in the 8-bit atlas.
    pub fn on_edge_byte(&self) -> u8 {
        (self.edge_value.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// A straight piece of a flattened contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    fn distance_squared(&self, p: Vec2) -> f32 {
        let ab = self.b - self.a;
        let len_sq = ab.length_squared();
        let t = if len_sq > 0.0 {
            ((p - self.a).dot(ab) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (self.a + ab * t).distance_squared(p)
    }

    /// Contribution to the nonzero winding number around `p`.
    fn winding(&self, p: Vec2) -> i32 {
        let side = (self.b.x - self.a.x) * (p.y - self.a.y) - (p.x - self.a.x) * (self.b.y - self.a.y);
        if self.a.y <= p.y {
            if self.b.y > p.y && side > 0.0 {
                return 1;
            }
        } else if self.b.y <= p.y && side < 0.0 {
            return -1;
        }
        0
    }
}

/// Glyph outline flattened to line segments.
#[derive(Debug, Clone, Default)]
pub struct Outline {
    segments: Vec<Segment>,
    start: Vec2,
    current: Vec2,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.close();
        self.start = vec2(x, y);
        self.current = self.start;
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        let to = vec2(x, y);
        if to != self.current {
            self.segments.push(Segment {
                a: self.current,
                b: to,
            });
        }
        self.current = to;
    }

    pub fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let p0 = self.current;
        let p1 = vec2(x1, y1);
        let p2 = vec2(x, y);
        let steps = subdivisions(p0.distance(p1) + p1.distance(p2));
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let mt = 1.0 - t;
            let p = p0 * (mt * mt) + p1 * (2.0 * mt * t) + p2 * (t * t);
            self.line_to(p.x, p.y);
        }
    }

    pub fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let p0 = self.current;
        let p1 = vec2(x1, y1);
        let p2 = vec2(x2, y2);
        let p3 = vec2(x, y);
        let steps = subdivisions(p0.distance(p1) + p1.distance(p2) + p2.distance(p3));
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let mt = 1.0 - t;
            let p = p0 * (mt * mt * mt)
                + p1 * (3.0 * mt * mt * t)
                + p2 * (3.0 * mt * t * t)
                + p3 * (t * t * t);
            self.line_to(p.x, p.y);
        }
    }

    /// Close the current contour back to its start point.
    pub fn close(&mut self) {
        if self.current != self.start {
            let start = self.start;
            self.line_to(start.x, start.y);
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn signed_distance(&self, p: Vec2) -> f32 {
        let mut min_sq = f32::MAX;
        let mut winding = 0;
        for segment in &self.segments {
            min_sq = min_sq.min(segment.distance_squared(p));
            winding += segment.winding(p);
        }
        let dist = min_sq.sqrt();
        if winding != 0 { dist } else { -dist }
    }
}

/// One segment per ~2px of control polygon length, capped.
fn subdivisions(length: f32) -> u32 {
    ((length / 2.0).ceil() as u32).clamp(1, 16)
}

/// Generate an SDF bitmap from a closed outline.
///
/// `top_left` is the pixel-space (y-up) position of the bitmap's top-left
/// corner; row 0 of the result is the top row.
pub fn generate_sdf(
    outline: &Outline,
    top_left: Vec2,
    width: u32,
    height: u32,
    config: &SdfConfig,
) -> Vec<u8> {
    if width == 0 || height == 0 || outline.is_empty() {
        return Vec::new();
    }

    let on_edge = f32::from(config.on_edge_byte());
    let mut output = Vec::with_capacity(width as usize * height as usize);

    for row in 0..height {
        let y = top_left.y - row as f32 - 0.5;
        for col in 0..width {
            let x = top_left.x + col as f32 + 0.5;
            let dist = outline.signed_distance(vec2(x, y));
            let value = on_edge + dist * config.pixel_dist_scale;
            output.push(value.clamp(0.0, 255.0) as u8);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f32, max: f32) -> Outline {
        let mut outline = Outline::new();
        outline.move_to(min, min);
        outline.line_to(max, min);
        outline.line_to(max, max);
        outline.line_to(min, max);
        outline.close();
        outline
    }

    #[test]
    fn test_sdf_config_default() {
        let config = SdfConfig::default();
        assert_eq!(config.edge_value, 0.8);
        assert_eq!(config.pixel_dist_scale, 32.0);
        assert_eq!(config.on_edge_byte(), 204);
    }

    #[test]
    fn test_sdf_config_builder_clamps() {
        let config = SdfConfig::new().edge_value(2.0).pixel_dist_scale(-5.0);
        assert_eq!(config.edge_value, 1.0);
        assert_eq!(config.pixel_dist_scale, 0.0);
    }

    #[test]
    fn test_close_adds_closing_segment() {
        let outline = square(0.0, 4.0);
        assert_eq!(outline.segments().len(), 4);
    }

    #[test]
    fn test_quad_is_flattened() {
        let mut outline = Outline::new();
        outline.move_to(0.0, 0.0);
        outline.quad_to(10.0, 10.0, 20.0, 0.0);
        assert!(outline.segments().len() > 1);
        let last = outline.segments().last().copied();
        assert_eq!(last.map(|s| s.b), Some(vec2(20.0, 0.0)));
    }

    #[test]
    fn test_inside_is_brighter_than_outside() {
        // 8x8 square drawn into a 12x12 bitmap with 2px padding.
        let outline = square(0.0, 8.0);
        let config = SdfConfig::default();
        let sdf = generate_sdf(&outline, vec2(-2.0, 10.0), 12, 12, &config);
        assert_eq!(sdf.len(), 144);

        let at = |col: usize, row: usize| sdf[row * 12 + col];
        let center = at(6, 6);
        let corner = at(0, 0);
        assert!(center > config.on_edge_byte());
        assert!(corner < config.on_edge_byte());
    }

    #[test]
    fn test_edge_texels_near_on_edge_value() {
        let outline = square(0.0, 8.0);
        let config = SdfConfig::new().pixel_dist_scale(10.0);
        // Texel centers half a pixel inside the left edge.
        let sdf = generate_sdf(&outline, vec2(0.0, 8.0), 8, 8, &config);
        let value = sdf[4 * 8];
        assert_eq!(value, 209);
    }

    #[test]
    fn test_empty_outline_produces_nothing() {
        let outline = Outline::new();
        assert!(generate_sdf(&outline, Vec2::ZERO, 4, 4, &SdfConfig::default()).is_empty());
    }
}
