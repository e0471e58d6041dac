//! Line splitting and alignment.

use fontcache_core::math::{Vec2, vec2};

use crate::backend::VerticalMetrics;
use crate::glyph::Glyph;
use crate::state::{HorizontalAlign, VerticalAlign};

/// One line of input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line bytes without the terminator.
    pub text: &'a [u8],
    /// Whether a line break followed the text.
    pub has_break: bool,
}

/// Iterator over the lines of a byte string.
///
/// `\n`, `\r` and `\r\n` each end exactly one line. A trailing break does not
/// produce an extra empty line, and empty input produces no lines.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a [u8],
}

/// Split `text` on line breaks.
pub fn lines(text: &[u8]) -> Lines<'_> {
    Lines { rest: text }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        if self.rest.is_empty() {
            return None;
        }

        let Some(end) = self.rest.iter().position(|&b| b == b'\n' || b == b'\r') else {
            let text = self.rest;
            self.rest = &[];
            return Some(Line {
                text,
                has_break: false,
            });
        };

        let text = &self.rest[..end];
        let skip = match &self.rest[end..] {
            [b'\r', b'\n', ..] => 2,
            _ => 1,
        };
        self.rest = &self.rest[end + skip..];
        Some(Line {
            text,
            has_break: true,
        })
    }
}

/// Ink bounds of a laid out line, relative to its pen origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InkExtents {
    /// Bottom-left corner of the ink (y-up).
    pub min: Vec2,
    /// Top-right corner of the ink (y-up).
    pub max: Vec2,
    /// Pen advance after the last glyph.
    pub advance: f32,
}

impl InkExtents {
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn is_empty(&self) -> bool {
        self.min == self.max
    }

    /// Extents moved by `offset`.
    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
            advance: self.advance,
        }
    }

    /// Smallest extents covering both. Empty extents are ignored.
    pub fn union(&self, other: &InkExtents) -> Self {
        if self.is_empty() {
            return InkExtents {
                advance: self.advance.max(other.advance),
                ..*other
            };
        }
        if other.is_empty() {
            return InkExtents {
                advance: self.advance.max(other.advance),
                ..*self
            };
        }
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            advance: self.advance.max(other.advance),
        }
    }
}

/// Measure one line of codepoints.
///
/// `ratio` converts cached glyph pixels to draw pixels. `resolve` is called
/// once per codepoint and may populate the glyph cache; codepoints it cannot
/// resolve contribute nothing.
pub fn measure_line<I, F>(codepoints: I, ratio: f32, mut resolve: F) -> InkExtents
where
    I: IntoIterator<Item = u32>,
    F: FnMut(u32) -> Option<Glyph>,
{
    let mut pen = 0.0_f32;
    let mut ink: Option<(Vec2, Vec2)> = None;

    for codepoint in codepoints {
        let Some(glyph) = resolve(codepoint) else {
            continue;
        };
        if glyph.has_ink() {
            let lo = vec2(pen + glyph.x0 * ratio, glyph.y0 * ratio);
            let hi = vec2(pen + glyph.x1 * ratio, glyph.y1 * ratio);
            ink = Some(match ink {
                Some((min, max)) => (min.min(lo), max.max(hi)),
                None => (lo, hi),
            });
        }
        pen += glyph.advance * ratio;
    }

    let (min, max) = ink.unwrap_or_default();
    InkExtents {
        min,
        max,
        advance: pen,
    }
}

/// Horizontal pen offset that places `extents` according to `align`.
pub fn horizontal_offset(extents: &InkExtents, align: HorizontalAlign) -> f32 {
    let width = extents.width();
    -extents.min.x
        - match align {
            HorizontalAlign::Left => 0.0,
            HorizontalAlign::Center => width * 0.5,
            HorizontalAlign::Right => width,
        }
}

/// Vertical pen offset from the pen to the baseline.
pub fn vertical_offset(metrics: &VerticalMetrics, scale: f32, align: VerticalAlign) -> f32 {
    let ascent = metrics.ascent as f32 * scale;
    let descent = metrics.descent as f32 * scale;
    match align {
        VerticalAlign::Baseline => 0.0,
        VerticalAlign::Top => -ascent,
        VerticalAlign::Middle => -(ascent + descent) * 0.5,
        VerticalAlign::Bottom => -descent,
    }
}

/// Distance between consecutive baselines in pixels.
pub fn line_height(metrics: &VerticalMetrics, scale: f32) -> f32 {
    metrics.line_height() as f32 * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<(&str, bool)> {
        lines(text.as_bytes())
            .map(|line| (std::str::from_utf8(line.text).unwrap_or("?"), line.has_break))
            .collect()
    }

    #[test]
    fn test_lines_single() {
        assert_eq!(split("abc"), vec![("abc", false)]);
    }

    #[test]
    fn test_lines_empty() {
        assert!(split("").is_empty());
    }

    #[test]
    fn test_lines_all_terminators() {
        assert_eq!(
            split("a\nb\rc\r\nd"),
            vec![("a", true), ("b", true), ("c", true), ("d", false)]
        );
    }

    #[test]
    fn test_lines_trailing_break() {
        assert_eq!(split("a\n"), vec![("a", true)]);
    }

    #[test]
    fn test_lines_only_breaks() {
        assert_eq!(split("\n\n"), vec![("", true), ("", true)]);
        assert_eq!(split("\r\n\r"), vec![("", true), ("", true)]);
    }

    #[test]
    fn test_crlf_is_one_break() {
        assert_eq!(split("\r\n"), vec![("", true)]);
    }

    fn inked(advance: f32, x0: f32, x1: f32) -> Glyph {
        Glyph {
            advance,
            x0,
            y0: -2.0,
            x1,
            y1: 10.0,
            s1: 1,
            t0: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_measure_line() {
        let extents = measure_line([1u32, 2], 0.5, |_| Some(inked(20.0, 2.0, 18.0)));
        assert_eq!(extents.min, vec2(1.0, -1.0));
        assert_eq!(extents.max, vec2(19.0, 5.0));
        assert_eq!(extents.advance, 20.0);
    }

    #[test]
    fn test_measure_skips_unresolved_and_blank() {
        let blank = Glyph {
            advance: 8.0,
            ..Default::default()
        };
        let extents = measure_line([0u32, 1, 2], 1.0, |cp| match cp {
            0 => None,
            1 => Some(blank),
            _ => Some(inked(10.0, 1.0, 9.0)),
        });
        assert_eq!(extents.min.x, 9.0);
        assert_eq!(extents.max.x, 17.0);
        assert_eq!(extents.advance, 18.0);
    }

    #[test]
    fn test_measure_empty() {
        let extents = measure_line(std::iter::empty(), 1.0, |_| None);
        assert!(extents.is_empty());
        assert_eq!(extents.advance, 0.0);
    }

    #[test]
    fn test_horizontal_offsets() {
        let extents = InkExtents {
            min: vec2(2.0, 0.0),
            max: vec2(12.0, 5.0),
            advance: 14.0,
        };
        assert_eq!(horizontal_offset(&extents, HorizontalAlign::Left), -2.0);
        assert_eq!(horizontal_offset(&extents, HorizontalAlign::Center), -7.0);
        assert_eq!(horizontal_offset(&extents, HorizontalAlign::Right), -12.0);
    }

    #[test]
    fn test_vertical_offsets() {
        let metrics = VerticalMetrics {
            ascent: 16,
            descent: -4,
            line_gap: 0,
        };
        assert_eq!(vertical_offset(&metrics, 0.5, VerticalAlign::Baseline), 0.0);
        assert_eq!(vertical_offset(&metrics, 0.5, VerticalAlign::Top), -8.0);
        assert_eq!(vertical_offset(&metrics, 0.5, VerticalAlign::Middle), -3.0);
        assert_eq!(vertical_offset(&metrics, 0.5, VerticalAlign::Bottom), 2.0);
        assert_eq!(line_height(&metrics, 0.5), 10.0);
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = InkExtents {
            min: vec2(0.0, 0.0),
            max: vec2(4.0, 4.0),
            advance: 5.0,
        };
        let empty = InkExtents {
            advance: 9.0,
            ..Default::default()
        };
        let merged = a.union(&empty);
        assert_eq!(merged.min, a.min);
        assert_eq!(merged.max, a.max);
        assert_eq!(merged.advance, 9.0);
    }
}
