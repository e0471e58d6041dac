//! Drawing style and the bounded style stack.

use bitflags::bitflags;
use fontcache_core::Color;

use crate::error::ErrorCode;
use crate::font::FontId;

bitflags! {
    /// Text alignment relative to the pen position.
    ///
    /// Combine one horizontal and one vertical flag. When several flags of
    /// the same axis are set, `LEFT` beats `RIGHT` beats `CENTER`, and
    /// `TOP` beats `MIDDLE` beats `BOTTOM`; baseline is the vertical fallback.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Align: u8 {
        const LEFT     = 1 << 0;
        const CENTER   = 1 << 1;
        const RIGHT    = 1 << 2;

        const BASELINE = 1 << 3;
        const TOP      = 1 << 4;
        const MIDDLE   = 1 << 5;
        const BOTTOM   = 1 << 6;
    }
}

impl Default for Align {
    fn default() -> Self {
        Align::LEFT | Align::BASELINE
    }
}

/// Horizontal placement of a line relative to the pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    /// Ink starts at the pen.
    #[default]
    Left,
    /// Ink is centered on the pen.
    Center,
    /// Ink ends at the pen.
    Right,
}

/// Vertical placement of a line relative to the pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    /// Pen is on the baseline.
    #[default]
    Baseline,
    /// Pen is at the font's ascent line.
    Top,
    /// Pen is halfway between ascent and descent.
    Middle,
    /// Pen is at the font's descent line.
    Bottom,
}

impl Align {
    pub fn horizontal(self) -> HorizontalAlign {
        if self.contains(Align::LEFT) {
            HorizontalAlign::Left
        } else if self.contains(Align::RIGHT) {
            HorizontalAlign::Right
        } else if self.contains(Align::CENTER) {
            HorizontalAlign::Center
        } else {
            HorizontalAlign::Left
        }
    }

    pub fn vertical(self) -> VerticalAlign {
        if self.contains(Align::TOP) {
            VerticalAlign::Top
        } else if self.contains(Align::MIDDLE) {
            VerticalAlign::Middle
        } else if self.contains(Align::BOTTOM) {
            VerticalAlign::Bottom
        } else {
            VerticalAlign::Baseline
        }
    }
}

/// Default text size in pixels.
pub const DEFAULT_SIZE: f32 = 12.0;

/// One frame of the style stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleState {
    /// Text size in pixels.
    pub size: f32,
    pub color: Color,
    /// Selected font; nothing is drawn while this is `None`.
    pub font: Option<FontId>,
    pub align: Align,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            color: Color::WHITE,
            font: None,
            align: Align::default(),
        }
    }
}

/// Bounded save/restore stack of [`StyleState`] frames.
///
/// Holds at least one frame at all times.
#[derive(Debug, Clone)]
pub struct StateStack {
    frames: Vec<StyleState>,
    max_depth: usize,
}

impl StateStack {
    /// Create a stack holding one default frame. `max_depth` is clamped to 1.
    pub fn new(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        let mut frames = Vec::with_capacity(max_depth);
        frames.push(StyleState::default());
        Self { frames, max_depth }
    }

    /// Duplicate the top frame.
    pub fn push(&mut self) -> Result<(), ErrorCode> {
        if self.frames.len() >= self.max_depth {
            return Err(ErrorCode::StatesOverflow);
        }
        let top = *self.top();
        self.frames.push(top);
        Ok(())
    }

    /// Discard the top frame.
    pub fn pop(&mut self) -> Result<(), ErrorCode> {
        if self.frames.len() <= 1 {
            return Err(ErrorCode::StatesUnderflow);
        }
        self.frames.pop();
        Ok(())
    }

    /// Reset the top frame to defaults. Frames below it are untouched.
    pub fn clear(&mut self) {
        *self.top_mut() = StyleState::default();
    }

    pub fn top(&self) -> &StyleState {
        // The base frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    pub fn top_mut(&mut self) -> &mut StyleState {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
