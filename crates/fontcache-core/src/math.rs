//! Math types re-exported from [`glam`].
//!
//! Pen positions and ink extents are plain [`Vec2`] values.

pub use glam::{Vec2, vec2};
