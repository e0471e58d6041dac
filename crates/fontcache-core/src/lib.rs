//! fontcache core
//!
//! Small shared utilities for the fontcache crates: hash collections, logging
//! setup, profiling scopes, math re-exports and the [`Color`](color::Color) type.

pub mod alloc;
pub mod color;
pub mod logging;
pub mod math;
pub mod profiling;

pub use color::Color;
