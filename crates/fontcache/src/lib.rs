//! fontcache - size-agnostic SDF text rendering
//!
//! Glyphs are rasterized once, as signed distance fields at a fixed pixel
//! size, into a single-channel atlas. Text at any size is then drawn as
//! textured quads scaled from those cached glyphs.
//!
//! The crate never talks to a graphics API. It is wired to the outside world
//! through three traits:
//! - [`FontBackend`]: parses fonts, answers metric queries and produces SDF
//!   bitmaps ([`TtfBackend`] with the default `ttf` feature)
//! - [`RectPacker`]: places glyph bitmaps inside the atlas ([`ShelfPacker`])
//! - [`RenderSink`]: owns the atlas texture and draws vertex batches
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fontcache::{Color, Context, ContextConfig, TtfBackend};
//! # use fontcache::{AtlasRegion, RenderSink, Vertex};
//! # struct GpuSink;
//! # impl RenderSink for GpuSink {
//! #     fn update_atlas(&mut self, _: AtlasRegion, _: &[u8]) {}
//! #     fn draw(&mut self, _: &mut [Vertex]) {}
//! # }
//!
//! fontcache_core::logging::init();
//!
//! let mut ctx = Context::new(ContextConfig::default(), TtfBackend::new(), GpuSink)?;
//! let latin = ctx.add_font_file("fonts/NotoSans-Regular.ttf", 0)?;
//! let cjk = ctx.add_font_file("fonts/NotoSansSC-Regular.otf", 0)?;
//! ctx.add_fallback(latin, cjk);
//!
//! ctx.set_font(latin);
//! ctx.set_size(32.0);
//! ctx.set_color(Color::WHITE);
//! ctx.draw_text(20.0, 400.0, "Hello \u{4e2d}\u{6587}\nsecond line");
//! # Ok::<(), fontcache::FontCacheError>(())
//! ```
//!
//! ## Coordinates
//!
//! Positions are y-up with the pen on the baseline. Each new line is placed
//! one line height below (at a smaller y than) the previous one.

pub mod atlas;
pub mod backend;
pub mod batch;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod font;
pub mod glyph;
pub mod layout;
pub mod sdf;
pub mod sink;
pub mod state;
pub mod utf8;

pub use atlas::{AtlasAllocator, AtlasRegion, RectPacker, ShelfPacker};
#[cfg(feature = "ttf")]
pub use backend::{TtfBackend, TtfFace};
pub use backend::{FontBackend, GlyphBox, SdfBitmap, SdfRequest, VerticalMetrics};
pub use batch::{FlushMode, Vertex};
pub use cache::CacheStats;
pub use config::ContextConfig;
pub use context::{Context, ContextStats, FlushModeGuard, LineMetrics};
pub use error::{ErrorCode, FontCacheError, FontCacheResult};
pub use font::{Font, FontData, FontId};
pub use glyph::Glyph;
pub use layout::InkExtents;
pub use sdf::SdfConfig;
pub use sink::RenderSink;
pub use state::{Align, HorizontalAlign, StyleState, VerticalAlign};
pub use utf8::{Codepoints, DecodeStep, Utf8Decoder};

pub use fontcache_core::Color;
pub use fontcache_core::math::Vec2;
