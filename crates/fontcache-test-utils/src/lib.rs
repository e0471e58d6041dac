//! Test doubles for fontcache.
//!
//! - [`MockFontBackend`]: a [`FontBackend`](fontcache::FontBackend) serving
//!   scripted glyphs and recording every query
//! - [`RecordingSink`]: a [`RenderSink`](fontcache::RenderSink) that records
//!   atlas creation, uploads, draws and errors
//! - [`ScriptedPacker`]: a shelf packer that can be told to fail
//!
//! # Example
//!
//! ```rust
//! use fontcache::{Context, ContextConfig};
//! use fontcache_test_utils::{MockFont, MockFontBackend, RecordingSink};
//!
//! let backend = MockFontBackend::new().with_font("latin", MockFont::latin());
//! let sink = RecordingSink::new();
//! let mut ctx = Context::new(ContextConfig::default(), backend, sink.clone()).unwrap();
//!
//! let font = ctx.add_font(b"latin", 0).unwrap();
//! ctx.set_font(font);
//! ctx.draw_text(0.0, 0.0, "Hi");
//!
//! assert_eq!(sink.vertex_count(), 12);
//! assert_eq!(ctx.backend().count_sdf_calls(), 2);
//! ```
//!
//! Mocks record through `parking_lot::Mutex` so queries on `&self` can be
//! logged, and [`RecordingSink`] clones share one log so a test can keep a
//! handle after moving the sink into a context.

pub mod mock_backend;
pub mod recording_sink;
pub mod scripted_packer;

pub use mock_backend::*;
pub use recording_sink::*;
pub use scripted_packer::*;
