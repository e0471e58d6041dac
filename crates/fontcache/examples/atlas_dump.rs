//! Atlas Dump Example
//!
//! Loads a font file, draws a few lines of text into a CPU-side atlas and
//! writes the atlas out as a binary PGM image.
//!
//! ## Features Showcased
//! - `Context` setup with the TrueType backend
//! - A minimal `RenderSink` that keeps the atlas in memory
//! - Alignment, style stack and manual flushing
//! - Cache statistics
//!
//! ## Usage
//! ```bash
//! cargo run -p fontcache --example atlas_dump -- path/to/font.ttf [atlas.pgm]
//! ```

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};

use fontcache::{
    Align, AtlasRegion, Color, Context, ContextConfig, ErrorCode, FlushMode, RenderSink,
    TtfBackend, Vertex,
};
use fontcache_core::logging;
use tracing::{info, warn};

/// Keeps the atlas pixels in memory and counts drawn vertices.
struct CpuSink {
    width: u32,
    pixels: Vec<u8>,
    vertices: usize,
    batches: usize,
}

impl CpuSink {
    fn new() -> Self {
        Self {
            width: 0,
            pixels: Vec::new(),
            vertices: 0,
            batches: 0,
        }
    }
}

impl RenderSink for CpuSink {
    fn create(&mut self, width: u32, height: u32) -> bool {
        self.width = width;
        self.pixels = vec![0; (width * height) as usize];
        true
    }

    fn update_atlas(&mut self, region: AtlasRegion, pixels: &[u8]) {
        for (row, src) in pixels.chunks_exact(region.width as usize).enumerate() {
            let start = ((region.y + row as u32) * self.width + region.x) as usize;
            self.pixels[start..start + src.len()].copy_from_slice(src);
        }
    }

    fn draw(&mut self, vertices: &mut [Vertex]) {
        self.vertices += vertices.len();
        self.batches += 1;
    }

    fn error(&mut self, code: ErrorCode) {
        warn!(%code, "text context reported an error");
    }
}

fn write_pgm(path: &str, width: u32, height: u32, pixels: &[u8]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write!(out, "P5\n{width} {height}\n255\n")?;
    out.write_all(pixels)?;
    out.flush()
}

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let Some(font_path) = args.next() else {
        eprintln!("usage: atlas_dump <font.ttf> [atlas.pgm]");
        std::process::exit(2);
    };
    let out_path = args.next().unwrap_or_else(|| "atlas.pgm".to_string());

    let mut ctx = Context::new(ContextConfig::medium(), TtfBackend::new(), CpuSink::new())?;
    let font = ctx.add_font_file(&font_path, 0)?;

    ctx.set_font(font);
    ctx.set_color(Color::WHITE);
    ctx.set_size(48.0);
    ctx.set_align(Align::CENTER | Align::TOP);
    ctx.draw_text(512.0, 1000.0, "The quick brown fox\njumps over the lazy dog");

    ctx.push_state();
    ctx.set_size(18.0);
    ctx.set_align(Align::LEFT | Align::BASELINE);
    ctx.set_flush_mode(FlushMode::Manual);
    for row in 0..10 {
        ctx.draw_line(20.0, 800.0 - row as f32 * 24.0, format!("{row}: 0123456789 !?#&@"));
    }
    ctx.flush();
    ctx.pop_state();

    if let Some(bounds) = ctx.text_bounds(0.0, 0.0, "Measured text") {
        info!(width = bounds.width(), height = bounds.height(), "measured");
    }

    let stats = ctx.stats();
    info!(
        glyphs = stats.glyphs,
        hits = stats.cache.hits,
        misses = stats.cache.misses,
        hit_rate = stats.cache.hit_rate(),
        flushes = stats.flushes,
        "cache statistics"
    );

    let sink = ctx.sink();
    info!(
        vertices = sink.vertices,
        batches = sink.batches,
        "draw statistics"
    );
    let config = ctx.config();
    write_pgm(&out_path, config.atlas_width, config.atlas_height, &sink.pixels)?;
    println!("wrote {out_path}");

    Ok(())
}
