//! Benchmarks for glyph lookup and text batching

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use fontcache::{AtlasRegion, Context, ContextConfig, FlushMode, RenderSink, Vertex};
use fontcache_test_utils::{MockFont, MockFontBackend};

/// Sink that discards everything, so only the cache and batcher are measured.
struct NullSink;

impl RenderSink for NullSink {
    fn update_atlas(&mut self, _region: AtlasRegion, _pixels: &[u8]) {}

    fn draw(&mut self, vertices: &mut [Vertex]) {
        black_box(vertices);
    }
}

fn setup() -> Context<MockFontBackend, NullSink> {
    let backend = MockFontBackend::new().with_font("latin", MockFont::latin());
    let mut ctx = Context::new(ContextConfig::default(), backend, NullSink).unwrap();
    let font = ctx.add_font(b"latin", 0).unwrap();
    ctx.set_font(font);
    ctx.set_size(16.0);
    ctx
}

fn bench_draw_warm(c: &mut Criterion) {
    let mut ctx = setup();
    let mut group = c.benchmark_group("draw_warm");

    let long_text = "Lorem ipsum dolor sit amet. ".repeat(20);
    let texts: Vec<(&str, &str)> = vec![
        ("single_char", "A"),
        ("single_word", "Hello"),
        ("sentence", "The quick brown fox jumps over the lazy dog"),
        ("multiline", "First line\nSecond line\nThird line"),
        ("long_text", &long_text),
    ];

    for (name, content) in texts {
        ctx.draw_text(0.0, 0.0, content);
        group.bench_function(name, |b| {
            b.iter(|| black_box(ctx.draw_text(0.0, 0.0, black_box(content))));
        });
    }

    group.finish();
}

fn bench_draw_varying_lengths(c: &mut Criterion) {
    let mut ctx = setup();
    let mut group = c.benchmark_group("draw_varying_lengths");

    for length in [10, 100, 1000, 5000] {
        group.throughput(Throughput::Elements(length as u64));

        let content = "abcdefghij".repeat(length / 10);
        group.bench_with_input(BenchmarkId::from_parameter(length), &content, |b, content| {
            b.iter(|| black_box(ctx.draw_text(0.0, 0.0, content)));
        });
    }

    group.finish();
}

fn bench_flush_modes(c: &mut Criterion) {
    let mut ctx = setup();
    let mut group = c.benchmark_group("flush_modes");
    let content = "Sample text for flush benchmarking";

    group.bench_function("automatic", |b| {
        ctx.set_flush_mode(FlushMode::Automatic);
        b.iter(|| {
            for row in 0..32 {
                ctx.draw_text(0.0, row as f32 * 20.0, content);
            }
        });
    });

    group.bench_function("manual", |b| {
        ctx.set_flush_mode(FlushMode::Manual);
        b.iter(|| {
            for row in 0..32 {
                ctx.draw_text(0.0, row as f32 * 20.0, content);
            }
            ctx.flush();
        });
    });

    group.finish();
}

fn bench_cold_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("cold_cache");

    group.bench_function("printable_ascii", |b| {
        let printable: String = (0x21u8..=0x7E).map(char::from).collect();
        b.iter_with_setup(setup, |mut ctx| {
            black_box(ctx.draw_text(0.0, 0.0, &printable));
        });
    });

    group.finish();
}

fn bench_measure(c: &mut Criterion) {
    let mut ctx = setup();
    let mut group = c.benchmark_group("text_bounds");

    for size in [8.0, 16.0, 32.0, 64.0] {
        ctx.set_size(size);
        group.bench_with_input(BenchmarkId::from_parameter(size as u32), &size, |b, _| {
            b.iter(|| black_box(ctx.text_bounds(0.0, 0.0, "Sample text\nfor measurement")));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_draw_warm,
    bench_draw_varying_lengths,
    bench_flush_modes,
    bench_cold_cache,
    bench_measure,
);
criterion_main!(benches);
