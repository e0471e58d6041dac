//! Integration tests for the style state stack as seen through a context.

use fontcache::{Align, Color, Context, ContextConfig, ErrorCode, StyleState};
use fontcache_test_utils::{MockFont, MockFontBackend, RecordingSink};

fn context(max_states: usize) -> (Context<MockFontBackend, RecordingSink>, RecordingSink) {
    let backend = MockFontBackend::new().with_font("latin", MockFont::latin());
    let sink = RecordingSink::new();
    let config = ContextConfig::default().with_max_states(max_states);
    let ctx = Context::new(config, backend, sink.clone()).unwrap();
    (ctx, sink)
}

#[test]
fn test_initial_state() {
    let (ctx, _) = context(4);
    assert_eq!(ctx.state_depth(), 1);
    assert_eq!(*ctx.state(), StyleState::default());
    assert_eq!(ctx.state().size, 12.0);
    assert_eq!(ctx.state().align, Align::LEFT | Align::BASELINE);
    assert!(ctx.state().font.is_none());
}

#[test]
fn test_push_copies_and_pop_restores() {
    let (mut ctx, sink) = context(4);
    let font = ctx.add_font(b"latin", 0).unwrap();
    ctx.set_font(font);
    ctx.set_size(20.0);

    ctx.push_state();
    assert_eq!(ctx.state_depth(), 2);
    assert_eq!(ctx.state().size, 20.0);
    assert_eq!(ctx.state().font, Some(font));

    ctx.set_size(40.0);
    ctx.set_color(Color::RED);
    ctx.set_align(Align::RIGHT | Align::TOP);

    ctx.pop_state();
    assert_eq!(ctx.state_depth(), 1);
    assert_eq!(ctx.state().size, 20.0);
    assert_eq!(ctx.state().color, Color::WHITE);
    assert_eq!(ctx.state().align, Align::default());
    assert!(sink.errors().is_empty());
}

#[test]
fn test_overflow_reports_to_sink() {
    let (mut ctx, sink) = context(3);
    ctx.push_state();
    ctx.push_state();
    assert_eq!(ctx.state_depth(), 3);

    ctx.set_size(99.0);
    ctx.push_state();
    assert_eq!(ctx.state_depth(), 3);
    assert_eq!(ctx.state().size, 99.0);
    assert_eq!(sink.errors(), vec![ErrorCode::StatesOverflow]);
}

#[test]
fn test_underflow_reports_to_sink() {
    let (mut ctx, sink) = context(3);
    ctx.set_size(30.0);
    ctx.pop_state();
    ctx.pop_state();

    assert_eq!(ctx.state_depth(), 1);
    assert_eq!(ctx.state().size, 30.0);
    assert_eq!(
        sink.errors(),
        vec![ErrorCode::StatesUnderflow, ErrorCode::StatesUnderflow]
    );
}

#[test]
fn test_clear_state_resets_top_only() {
    let (mut ctx, _) = context(4);
    ctx.set_size(18.0);
    ctx.push_state();
    ctx.set_size(48.0);
    ctx.set_color(Color::BLUE);

    ctx.clear_state();
    assert_eq!(ctx.state_depth(), 2);
    assert_eq!(*ctx.state(), StyleState::default());

    ctx.pop_state();
    assert_eq!(ctx.state().size, 18.0);
}

#[test]
fn test_single_frame_stack() {
    let (mut ctx, sink) = context(1);
    ctx.push_state();
    ctx.pop_state();
    assert_eq!(ctx.state_depth(), 1);
    assert_eq!(
        sink.errors(),
        vec![ErrorCode::StatesOverflow, ErrorCode::StatesUnderflow]
    );
}

#[test]
fn test_style_applies_to_drawn_vertices() {
    let (mut ctx, sink) = context(4);
    let font = ctx.add_font(b"latin", 0).unwrap();
    ctx.set_font(font);
    ctx.set_color(Color::GREEN);

    ctx.push_state();
    ctx.set_color(Color::BLUE);
    ctx.draw_text(0.0, 0.0, "A");
    ctx.pop_state();
    ctx.draw_text(0.0, 0.0, "A");

    let vertices = sink.vertices();
    assert_eq!(vertices.len(), 12);
    assert_eq!(vertices[0].color, Color::BLUE.to_array());
    assert_eq!(vertices[6].color, Color::GREEN.to_array());
}
