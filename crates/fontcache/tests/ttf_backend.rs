//! Font loading through the TrueType backend.
//!
//! No font files ship with the crate, so these tests cover the failure paths
//! of loading; glyph output is covered with the mock backend.

#![cfg(feature = "ttf")]

use std::io::Write;

use fontcache::{Context, ContextConfig, FontCacheError, TtfBackend};
use fontcache_test_utils::RecordingSink;

fn context() -> Context<TtfBackend, RecordingSink> {
    Context::new(ContextConfig::default(), TtfBackend::new(), RecordingSink::new()).unwrap()
}

#[test]
fn test_garbage_bytes_fail_to_parse() {
    let mut ctx = context();
    let err = ctx.add_font(vec![0u8; 64], 0).unwrap_err();
    assert!(matches!(err, FontCacheError::FontParse { face_index: 0 }));
    assert_eq!(ctx.font_count(), 0);
}

#[test]
fn test_missing_file_is_io_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("missing.ttf");

    let mut ctx = context();
    let err = ctx.add_font_file(&path, 0).unwrap_err();
    match err {
        FontCacheError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected an io error, got {other:?}"),
    }
}

#[test]
fn test_invalid_file_contents_fail_to_parse() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"definitely not an OpenType font").unwrap();

    let mut ctx = context();
    let err = ctx.add_font_file(file.path(), 2).unwrap_err();
    assert!(matches!(err, FontCacheError::FontParse { face_index: 2 }));
}

#[test]
fn test_error_messages() {
    let mut ctx = context();
    let err = ctx.add_font_file("/nonexistent/font.ttf", 0).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/font.ttf"));

    let err = ctx.add_font(vec![1, 2, 3], 0).unwrap_err();
    assert_eq!(err.to_string(), "failed to parse font face 0");
}
