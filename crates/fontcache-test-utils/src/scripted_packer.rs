//! Packer with injectable failures.

use fontcache::{RectPacker, ShelfPacker};

/// [`ShelfPacker`] wrapper that can be scripted to fail.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPacker {
    inner: ShelfPacker,
    fail_next: usize,
    exhausted: bool,
    pack_calls: usize,
    init_calls: usize,
}

impl ScriptedPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` pack requests, then behave normally.
    pub fn failing(count: usize) -> Self {
        Self {
            fail_next: count,
            ..Default::default()
        }
    }

    /// Fail every pack request.
    pub fn exhausted() -> Self {
        Self {
            exhausted: true,
            ..Default::default()
        }
    }

    pub fn pack_calls(&self) -> usize {
        self.pack_calls
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls
    }
}

impl RectPacker for ScriptedPacker {
    fn init(&mut self, width: u32, height: u32) {
        self.init_calls += 1;
        self.inner.init(width, height);
    }

    fn pack(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        self.pack_calls += 1;
        if self.exhausted {
            return None;
        }
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return None;
        }
        self.inner.pack(width, height)
    }
}
