//! Render sink that records everything it receives.

use std::sync::Arc;

use fontcache::{AtlasRegion, ErrorCode, RenderSink, Vertex};
use parking_lot::Mutex;

/// One atlas upload.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasUpdate {
    pub region: AtlasRegion,
    pub pixels: Vec<u8>,
}

/// Everything a [`RecordingSink`] has seen.
#[derive(Debug, Clone, Default)]
pub struct SinkLog {
    pub creates: Vec<(u32, u32)>,
    pub updates: Vec<AtlasUpdate>,
    pub draws: Vec<Vec<Vertex>>,
    pub errors: Vec<ErrorCode>,
    pub destroys: usize,
}

/// [`RenderSink`] that logs calls into a shared [`SinkLog`].
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Arc<Mutex<SinkLog>>,
    refuse_create: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose `create` fails.
    pub fn refusing() -> Self {
        Self {
            refuse_create: true,
            ..Default::default()
        }
    }

    /// Copy of the full log.
    pub fn log(&self) -> SinkLog {
        self.log.lock().clone()
    }

    pub fn draw_calls(&self) -> usize {
        self.log.lock().draws.len()
    }

    /// Every drawn vertex, in draw order.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.log.lock().draws.iter().flatten().copied().collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.log.lock().draws.iter().map(Vec::len).sum()
    }

    pub fn update_count(&self) -> usize {
        self.log.lock().updates.len()
    }

    pub fn errors(&self) -> Vec<ErrorCode> {
        self.log.lock().errors.clone()
    }

    pub fn create_count(&self) -> usize {
        self.log.lock().creates.len()
    }

    pub fn destroy_count(&self) -> usize {
        self.log.lock().destroys
    }

    /// Forget recorded draws, uploads and errors.
    pub fn clear(&self) {
        let mut log = self.log.lock();
        log.updates.clear();
        log.draws.clear();
        log.errors.clear();
    }
}

impl RenderSink for RecordingSink {
    fn create(&mut self, width: u32, height: u32) -> bool {
        self.log.lock().creates.push((width, height));
        !self.refuse_create
    }

    fn update_atlas(&mut self, region: AtlasRegion, pixels: &[u8]) {
        self.log.lock().updates.push(AtlasUpdate {
            region,
            pixels: pixels.to_vec(),
        });
    }

    fn draw(&mut self, vertices: &mut [Vertex]) {
        self.log.lock().draws.push(vertices.to_vec());
    }

    fn destroy(&mut self) {
        self.log.lock().destroys += 1;
    }

    fn error(&mut self, code: ErrorCode) {
        self.log.lock().errors.push(code);
    }
}
