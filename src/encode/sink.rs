//! Frame sink contract and in-memory sinks.

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{GophersError, GophersResult};
use crate::render::surface::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

impl SinkConfig {
    /// Check that `frame` has the configured dimensions and a tightly packed buffer.
    pub fn check_frame(&self, frame: &FrameRGBA) -> GophersResult<()> {
        if frame.width != self.width || frame.height != self.height {
            return Err(GophersError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        if frame.data.len() != (self.width as usize) * (self.height as usize) * 4 {
            return Err(GophersError::encode(
                "frame.data size mismatch with width*height*4",
            ));
        }
        Ok(())
    }
}

/// Consumer of presented frames.
///
/// `push_frame` is called in strictly increasing `FrameIndex` order, although indices may skip
/// when a paced frame scheduler drops late frames.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> GophersResult<()>;
    /// Push one presented frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> GophersResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> GophersResult<()>;
}

/// Keeps every frame in memory. Useful for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` has been called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> GophersResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> GophersResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| GophersError::encode("in-memory sink not started"))?;
        cfg.check_frame(frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> GophersResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Sink that forwards every frame to a shared [`InMemorySink`], so callers can inspect frames
/// after handing the sink to a surface.
#[derive(Clone, Debug, Default)]
pub struct SharedSink {
    inner: std::sync::Arc<std::sync::Mutex<InMemorySink>>,
}

impl SharedSink {
    /// Create an empty shared sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the captured frames.
    pub fn with_frames<R>(&self, f: impl FnOnce(&InMemorySink) -> R) -> GophersResult<R> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| GophersError::encode("shared sink poisoned"))?;
        Ok(f(&guard))
    }

    fn lock(&self) -> GophersResult<std::sync::MutexGuard<'_, InMemorySink>> {
        self.inner
            .lock()
            .map_err(|_| GophersError::encode("shared sink poisoned"))
    }
}

impl FrameSink for SharedSink {
    fn begin(&mut self, cfg: SinkConfig) -> GophersResult<()> {
        self.lock()?.begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> GophersResult<()> {
        self.lock()?.push_frame(idx, frame)
    }

    fn end(&mut self) -> GophersResult<()> {
        self.lock()?.end()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
