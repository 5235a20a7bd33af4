use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{GophersError, GophersResult};
use crate::render::surface::FrameRGBA;

/// Writes each frame as `frame_NNNNNN.png` into a directory.
///
/// The file number is the position in the written sequence, not the frame index, so a paced run
/// that skipped frames still produces a gap-free sequence.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    written: u64,
    last_idx: Option<FrameIndex>,
}

impl PngSequenceSink {
    /// Sink writing into `dir`, created on `begin` if missing.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            written: 0,
            last_idx: None,
        }
    }

    /// Number of files written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Path of the `n`th file of the sequence.
    pub fn frame_path(&self, n: u64) -> PathBuf {
        frame_path(&self.dir, n)
    }
}

fn frame_path(dir: &Path, n: u64) -> PathBuf {
    dir.join(format!("frame_{n:06}.png"))
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> GophersResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create frame directory '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.written = 0;
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> GophersResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| GophersError::encode("png sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(GophersError::encode(
                "png sink received out-of-order frame index",
            ));
        }
        cfg.check_frame(frame)?;

        let rgba = frame.to_straight_rgba8();
        let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
            .ok_or_else(|| GophersError::encode("frame buffer does not match its size"))?;
        let path = frame_path(&self.dir, self.written);
        img.save(&path)
            .with_context(|| format!("write frame png '{}'", path.display()))?;

        tracing::trace!(frame = idx.0, path = %path.display(), "png frame written");
        self.last_idx = Some(idx);
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> GophersResult<()> {
        tracing::info!(frames = self.written, dir = %self.dir.display(), "png sequence finished");
        self.cfg = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
