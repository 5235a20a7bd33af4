//! JSON show configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    foundation::core::{Canvas, Fps},
    foundation::error::{GophersError, GophersResult},
    sim::stage::StageConfig,
};

/// Everything a run of the show needs. Every field has a default, so an empty JSON object is a
/// valid configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShowConfig {
    /// Repaints per second.
    pub fps: u32,
    /// Page size.
    pub canvas: Canvas,
    /// Frames to present before the run stops.
    pub max_frames: u64,
    /// Directory of replacement artwork. Built-in artwork when unset.
    pub assets_dir: Option<PathBuf>,
    /// Simulation parameters, including the seed.
    pub sim: StageConfig,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            canvas: Canvas::default(),
            max_frames: 600,
            assets_dir: None,
            sim: StageConfig::default(),
        }
    }
}

impl ShowConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(s: &str) -> GophersResult<Self> {
        let config: Self = serde_json::from_str(s).context("parse show config json")?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: &Path) -> GophersResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read show config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Frame rate as a rational.
    pub fn frame_rate(&self) -> GophersResult<Fps> {
        Fps::new(self.fps, 1)
    }

    /// Reject settings no run can use.
    pub fn validate(&self) -> GophersResult<()> {
        self.frame_rate()?;
        self.canvas.validate()?;
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(GophersError::validation(format!(
                "canvas must have even dimensions, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if self.max_frames == 0 {
            return Err(GophersError::validation("max_frames must be > 0"));
        }
        self.sim.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/config.rs"]
mod tests;
