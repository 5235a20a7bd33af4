use std::fmt;

use crate::foundation::error::{GophersError, GophersResult};

/// Distance, in canvas units, between a pick-up pile and its drop-off.
pub const CARRY_DISTANCE: u32 = 150;

/// Full-speed step of an empty cart; a load of `n` advances `CART_STRIDE / n` per step.
pub const CART_STRIDE: u32 = 10;

/// A batch of books on a cart.
///
/// The count is the only identity a load has. Valid counts are `1..=Load::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Load(u8);

impl Load {
    /// Smallest batch.
    pub const MIN: u8 = 1;
    /// Largest batch; the second pile is seeded with a full cart.
    pub const MAX: u8 = 10;

    /// Build a validated load.
    pub fn new(count: u8) -> GophersResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&count) {
            return Err(GophersError::validation(format!(
                "load must be in {}..={}, got {count}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(count))
    }

    /// Number of books in the batch.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of yields spent carrying this load over [`CARRY_DISTANCE`].
    ///
    /// Equals `ceil(CARRY_DISTANCE / (CART_STRIDE / n))`, evaluated in integers so no float
    /// accumulation can add or drop a step.
    pub fn carry_steps(self) -> u32 {
        (CARRY_DISTANCE * u32::from(self.0)).div_ceil(CART_STRIDE)
    }

    /// Offset reached after `step` carry steps, clamped to [`CARRY_DISTANCE`].
    pub fn carry_offset(self, step: u32) -> f64 {
        let x = f64::from(step) * f64::from(CART_STRIDE) / f64::from(self.0);
        x.min(f64::from(CARRY_DISTANCE))
    }
}

impl TryFrom<u8> for Load {
    type Error = GophersError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Load> for u8 {
    fn from(value: Load) -> Self {
        value.0
    }
}

impl fmt::Display for Load {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive range the replenisher draws fresh loads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadRange {
    /// Smallest load drawn.
    pub min: u8,
    /// Largest load drawn.
    pub max: u8,
}

impl LoadRange {
    /// Build a validated range.
    pub fn new(min: u8, max: u8) -> GophersResult<Self> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    /// Reject empty ranges and counts outside the load domain.
    pub fn validate(self) -> GophersResult<()> {
        Load::new(self.min)?;
        Load::new(self.max)?;
        if self.min > self.max {
            return Err(GophersError::validation(format!(
                "replenish range is empty: {}..={}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Draw a load uniformly from the range.
    pub fn sample(self, rng: &mut crate::foundation::math::Rng64) -> GophersResult<Load> {
        let v = rng.in_range_inclusive(u32::from(self.min), u32::from(self.max));
        Load::new(v as u8)
    }
}

impl Default for LoadRange {
    fn default() -> Self {
        Self { min: 1, max: 9 }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/load.rs"]
mod tests;
