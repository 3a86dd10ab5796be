//! # Generation Configuration
//!
//! All map parameters travel as one explicit value. Nothing in the
//! generators reads process-wide state; a run is fully described by a
//! `MapConfig` plus a seed and a worker count.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Parameters for one generation run.
///
/// Loadable from TOML; unknown keys are rejected so typos fail loudly at
/// startup rather than silently falling back to defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Global map width in cells. Must be positive.
    pub width: u32,
    /// Global map height in cells. Zero is a valid (empty) map.
    pub height: u32,
    /// Probability that an initial cell is a wall, in `[0, 1]`.
    pub fill_probability: f32,
    /// Number of cellular-automaton smoothing passes.
    pub smoothing_iterations: u32,
    /// World-space edge length of one cell. Must be positive.
    pub tile_size: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 120,
            fill_probability: 0.45,
            smoothing_iterations: 5,
            tile_size: 6.0,
        }
    }
}

impl MapConfig {
    /// Validates the configuration before any grid is allocated.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint; no partial state exists at
    /// that point.
    pub fn validate(&self) -> CoreResult<()> {
        if self.width == 0 {
            return Err(CoreError::InvalidWidth(self.width));
        }
        if !(0.0..=1.0).contains(&self.fill_probability) || !self.fill_probability.is_finite() {
            return Err(CoreError::InvalidFillProbability(self.fill_probability));
        }
        if !(self.tile_size > 0.0) || !self.tile_size.is_finite() {
            return Err(CoreError::InvalidTileSize(self.tile_size));
        }
        Ok(())
    }

    /// Parses and validates a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigParse`] for malformed TOML or unknown
    /// keys, and the validation errors of [`MapConfig::validate`] otherwise.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| CoreError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
