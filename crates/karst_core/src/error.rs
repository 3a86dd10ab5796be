//! # Core Error Types
//!
//! Configuration and validation errors raised before any grid is allocated.

use thiserror::Error;

/// Errors that can occur while validating or loading generation parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Map width must be at least one column.
    #[error("map width must be positive, got {0}")]
    InvalidWidth(u32),

    /// Fill probability outside the unit interval.
    #[error("fill probability must be within [0, 1], got {0}")]
    InvalidFillProbability(f32),

    /// Tile size must be a positive, finite length.
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(f32),

    /// Configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    ConfigParse(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
