//! # KARST Contour
//!
//! Turns binary wall/open grids into renderable geometry.
//!
//! ## Core Components
//!
//! - `Point2`/`LineSegment`: plain value geometry, castable to `[f32]`
//! - `marching`: the 16-case contour extractor (fixed mid-edge points, both
//!   diagonals on saddles)
//! - `transport`: the flat 4-floats-per-segment gather format
//! - `triangles`: per-wall-cell filled-quad expansion
//!
//! ## Seam-free bands
//!
//! A band that is not the last one extracts over its own rows plus one
//! borrowed row from the next band, so the final row of 2x2 sampling
//! windows straddling the partition boundary is evaluated exactly once,
//! by exactly one worker. Segments carry the band's global row offset and
//! compose without any post-hoc translation.

pub mod geom;
pub mod marching;
pub mod transport;
pub mod triangles;

pub use geom::{LineSegment, Point2};
pub use marching::{extract_segments, extract_with, MarchingCase};
pub use transport::{flatten_segments, reconstruct_segments, TransportError, FLOATS_PER_SEGMENT};
pub use triangles::wall_triangles;
