//! # Band Generator
//!
//! One worker's row band through its whole lifecycle: seeded noise fill,
//! then iterative cellular-automaton smoothing against borrowed halo rows.
//!
//! ## Double Buffering
//!
//! A smoothing pass writes into a scratch buffer while reading the current
//! grid, then swaps. Reading and writing the same buffer in one pass would
//! let a cell observe a neighbor that was already rewritten this iteration,
//! which is exactly the torn-read hazard the halo protocol exists to
//! prevent between workers.
//!
//! ## The Smoothing Rule
//!
//! For each interior cell, count walls among the 8 neighbors (halo rows for
//! vertical overflow, wall for an absent halo or horizontal overflow):
//! more than 4 becomes wall, fewer than 4 becomes open, exactly 4 keeps its
//! state. The side columns `x = 0` and `x = width - 1` are forced to wall
//! every iteration; the lateral boundary is permanent regardless of what
//! the count says.

use std::mem;
use std::ops::Range;

use crate::config::MapConfig;
use crate::grid::{Cell, Grid, Halo};
use crate::partition::Partition;
use crate::seed::{MapSeed, NoiseStream};

/// Applies one smoothing pass over `rows` of `src`, writing results into
/// `out` (row-major, `rows.len() * width` cells).
///
/// `top` and `bottom` stand in for the rows just above and below the whole
/// `src` grid. Rows that fall inside `src` are always read from `src`
/// directly, so the shared-memory runner can hand workers interior row
/// ranges of one full grid with both halos absent, while a distributed band
/// passes its exchanged boundary rows.
///
/// # Panics
///
/// Panics if `out` does not hold exactly `rows.len() * width` cells.
pub fn smooth_rows_into(
    src: &Grid,
    rows: Range<usize>,
    top: &Halo,
    bottom: &Halo,
    out: &mut [Cell],
) {
    let width = src.width();
    assert_eq!(out.len(), rows.len() * width, "output does not match row range");

    for (out_y, y) in rows.enumerate() {
        for x in 0..width {
            let cell = if x == 0 || x == width - 1 {
                Cell::Wall
            } else {
                match count_wall_neighbours(src, x, y, top, bottom) {
                    count if count > 4 => Cell::Wall,
                    count if count < 4 => Cell::Open,
                    _ => src.get(x, y),
                }
            };
            out[out_y * width + x] = cell;
        }
    }
}

/// Walls among the 8 neighbors of `(x, y)`, reading halos for vertical
/// overflow and substituting wall for horizontal overflow.
fn count_wall_neighbours(src: &Grid, x: usize, y: usize, top: &Halo, bottom: &Halo) -> u8 {
    let width = src.width() as isize;
    let height = src.height() as isize;
    let (x, y) = (x as isize, y as isize);

    let mut walls = 0;
    for ny in (y - 1)..=(y + 1) {
        for nx in (x - 1)..=(x + 1) {
            if nx == x && ny == y {
                continue;
            }
            let neighbour = if nx < 0 || nx >= width {
                // Side edges are hard walls regardless of neighboring bands.
                Cell::Wall
            } else if ny < 0 {
                top.cell(nx as usize)
            } else if ny >= height {
                bottom.cell(nx as usize)
            } else {
                src.get(nx as usize, ny as usize)
            };
            walls += neighbour.weight();
        }
    }
    walls
}

/// One worker's band of the map.
///
/// Lifecycle: construct (seeds the stream at the band's global offset),
/// [`initialize`](Self::initialize) (noise fill), then one
/// [`smooth_iteration`](Self::smooth_iteration) per halo exchange round.
pub struct BandGenerator {
    partition: Partition,
    grid: Grid,
    scratch: Grid,
    stream: NoiseStream,
    initialized: bool,
    iterations_done: u32,
}

impl BandGenerator {
    /// Creates a band positioned at its partition's slice of the global
    /// noise stream.
    ///
    /// Every worker passes the same `seed`; the stream offset
    /// `global_row_offset * width` is what makes the band's draws line up
    /// with a single-worker run.
    #[must_use]
    pub fn new(config: &MapConfig, partition: Partition, seed: MapSeed) -> Self {
        let width = config.width as usize;
        let draw_offset = (partition.global_row_offset as u64) * (width as u64);
        Self {
            partition,
            grid: Grid::new(width, partition.local_height),
            scratch: Grid::new(width, partition.local_height),
            stream: NoiseStream::offset(seed, draw_offset),
            initialized: false,
            iterations_done: 0,
        }
    }

    /// Fills the band with seeded noise: one uniform draw per cell in
    /// row-major order, wall when the draw lands under `fill_probability`.
    ///
    /// Exactly one draw is consumed per cell; skipping or double-drawing
    /// would desynchronize the stream from the global cell enumeration.
    ///
    /// # Panics
    ///
    /// Panics if the band was already initialized.
    pub fn initialize(&mut self, fill_probability: f32) {
        assert!(!self.initialized, "band initialized twice");

        let width = self.grid.width();
        for y in 0..self.grid.height() {
            for x in 0..width {
                let cell = if self.stream.next_unit() < fill_probability {
                    Cell::Wall
                } else {
                    Cell::Open
                };
                self.grid.set(x, y, cell);
            }
        }
        self.initialized = true;
    }

    /// Runs one smoothing pass using the neighbors' boundary rows for this
    /// iteration. Absent halos mark the global top/bottom edge.
    ///
    /// # Panics
    ///
    /// Panics if called before [`initialize`](Self::initialize).
    pub fn smooth_iteration(&mut self, top: &Halo, bottom: &Halo) {
        assert!(self.initialized, "band smoothed before initialization");

        let height = self.grid.height();
        smooth_rows_into(&self.grid, 0..height, top, bottom, self.scratch.cells_mut());
        mem::swap(&mut self.grid, &mut self.scratch);
        self.iterations_done += 1;
    }

    /// The band's current grid.
    #[inline]
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The partition this band covers.
    #[inline]
    #[must_use]
    pub const fn partition(&self) -> Partition {
        self.partition
    }

    /// Smoothing passes completed so far.
    #[inline]
    #[must_use]
    pub const fn iterations_done(&self) -> u32 {
        self.iterations_done
    }

    /// First local row, to send to the previous neighbor.
    #[must_use]
    pub fn first_row(&self) -> Option<&[Cell]> {
        self.grid.first_row()
    }

    /// Last local row, to send to the next neighbor.
    #[must_use]
    pub fn last_row(&self) -> Option<&[Cell]> {
        self.grid.last_row()
    }
}
