//! # Marching Squares
//!
//! Classifies every 2x2 cell block into one of 16 cases (a corner is
//! "active" when it is a wall) and emits the case's line segments at fixed
//! mid-edge points. This is the deliberately simplified variant: no
//! sub-cell interpolation by wall density, and the two ambiguous saddle
//! cases emit both diagonal segments instead of picking one connection.
//!
//! The case table is pinned, asymmetries included: the three-corner cases
//! 11 and 14 reuse their complement's single-corner edge pair rather than a
//! strict duality. Tests lock the table in; rebalancing it is a visible,
//! deliberate change.

use karst_core::{Cell, Grid};

use crate::geom::{LineSegment, Point2};

/// A 2x2 block classification in `[0, 15]`.
///
/// Bit layout: top-left = 8, top-right = 4, bottom-right = 2,
/// bottom-left = 1; a bit is set when that corner cell is a wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarchingCase(u8);

impl MarchingCase {
    /// Classifies a block from its four corner cells.
    #[must_use]
    pub const fn from_corners(tl: Cell, tr: Cell, br: Cell, bl: Cell) -> Self {
        let mut case = 0;
        if tl.is_wall() {
            case |= 8;
        }
        if tr.is_wall() {
            case |= 4;
        }
        if br.is_wall() {
            case |= 2;
        }
        if bl.is_wall() {
            case |= 1;
        }
        Self(case)
    }

    /// The raw case index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// True for the two diagonally-ambiguous configurations (5 and 10).
    #[inline]
    #[must_use]
    pub const fn is_saddle(self) -> bool {
        self.0 == 5 || self.0 == 10
    }
}

/// Mid-edge points of one 2x2 block, in world coordinates.
struct BlockEdges {
    top: Point2,
    right: Point2,
    bottom: Point2,
    left: Point2,
}

impl BlockEdges {
    /// Computes the block's mid-edge points. `y` is already global.
    fn new(x: usize, y: usize, tile_size: f32) -> Self {
        let half = tile_size * 0.5;
        let (wx, wy) = (x as f32 * tile_size, y as f32 * tile_size);
        Self {
            top: Point2::new(wx + half, wy),
            right: Point2::new(wx + tile_size, wy + half),
            bottom: Point2::new(wx + half, wy + tile_size),
            left: Point2::new(wx, wy + half),
        }
    }
}

/// Appends the segments for one classified block.
fn push_segments(case: MarchingCase, edges: &BlockEdges, out: &mut Vec<LineSegment>) {
    match case.index() {
        // No active corners, or fully inside a wall: nothing to draw.
        0 | 15 => {}
        1 => out.push(LineSegment::new(edges.left, edges.bottom)),
        2 => out.push(LineSegment::new(edges.bottom, edges.right)),
        3 => out.push(LineSegment::new(edges.left, edges.right)),
        4 => out.push(LineSegment::new(edges.top, edges.right)),
        // Saddle: both diagonals, no disambiguation.
        5 => {
            out.push(LineSegment::new(edges.top, edges.right));
            out.push(LineSegment::new(edges.left, edges.bottom));
        }
        6 => out.push(LineSegment::new(edges.top, edges.bottom)),
        7 => out.push(LineSegment::new(edges.left, edges.top)),
        8 => out.push(LineSegment::new(edges.top, edges.left)),
        9 => out.push(LineSegment::new(edges.top, edges.bottom)),
        // Saddle: both diagonals, no disambiguation.
        10 => {
            out.push(LineSegment::new(edges.top, edges.left));
            out.push(LineSegment::new(edges.bottom, edges.right));
        }
        11 => out.push(LineSegment::new(edges.top, edges.right)),
        12 => out.push(LineSegment::new(edges.left, edges.right)),
        13 => out.push(LineSegment::new(edges.bottom, edges.right)),
        14 => out.push(LineSegment::new(edges.bottom, edges.left)),
        _ => unreachable!("marching case is 4 bits"),
    }
}

/// Extracts contour segments from a closure-sampled grid region.
///
/// Scans the `(rows - 1) x (width - 1)` blocks in row-major order.
/// `global_row_offset` is added to every emitted point's row so band meshes
/// land directly in global coordinates.
#[must_use]
pub fn extract_with<F>(
    width: usize,
    rows: usize,
    tile_size: f32,
    global_row_offset: usize,
    sample: F,
) -> Vec<LineSegment>
where
    F: Fn(usize, usize) -> Cell,
{
    let mut segments = Vec::new();
    if width == 0 || rows == 0 {
        return segments;
    }

    for y in 0..rows - 1 {
        for x in 0..width - 1 {
            let case = MarchingCase::from_corners(
                sample(x, y),
                sample(x + 1, y),
                sample(x + 1, y + 1),
                sample(x, y + 1),
            );
            let edges = BlockEdges::new(x, y + global_row_offset, tile_size);
            push_segments(case, &edges, &mut segments);
        }
    }
    segments
}

/// Extracts contour segments from a band's grid.
///
/// `borrowed_bottom` is the next band's already-smoothed first row; a
/// non-terminal band passes it so the 2x2 windows straddling the partition
/// boundary are evaluated here, by this worker, and nowhere else. The last
/// band (and a single-worker run) passes `None`.
///
/// # Panics
///
/// Panics if a borrowed row's length differs from the grid width; callers
/// validate transported rows before extraction.
#[must_use]
pub fn extract_segments(
    grid: &Grid,
    borrowed_bottom: Option<&[Cell]>,
    tile_size: f32,
    global_row_offset: usize,
) -> Vec<LineSegment> {
    if let Some(row) = borrowed_bottom {
        assert_eq!(row.len(), grid.width(), "borrowed row length mismatch");
    }

    let rows = grid.height() + usize::from(borrowed_bottom.is_some());
    extract_with(grid.width(), rows, tile_size, global_row_offset, |x, y| match borrowed_bottom {
        Some(row) if y >= grid.height() => row[x],
        _ => grid.get(x, y),
    })
}
