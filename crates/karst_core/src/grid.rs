//! # Grid Storage
//!
//! Binary cave maps are stored as flat, row-major grids of two-state cells.
//!
//! ## Halo Rows
//!
//! When the map is split into row bands, a band's first and last rows have
//! vertical neighbors living in the adjacent band. Those neighbors arrive as
//! [`Halo`] values: either a borrowed row of exactly `width` cells, or the
//! explicit [`Halo::Absent`] sentinel marking the global edge of the map.
//! An absent halo reads as solid wall; that substitution is the only place
//! the global vertical boundary exists.

/// One map cell: open space or solid wall.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Walkable open space.
    #[default]
    Open = 0,
    /// Solid rock.
    Wall = 1,
}

impl Cell {
    /// Returns true if this cell is a wall.
    #[inline]
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Wall counts as 1 when summing neighbors.
    #[inline]
    #[must_use]
    pub const fn weight(self) -> u8 {
        self as u8
    }
}

/// A row-major `height x width` grid of cells.
///
/// `width` is the global map width and is identical across all workers.
/// `height` is either the full map height (single worker, shared-memory) or
/// one worker's local band height (distributed).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an all-open grid.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Open; width * height],
        }
    }

    /// Wraps existing row-major cell storage.
    ///
    /// # Panics
    ///
    /// Panics if `cells.len() != width * height`.
    #[must_use]
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Self {
        assert_eq!(cells.len(), width * height, "cell storage does not match dimensions");
        Self { width, height, cells }
    }

    /// Grid width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns true if the grid has no cells.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        debug_assert!(x < self.width && y < self.height);
        self.cells[y * self.width + x]
    }

    /// Sets the cell at `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        debug_assert!(x < self.width && y < self.height);
        self.cells[y * self.width + x] = cell;
    }

    /// Borrows one row.
    #[inline]
    #[must_use]
    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// The band's first row, if any. Sent to the previous neighbor as its
    /// bottom halo.
    #[must_use]
    pub fn first_row(&self) -> Option<&[Cell]> {
        (self.height > 0).then(|| self.row(0))
    }

    /// The band's last row, if any. Sent to the next neighbor as its top
    /// halo.
    #[must_use]
    pub fn last_row(&self) -> Option<&[Cell]> {
        (self.height > 0).then(|| self.row(self.height - 1))
    }

    /// Raw row-major cell storage.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable raw row-major cell storage.
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Number of wall cells in the grid.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_wall()).count()
    }
}

/// A neighbor band's boundary row, or the explicit global-edge marker.
///
/// `Absent` is semantically distinct from an empty row: it means "this band
/// has no neighbor on that side" and every read from it yields [`Cell::Wall`].
/// A present row of the wrong length is a protocol violation and is rejected
/// before it ever reaches neighbor counting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Halo {
    /// No neighbor on this side; the map's vertical edge. Reads as wall.
    Absent,
    /// A borrowed boundary row from the adjacent band.
    Row(Vec<Cell>),
}

impl Halo {
    /// Cell at column `x`, substituting wall when the halo is absent.
    #[inline]
    #[must_use]
    pub fn cell(&self, x: usize) -> Cell {
        match self {
            Self::Absent => Cell::Wall,
            Self::Row(row) => row[x],
        }
    }

    /// Returns true for the global-edge marker.
    #[inline]
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_roundtrip() {
        let mut grid = Grid::new(4, 3);
        assert!(!grid.get(2, 1).is_wall());
        grid.set(2, 1, Cell::Wall);
        assert!(grid.get(2, 1).is_wall());
        assert_eq!(grid.wall_count(), 1);
    }

    #[test]
    fn boundary_rows() {
        let mut grid = Grid::new(3, 2);
        grid.set(0, 0, Cell::Wall);
        grid.set(2, 1, Cell::Wall);
        assert_eq!(grid.first_row().unwrap(), &[Cell::Wall, Cell::Open, Cell::Open]);
        assert_eq!(grid.last_row().unwrap(), &[Cell::Open, Cell::Open, Cell::Wall]);
    }

    #[test]
    fn empty_grid_has_no_boundary_rows() {
        let grid = Grid::new(5, 0);
        assert!(grid.is_empty());
        assert!(grid.first_row().is_none());
        assert!(grid.last_row().is_none());
    }

    #[test]
    fn absent_halo_reads_as_wall() {
        let halo = Halo::Absent;
        for x in 0..16 {
            assert!(halo.cell(x).is_wall());
        }
    }

    #[test]
    fn present_halo_reads_through() {
        let halo = Halo::Row(vec![Cell::Open, Cell::Wall, Cell::Open]);
        assert!(!halo.cell(0).is_wall());
        assert!(halo.cell(1).is_wall());
    }
}
