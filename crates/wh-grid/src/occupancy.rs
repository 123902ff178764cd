//! Versioned occupancy bitmap.
//!
//! The bitmap is owned by whoever drives the tick and rebuilt from rack
//! positions once per tick.  Between rebuilds the only writer is the robot
//! assignment pass, which records each move it commits so a later assignment
//! in the same tick sees the slot as taken.  The `version` counter increases
//! on every rebuild so a caller holding an older snapshot can tell it is
//! stale.

use wh_core::CellPos;

/// `cell → occupied` for every cell of a `rows × cols` grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyMap {
    rows:    u32,
    cols:    u32,
    bits:    Vec<bool>,
    version: u64,
}

impl OccupancyMap {
    /// An all-free map.
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            bits:    vec![false; (rows * cols) as usize],
            version: 0,
        }
    }

    /// A map with exactly `cells` occupied.
    pub fn from_cells(rows: u32, cols: u32, cells: impl IntoIterator<Item = CellPos>) -> Self {
        let mut map = Self::new(rows, cols);
        for c in cells {
            map.mark(c);
        }
        map
    }

    /// Clear every flag, mark `cells`, and bump the version.
    pub fn rebuild(&mut self, cells: impl IntoIterator<Item = CellPos>) {
        self.bits.fill(false);
        for c in cells {
            self.mark(c);
        }
        self.version += 1;
    }

    #[inline]
    fn index(&self, cell: CellPos) -> Option<usize> {
        (cell.row < self.rows && cell.col < self.cols)
            .then(|| (cell.row * self.cols + cell.col) as usize)
    }

    /// Mark `cell` occupied.  Returns `false` if it lies outside the grid.
    pub fn mark(&mut self, cell: CellPos) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.bits[i] = true;
                true
            }
            None => false,
        }
    }

    /// Mark `cell` free.
    pub fn unmark(&mut self, cell: CellPos) {
        if let Some(i) = self.index(cell) {
            self.bits[i] = false;
        }
    }

    /// Cells outside the grid are reported as free.
    #[inline]
    pub fn is_occupied(&self, cell: CellPos) -> bool {
        self.index(cell).is_some_and(|i| self.bits[i])
    }

    /// Raw flag by row-major index, for the router's inner loop.
    #[inline]
    pub fn is_occupied_index(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    pub fn occupied_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// First free cell of `cells` in iteration order.
    pub fn first_free(&self, cells: impl IntoIterator<Item = CellPos>) -> Option<CellPos> {
        cells.into_iter().find(|&c| self.index(c).is_some() && !self.is_occupied(c))
    }
}
