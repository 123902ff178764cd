//! Grid coordinates and world-space positions.
//!
//! The warehouse floor is a bounded integer lattice addressed by
//! `(row, col)`.  Observers render in a 3-D world where a cell maps to
//! `x = row`, `z = col` and `y` is the height above the floor.

use std::fmt;

// ── CellPos ───────────────────────────────────────────────────────────────────

/// A cell on the warehouse grid.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellPos {
    pub row: u32,
    pub col: u32,
}

impl CellPos {
    #[inline]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// World-space position of this cell at height `y`.
    #[inline]
    pub fn to_world(self, y: f64) -> WorldPos {
        WorldPos { x: self.row as f64, y, z: self.col as f64 }
    }

    /// Manhattan distance in cells.
    #[inline]
    pub fn manhattan(self, other: CellPos) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({};{})", self.row, self.col)
    }
}

// ── CellRect ──────────────────────────────────────────────────────────────────

/// An inclusive rectangle of cells, iterated row-major.
///
/// Used for dropoff regions, the inbound dock, storage bounds and robot
/// spawn lanes.  The row-major order is the documented scan order of every
/// slot search in the simulation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRect {
    pub row_min: u32,
    pub row_max: u32,
    pub col_min: u32,
    pub col_max: u32,
}

impl CellRect {
    pub const fn new(row_min: u32, row_max: u32, col_min: u32, col_max: u32) -> Self {
        Self { row_min, row_max, col_min, col_max }
    }

    /// A single-cell rectangle.
    pub const fn single(cell: CellPos) -> Self {
        Self::new(cell.row, cell.row, cell.col, cell.col)
    }

    #[inline]
    pub fn contains(&self, cell: CellPos) -> bool {
        (self.row_min..=self.row_max).contains(&cell.row)
            && (self.col_min..=self.col_max).contains(&cell.col)
    }

    pub fn is_empty(&self) -> bool {
        self.row_min > self.row_max || self.col_min > self.col_max
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let rows = (self.row_max - self.row_min + 1) as usize;
        let cols = (self.col_max - self.col_min + 1) as usize;
        rows * cols
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        let cols = self.col_min..=self.col_max;
        (self.row_min..=self.row_max)
            .flat_map(move |row| cols.clone().map(move |col| CellPos::new(row, col)))
    }
}

// ── WorldPos / Rotation ───────────────────────────────────────────────────────

/// A position in rendering space.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPos {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Euler rotation in radians.  All entities currently face forward, but the
/// snapshot format carries a rotation so renderers need not special-case it.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Rotation {
    pub const ZERO: Rotation = Rotation { x: 0.0, y: 0.0, z: 0.0 };
}
