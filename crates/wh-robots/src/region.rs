use wh_core::{CellPos, CellRect};
use wh_grid::OccupancyMap;

/// An ordered list of cells a rack may be dropped on.
///
/// [`first_free`](Self::first_free) always scans from the front, so the
/// lowest free slot in scan order wins.  For regions built from a rectangle
/// that order is row-major.  Slots near the end may wait a long time under
/// heavy churn; the order is kept fixed so runs stay reproducible.
#[derive(Clone, Debug)]
pub struct DropoffRegion {
    pub name: &'static str,
    cells:    Vec<CellPos>,
}

impl DropoffRegion {
    pub fn from_rect(name: &'static str, rect: &CellRect) -> Self {
        Self { name, cells: rect.cells().collect() }
    }

    pub fn from_cells(name: &'static str, cells: impl IntoIterator<Item = CellPos>) -> Self {
        Self { name, cells: cells.into_iter().collect() }
    }

    /// First slot not marked in `occupancy`.
    pub fn first_free(&self, occupancy: &OccupancyMap) -> Option<CellPos> {
        occupancy.first_free(self.cells.iter().copied())
    }

    /// First slot for which `taken` is false.
    pub fn first_where_free(&self, mut taken: impl FnMut(CellPos) -> bool) -> Option<CellPos> {
        self.cells.iter().copied().find(|&c| !taken(c))
    }

    pub fn contains(&self, cell: CellPos) -> bool {
        self.cells.contains(&cell)
    }

    pub fn cells(&self) -> &[CellPos] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
