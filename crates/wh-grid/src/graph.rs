//! Grid lattice representation and builder.
//!
//! # Data layout
//!
//! Every cell of the `rows × cols` grid exists and is addressed by a
//! row-major [`CellId`].  Outgoing edges use **Compressed Sparse Row (CSR)**
//! format: the edges of cell `c` occupy
//!
//! ```text
//! edge_to[ cell_out_start[c] .. cell_out_start[c+1] ]
//! ```
//!
//! sorted by destination, so iteration order (and with it Dijkstra's
//! tie-breaking) is fully deterministic.
//!
//! Which neighbours are linked is decided once, at build time, by a
//! [`LaneRule`].  The lattice never changes afterwards; blocking by racks is
//! expressed separately through an [`OccupancyMap`](crate::OccupancyMap).

use wh_core::{AisleLanes, CellId, CellPos};

// ── LaneRule ──────────────────────────────────────────────────────────────────

/// Decides which neighbouring cells are linked when a [`GridGraph`] is built.
///
/// Links are symmetric: a `true` from `links_down` creates edges in both
/// directions between `cell` and the cell below it.
pub trait LaneRule {
    /// Link `cell` with `(row + 1, col)`.
    fn links_down(&self, cell: CellPos) -> bool;

    /// Link `cell` with `(row, col + 1)`.
    fn links_right(&self, cell: CellPos) -> bool;

    /// Cost of moving between two linked cells.  Must be positive.
    fn weight(&self, _from: CellPos, _to: CellPos) -> u32 {
        1
    }
}

/// Every cell is linked to all four neighbours at cost 1.
#[derive(Copy, Clone, Debug, Default)]
pub struct FullLattice;

impl LaneRule for FullLattice {
    fn links_down(&self, _cell: CellPos) -> bool {
        true
    }

    fn links_right(&self, _cell: CellPos) -> bool {
        true
    }
}

impl LaneRule for AisleLanes {
    fn links_down(&self, cell: CellPos) -> bool {
        self.in_bounds(cell)
            && cell.row < self.last
            && (self.is_aisle_col(cell.col) || cell.row >= self.open_rows_from)
    }

    fn links_right(&self, cell: CellPos) -> bool {
        self.in_bounds(cell) && cell.col < self.last
    }
}

// ── GridGraph ─────────────────────────────────────────────────────────────────

/// Directed, weighted warehouse lattice in CSR format.
///
/// All fields are `pub` for direct indexed access on hot paths.  Build with
/// [`GridGraph::build`] or [`GridGraphBuilder`].
pub struct GridGraph {
    pub rows: u32,
    pub cols: u32,

    /// CSR row pointer.  Length = `cell_count + 1`.
    pub cell_out_start: Vec<u32>,

    /// Source cell of each edge, used to walk predecessor edges back.
    pub edge_from: Vec<CellId>,

    /// Destination cell of each edge.
    pub edge_to: Vec<CellId>,

    /// Positive traversal cost of each edge.
    pub edge_weight: Vec<u32>,
}

impl GridGraph {
    /// Construct the lattice for a `rows × cols` grid, linking neighbours
    /// according to `lanes`.
    pub fn build(rows: u32, cols: u32, lanes: &impl LaneRule) -> Self {
        let mut b = GridGraphBuilder::new(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                let here = CellPos::new(row, col);
                if row + 1 < rows && lanes.links_down(here) {
                    let below = CellPos::new(row + 1, col);
                    b.add_edge(here, below, lanes.weight(here, below));
                }
                if col + 1 < cols && lanes.links_right(here) {
                    let right = CellPos::new(row, col + 1);
                    b.add_edge(here, right, lanes.weight(here, right));
                }
            }
        }
        b.build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn cell_count(&self) -> usize {
        (self.rows * self.cols) as usize
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    // ── Addressing ────────────────────────────────────────────────────────

    #[inline]
    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Row-major id of `pos`, or `None` if it lies outside the grid.
    #[inline]
    pub fn cell_id(&self, pos: CellPos) -> Option<CellId> {
        self.contains(pos).then(|| CellId(pos.row * self.cols + pos.col))
    }

    #[inline]
    pub fn pos(&self, id: CellId) -> CellPos {
        CellPos::new(id.0 / self.cols, id.0 % self.cols)
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Edge indices of all outgoing edges from `cell`.  Contiguous range, no
    /// heap allocation.
    #[inline]
    pub fn out_edges(&self, cell: CellId) -> impl Iterator<Item = usize> + '_ {
        let start = self.cell_out_start[cell.index()] as usize;
        let end   = self.cell_out_start[cell.index() + 1] as usize;
        start..end
    }

    #[inline]
    pub fn out_degree(&self, cell: CellId) -> usize {
        let start = self.cell_out_start[cell.index()] as usize;
        let end   = self.cell_out_start[cell.index() + 1] as usize;
        end - start
    }

    /// Neighbour positions reachable in one step from `pos`.
    pub fn neighbours(&self, pos: CellPos) -> Vec<CellPos> {
        match self.cell_id(pos) {
            Some(id) => self.out_edges(id).map(|e| self.pos(self.edge_to[e])).collect(),
            None => Vec::new(),
        }
    }

    /// Weight of the direct edge `from → to`, if one exists.
    pub fn edge_weight_between(&self, from: CellPos, to: CellPos) -> Option<u32> {
        let (a, b) = (self.cell_id(from)?, self.cell_id(to)?);
        self.out_edges(a)
            .find(|&e| self.edge_to[e] == b)
            .map(|e| self.edge_weight[e])
    }
}

// ── GridGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`GridGraph`] edge by edge, then call [`build`](Self::build).
///
/// ```
/// use wh_core::CellPos;
/// use wh_grid::GridGraphBuilder;
///
/// let mut b = GridGraphBuilder::new(1, 3);
/// b.add_edge(CellPos::new(0, 0), CellPos::new(0, 1), 1);
/// b.add_edge(CellPos::new(0, 1), CellPos::new(0, 2), 4);
/// let g = b.build();
/// assert_eq!(g.cell_count(), 3);
/// assert_eq!(g.edge_count(), 4); // symmetric
/// ```
pub struct GridGraphBuilder {
    rows:      u32,
    cols:      u32,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:   CellId,
    to:     CellId,
    weight: u32,
}

impl GridGraphBuilder {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols, raw_edges: Vec::new() }
    }

    fn id(&self, pos: CellPos) -> Option<CellId> {
        let inside = pos.row < self.rows && pos.col < self.cols;
        wh_core::invariant!(inside, "edge endpoint {pos} outside {}x{} grid", self.rows, self.cols);
        inside.then(|| CellId(pos.row * self.cols + pos.col))
    }

    /// Add a **directed** edge.  Adding the same pair again replaces the
    /// earlier weight.  Edges with an endpoint outside the grid are dropped.
    pub fn add_directed_edge(&mut self, from: CellPos, to: CellPos, weight: u32) {
        wh_core::invariant!(weight > 0, "edge {from} -> {to} has zero weight");
        if let (Some(from), Some(to)) = (self.id(from), self.id(to)) {
            self.raw_edges.push(RawEdge { from, to, weight: weight.max(1) });
        }
    }

    /// Add edges in both directions (a single edge when `a == b`).
    pub fn add_edge(&mut self, a: CellPos, b: CellPos, weight: u32) {
        self.add_directed_edge(a, b, weight);
        if a != b {
            self.add_directed_edge(b, a, weight);
        }
    }

    /// Consume the builder and produce the CSR lattice.
    pub fn build(self) -> GridGraph {
        let cell_count = (self.rows * self.cols) as usize;

        // Stable sort keeps insertion order among duplicates, so the last
        // weight given for a pair wins.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| (e.from, e.to));
        let mut deduped: Vec<RawEdge> = Vec::with_capacity(raw.len());
        for e in raw {
            match deduped.last_mut() {
                Some(last) if last.from == e.from && last.to == e.to => last.weight = e.weight,
                _ => deduped.push(e),
            }
        }

        let edge_from:   Vec<CellId> = deduped.iter().map(|e| e.from).collect();
        let edge_to:     Vec<CellId> = deduped.iter().map(|e| e.to).collect();
        let edge_weight: Vec<u32>    = deduped.iter().map(|e| e.weight).collect();

        let mut cell_out_start = vec![0u32; cell_count + 1];
        for e in &edge_from {
            cell_out_start[e.index() + 1] += 1;
        }
        for i in 0..cell_count {
            cell_out_start[i + 1] += cell_out_start[i];
        }

        GridGraph {
            rows: self.rows,
            cols: self.cols,
            cell_out_start,
            edge_from,
            edge_to,
            edge_weight,
        }
    }
}
