//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The robot pool calls routing via the [`Router`] trait, so a different
//! search (A*, a reservation-table planner) can be swapped in without touching
//! the assignment logic.  The default [`DijkstraRouter`] is enough for a
//! warehouse-sized grid.
//!
//! # Occupancy
//!
//! Occupied cells are not traversable, except for the query's own start and
//! target: a robot standing on a rack may leave it, and a robot may drive onto
//! the rack it is about to lift.

use wh_core::{CellId, CellPos};

use crate::{GridError, GridGraph, OccupancyMap};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Cells entered, in order, ending at the target.  The start cell is not
    /// included, so a query from a cell to itself yields an empty route.
    pub cells: Vec<CellPos>,
    /// Summed edge weight.
    pub cost: u32,
}

impl Route {
    pub fn empty() -> Self {
        Self { cells: Vec::new(), cost: 0 }
    }

    /// `true` if the source and target are the same cell.
    pub fn is_trivial(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Final cell, if the route moves at all.
    pub fn last(&self) -> Option<CellPos> {
        self.cells.last().copied()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations must be `Send + Sync` so a world shared with a background
/// driver thread stays `Send`.
pub trait Router: Send + Sync {
    /// Compute a route from `from` to `to` avoiding occupied cells.
    ///
    /// `from == to` is an empty route, never an error.
    fn route(
        &self,
        graph:     &GridGraph,
        occupancy: &OccupancyMap,
        from:      CellPos,
        to:        CellPos,
    ) -> Result<Route, GridError>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Single-source Dijkstra with a linear minimum scan.
///
/// Each round selects the unvisited, passable, finite-distance cell with the
/// smallest tentative distance by scanning every cell in row-major order; the
/// first cell found wins ties.  O(V²) per query, which is fine at warehouse
/// scale (≈1 000 cells) and keeps tie-breaking trivially deterministic.
///
/// The visited set lives in per-query scratch space, so the graph is never
/// mutated and needs no reset between queries.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        graph:     &GridGraph,
        occupancy: &OccupancyMap,
        from:      CellPos,
        to:        CellPos,
    ) -> Result<Route, GridError> {
        dijkstra(graph, occupancy, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(
    graph:     &GridGraph,
    occupancy: &OccupancyMap,
    from:      CellPos,
    to:        CellPos,
) -> Result<Route, GridError> {
    let start  = graph.cell_id(from).ok_or(GridError::CellOutOfBounds(from))?;
    let target = graph.cell_id(to).ok_or(GridError::CellOutOfBounds(to))?;

    if start == target {
        return Ok(Route::empty());
    }

    let n = graph.cell_count();
    let passable = |c: usize| c == start.index() || c == target.index() || !occupancy.is_occupied_index(c);

    // dist[c] = best known cost to reach c; u32::MAX = unreached.
    let mut dist    = vec![u32::MAX; n];
    // prev[c] = cell that reached c; INVALID for unreached cells.
    let mut prev    = vec![CellId::INVALID; n];
    let mut visited = vec![false; n];

    dist[start.index()] = 0;

    loop {
        let mut current: Option<usize> = None;
        for c in 0..n {
            if visited[c] || dist[c] == u32::MAX || !passable(c) {
                continue;
            }
            if current.is_none_or(|best| dist[c] < dist[best]) {
                current = Some(c);
            }
        }

        let Some(cur) = current else {
            log::trace!("no path {from} -> {to}");
            return Err(GridError::NotReachable { from, to });
        };

        if cur == target.index() {
            return Ok(reconstruct(graph, &prev, start, target, dist[cur]));
        }
        visited[cur] = true;

        for e in graph.out_edges(CellId(cur as u32)) {
            let next = graph.edge_to[e].index();
            if visited[next] || !passable(next) {
                continue;
            }
            let cost = dist[cur].saturating_add(graph.edge_weight[e]);
            if cost < dist[next] {
                dist[next] = cost;
                prev[next] = CellId(cur as u32);
            }
        }
    }
}

fn reconstruct(graph: &GridGraph, prev: &[CellId], start: CellId, target: CellId, cost: u32) -> Route {
    let mut cells = Vec::new();
    let mut cur = target;
    while cur != start {
        cells.push(graph.pos(cur));
        cur = prev[cur.index()];
    }
    cells.reverse();
    Route { cells, cost }
}
