//! Unit tests for wh-grid.
//!
//! All tests use hand-built lattices small enough to reason about by eye.

#[cfg(test)]
mod helpers {
    use std::collections::VecDeque;

    use wh_core::CellPos;

    use crate::{FullLattice, GridGraph, OccupancyMap};

    pub fn open_grid(rows: u32, cols: u32) -> GridGraph {
        GridGraph::build(rows, cols, &FullLattice)
    }

    pub fn c(row: u32, col: u32) -> CellPos {
        CellPos::new(row, col)
    }

    /// Reference BFS distance for unit-weight graphs, honouring the same
    /// endpoint exemption as the router.
    pub fn bfs_distance(
        graph: &GridGraph,
        occ:   &OccupancyMap,
        from:  CellPos,
        to:    CellPos,
    ) -> Option<u32> {
        let mut dist = vec![u32::MAX; graph.cell_count()];
        let start = graph.cell_id(from)?;
        dist[start.index()] = 0;
        let mut queue = VecDeque::from([from]);
        while let Some(cur) = queue.pop_front() {
            if cur == to {
                return Some(dist[graph.cell_id(cur)?.index()]);
            }
            let d = dist[graph.cell_id(cur)?.index()];
            for next in graph.neighbours(cur) {
                let id = graph.cell_id(next)?.index();
                if dist[id] != u32::MAX || (occ.is_occupied(next) && next != to) {
                    continue;
                }
                dist[id] = d + 1;
                queue.push_back(next);
            }
        }
        None
    }
}

// ── Builder & lattice structure ───────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use wh_core::{AisleLanes, CellPos};

    use super::helpers::{c, open_grid};
    use crate::{GridGraph, GridGraphBuilder};

    #[test]
    fn empty_build() {
        let g = GridGraphBuilder::new(3, 3).build();
        assert_eq!(g.cell_count(), 9);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn open_lattice_degrees() {
        let g = open_grid(3, 3);
        // 2 * (rows*(cols-1) + cols*(rows-1)) directed edges.
        assert_eq!(g.edge_count(), 2 * (3 * 2 + 3 * 2));
        assert_eq!(g.out_degree(g.cell_id(c(0, 0)).unwrap()), 2);
        assert_eq!(g.out_degree(g.cell_id(c(1, 1)).unwrap()), 4);
        assert_eq!(g.out_degree(g.cell_id(c(2, 1)).unwrap()), 3);
    }

    #[test]
    fn re_adding_an_edge_replaces_weight() {
        let mut b = GridGraphBuilder::new(1, 2);
        b.add_edge(c(0, 0), c(0, 1), 5);
        b.add_edge(c(0, 0), c(0, 1), 2);
        let g = b.build();
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edge_weight_between(c(0, 0), c(0, 1)), Some(2));
        assert_eq!(g.edge_weight_between(c(0, 1), c(0, 0)), Some(2));
    }

    #[test]
    fn self_loop_added_once() {
        let mut b = GridGraphBuilder::new(1, 1);
        b.add_edge(c(0, 0), c(0, 0), 1);
        assert_eq!(b.build().edge_count(), 1);
    }

    #[test]
    fn directed_only_edge() {
        let mut b = GridGraphBuilder::new(1, 2);
        b.add_directed_edge(c(0, 0), c(0, 1), 1);
        let g = b.build();
        assert_eq!(g.neighbours(c(0, 0)), vec![c(0, 1)]);
        assert!(g.neighbours(c(0, 1)).is_empty());
    }

    #[test]
    fn cell_id_roundtrip() {
        let g = open_grid(4, 5);
        for row in 0..4 {
            for col in 0..5 {
                let pos = CellPos::new(row, col);
                assert_eq!(g.pos(g.cell_id(pos).unwrap()), pos);
            }
        }
        assert!(g.cell_id(c(4, 0)).is_none());
    }

    #[test]
    fn aisle_lanes_restrict_vertical_moves() {
        let lanes = AisleLanes { first: 0, last: 5, stride: 3, open_rows_from: 4 };
        let g = GridGraph::build(6, 6, &lanes);

        // Column 0 and 3 are aisles: vertical links exist.
        assert!(g.edge_weight_between(c(0, 0), c(1, 0)).is_some());
        assert!(g.edge_weight_between(c(1, 3), c(2, 3)).is_some());
        // Column 1 is storage: no vertical link above the yard.
        assert!(g.edge_weight_between(c(0, 1), c(1, 1)).is_none());
        // Yard rows link everywhere.
        assert!(g.edge_weight_between(c(4, 1), c(5, 1)).is_some());
        // Every row is a horizontal lane.
        assert!(g.edge_weight_between(c(2, 1), c(2, 2)).is_some());
    }

    #[test]
    fn cells_outside_lane_square_are_isolated() {
        let lanes = AisleLanes { first: 2, last: 4, stride: 2, open_rows_from: 4 };
        let g = GridGraph::build(6, 6, &lanes);
        assert!(g.neighbours(c(0, 0)).is_empty());
        assert!(g.neighbours(c(5, 5)).is_empty());
        assert!(g.edge_weight_between(c(4, 4), c(5, 4)).is_none());
    }
}

// ── Occupancy ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod occupancy {
    use super::helpers::c;
    use crate::OccupancyMap;

    #[test]
    fn rebuild_replaces_contents_and_bumps_version() {
        let mut occ = OccupancyMap::from_cells(3, 3, [c(0, 0), c(1, 1)]);
        assert_eq!(occ.version(), 0);
        assert_eq!(occ.occupied_count(), 2);

        occ.rebuild([c(2, 2)]);
        assert_eq!(occ.version(), 1);
        assert!(!occ.is_occupied(c(0, 0)));
        assert!(occ.is_occupied(c(2, 2)));
    }

    #[test]
    fn out_of_grid_cells_are_ignored() {
        let mut occ = OccupancyMap::new(2, 2);
        assert!(!occ.mark(c(5, 5)));
        assert!(!occ.is_occupied(c(5, 5)));
        assert_eq!(occ.occupied_count(), 0);
    }

    #[test]
    fn first_free_follows_iteration_order() {
        let occ = OccupancyMap::from_cells(3, 3, [c(2, 0), c(2, 1)]);
        let row = (0..3).map(|col| c(2, col));
        assert_eq!(occ.first_free(row), Some(c(2, 2)));
        let full = OccupancyMap::from_cells(1, 2, [c(0, 0), c(0, 1)]);
        assert_eq!(full.first_free([c(0, 0), c(0, 1)]), None);
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use wh_core::SimRng;

    use super::helpers::{bfs_distance, c, open_grid};
    use crate::{DijkstraRouter, GridError, GridGraphBuilder, OccupancyMap, Router};

    #[test]
    fn same_cell_is_empty_route() {
        let g = open_grid(4, 4);
        let occ = OccupancyMap::new(4, 4);
        for row in 0..4 {
            for col in 0..4 {
                let r = DijkstraRouter.route(&g, &occ, c(row, col), c(row, col)).unwrap();
                assert!(r.is_trivial());
                assert_eq!(r.cost, 0);
            }
        }
    }

    #[test]
    fn straight_line_route() {
        let g = open_grid(1, 4);
        let occ = OccupancyMap::new(1, 4);
        let r = DijkstraRouter.route(&g, &occ, c(0, 0), c(0, 3)).unwrap();
        assert_eq!(r.cells, vec![c(0, 1), c(0, 2), c(0, 3)]);
        assert_eq!(r.cost, 3);
        assert_eq!(r.last(), Some(c(0, 3)));
    }

    #[test]
    fn route_is_contiguous_along_edges() {
        let g = open_grid(5, 5);
        let occ = OccupancyMap::from_cells(5, 5, [c(1, 1), c(2, 2), c(3, 1)]);
        let r = DijkstraRouter.route(&g, &occ, c(0, 0), c(4, 4)).unwrap();
        let mut prev = c(0, 0);
        let mut total = 0;
        for &cell in &r.cells {
            total += g.edge_weight_between(prev, cell).expect("consecutive cells must be linked");
            assert!(!occ.is_occupied(cell));
            prev = cell;
        }
        assert_eq!(total, r.cost);
    }

    #[test]
    fn weighted_route_prefers_cheaper_detour() {
        // 0 ─10─ 1
        // │      │
        // 1      1
        // │      │
        // 2 ─1── 3     direct 0→1 costs 10, detour 0→2→3→1 costs 3.
        let mut b = GridGraphBuilder::new(2, 2);
        b.add_edge(c(0, 0), c(0, 1), 10);
        b.add_edge(c(0, 0), c(1, 0), 1);
        b.add_edge(c(1, 0), c(1, 1), 1);
        b.add_edge(c(1, 1), c(0, 1), 1);
        let g = b.build();
        let occ = OccupancyMap::new(2, 2);
        let r = DijkstraRouter.route(&g, &occ, c(0, 0), c(0, 1)).unwrap();
        assert_eq!(r.cost, 3);
        assert_eq!(r.cells, vec![c(1, 0), c(1, 1), c(0, 1)]);
    }

    #[test]
    fn separating_wall_is_not_reachable() {
        let g = open_grid(4, 4);
        let wall = (0..4).map(|row| c(row, 2));
        let occ = OccupancyMap::from_cells(4, 4, wall);
        let err = DijkstraRouter.route(&g, &occ, c(0, 0), c(3, 3)).unwrap_err();
        assert_eq!(err, GridError::NotReachable { from: c(0, 0), to: c(3, 3) });
    }

    #[test]
    fn disconnected_target_is_not_reachable() {
        let g = GridGraphBuilder::new(2, 2).build();
        let occ = OccupancyMap::new(2, 2);
        assert!(matches!(
            DijkstraRouter.route(&g, &occ, c(0, 0), c(1, 1)),
            Err(GridError::NotReachable { .. })
        ));
    }

    #[test]
    fn occupied_endpoints_are_allowed() {
        let g = open_grid(1, 3);
        let occ = OccupancyMap::from_cells(1, 3, [c(0, 0), c(0, 2)]);
        let r = DijkstraRouter.route(&g, &occ, c(0, 0), c(0, 2)).unwrap();
        assert_eq!(r.cells, vec![c(0, 1), c(0, 2)]);
    }

    #[test]
    fn occupied_intermediate_blocks() {
        let g = open_grid(1, 3);
        let occ = OccupancyMap::from_cells(1, 3, [c(0, 1)]);
        assert!(DijkstraRouter.route(&g, &occ, c(0, 0), c(0, 2)).is_err());
    }

    #[test]
    fn out_of_bounds_endpoint_is_error() {
        let g = open_grid(2, 2);
        let occ = OccupancyMap::new(2, 2);
        assert_eq!(
            DijkstraRouter.route(&g, &occ, c(0, 0), c(9, 9)),
            Err(GridError::CellOutOfBounds(c(9, 9)))
        );
    }

    #[test]
    fn tie_break_is_deterministic() {
        let g = open_grid(3, 3);
        let occ = OccupancyMap::new(3, 3);
        let first = DijkstraRouter.route(&g, &occ, c(0, 0), c(2, 2)).unwrap();
        for _ in 0..10 {
            assert_eq!(DijkstraRouter.route(&g, &occ, c(0, 0), c(2, 2)).unwrap(), first);
        }
    }

    #[test]
    fn router_is_reusable_after_failure() {
        let g = open_grid(3, 3);
        let blocked = OccupancyMap::from_cells(3, 3, [c(0, 1), c(1, 1), c(2, 1)]);
        let free = OccupancyMap::new(3, 3);
        assert!(DijkstraRouter.route(&g, &blocked, c(0, 0), c(0, 2)).is_err());
        assert_eq!(DijkstraRouter.route(&g, &free, c(0, 0), c(0, 2)).unwrap().cost, 2);
    }

    #[test]
    fn cost_matches_bfs_on_random_occupancy() {
        let g = open_grid(6, 6);
        let mut rng = SimRng::new(2024);
        for _ in 0..40 {
            let cells = (0..6).flat_map(|r| (0..6).map(move |col| c(r, col)));
            let blocked: Vec<_> = cells.filter(|_| rng.percent_chance(30)).collect();
            let occ = OccupancyMap::from_cells(6, 6, blocked);
            let from = c(rng.gen_range(0..6), rng.gen_range(0..6));
            let to = c(rng.gen_range(0..6), rng.gen_range(0..6));

            let expected = bfs_distance(&g, &occ, from, to);
            match DijkstraRouter.route(&g, &occ, from, to) {
                Ok(route) => assert_eq!(Some(route.cost), expected, "{from} -> {to}"),
                Err(_) => assert_eq!(expected, None, "{from} -> {to}"),
            }
        }
    }
}
