//! Fluent builder for constructing a [`World`].

use wh_bay::Bay;
use wh_core::{CellPos, SimClock, SimRng, WarehouseConfig};
use wh_grid::{DijkstraRouter, GridGraph, Router};
use wh_racks::RackRegistry;
use wh_robots::{DropoffRegion, RobotPool};

use crate::{SimError, SimResult, World};

/// Fluent builder for [`World<R>`].
///
/// # Optional inputs (have defaults)
///
/// | Method         | Default                                                  |
/// |----------------|----------------------------------------------------------|
/// | `.router(r)`   | [`DijkstraRouter`]                                       |
/// | `.racks(v)`    | Seeded fill of the storage cells (`rack_fill_percent`)   |
/// | `.robots(v)`   | First `robot_count` spawn cells, row after row           |
///
/// # Example
///
/// ```rust,ignore
/// let mut world = WorldBuilder::new(WarehouseConfig::default()).build()?;
/// world.run(&mut NoopObserver);
/// ```
pub struct WorldBuilder<R: Router = DijkstraRouter> {
    config: WarehouseConfig,
    router: R,
    racks:  Option<Vec<CellPos>>,
    robots: Option<Vec<CellPos>>,
}

impl WorldBuilder<DijkstraRouter> {
    pub fn new(config: WarehouseConfig) -> Self {
        Self { config, router: DijkstraRouter, racks: None, robots: None }
    }
}

impl<R: Router> WorldBuilder<R> {
    /// Replace the routing algorithm.
    pub fn router<R2: Router>(self, router: R2) -> WorldBuilder<R2> {
        WorldBuilder { config: self.config, router, racks: self.racks, robots: self.robots }
    }

    /// Place racks on exactly these cells instead of the seeded fill.
    pub fn racks(mut self, cells: Vec<CellPos>) -> Self {
        self.racks = Some(cells);
        self
    }

    /// Spawn robots on exactly these cells, in order, ignoring
    /// `robot_count`.
    pub fn robots(mut self, cells: Vec<CellPos>) -> Self {
        self.robots = Some(cells);
        self
    }

    /// Validate the configuration, lay out the floor and return a world at
    /// tick 0.
    pub fn build(self) -> SimResult<World<R>> {
        self.config.validate()?;
        let config = self.config;
        let layout = &config.layout;

        let graph = GridGraph::build(layout.rows, layout.cols, &layout.lanes);

        // ── Racks ─────────────────────────────────────────────────────────
        let mut racks = RackRegistry::new();
        match self.racks {
            Some(cells) => {
                for cell in cells {
                    if !graph.contains(cell) {
                        return Err(SimError::Config(format!("rack cell {cell} lies outside the grid")));
                    }
                    racks.add_rack(cell).map_err(|e| SimError::Config(e.to_string()))?;
                }
            }
            None => {
                let mut rng = SimRng::new(config.seed);
                let mut candidates = 0usize;
                for cell in layout.storage_cells() {
                    candidates += 1;
                    if rng.percent_chance(config.rack_fill_percent) {
                        racks.add_rack(cell).map_err(|e| SimError::Config(e.to_string()))?;
                    }
                }
                log::info!(
                    "placed {} racks over {} storage cells ({}% fill, seed {})",
                    racks.len(),
                    candidates,
                    config.rack_fill_percent,
                    config.seed
                );
            }
        }

        // ── Robots ────────────────────────────────────────────────────────
        let spawn: Vec<CellPos> = match self.robots {
            Some(cells) => {
                if let Some(cell) = cells.iter().find(|&&c| !graph.contains(c)) {
                    return Err(SimError::Config(format!("robot cell {cell} lies outside the grid")));
                }
                cells
            }
            None => layout.robot_spawn.cells().take(config.robot_count).collect(),
        };
        let mut robots = RobotPool::new(config.max_assignments_per_tick);
        for cell in spawn {
            robots.spawn(cell);
        }

        // ── Bay and regions ───────────────────────────────────────────────
        let bay = Bay::new(&config.trucks);
        let outbound = DropoffRegion::from_rect("outbound dropoff", &layout.outbound_dropoff);
        let storage = DropoffRegion::from_cells("storage", layout.storage_cells());
        let inbound = DropoffRegion::from_rect("inbound dock", &layout.inbound_dock);

        let occupancy = racks.occupancy_bitmap(layout.rows, layout.cols);

        log::info!(
            "world ready: {}x{} grid, {} racks, {} robots, {} trucks",
            layout.rows,
            layout.cols,
            racks.len(),
            robots.len(),
            bay.trucks().len()
        );

        Ok(World {
            clock: SimClock::new(config.tick_interval_ms),
            config,
            graph,
            router: self.router,
            occupancy,
            racks,
            robots,
            bay,
            outbound,
            storage,
            inbound,
        })
    }
}
