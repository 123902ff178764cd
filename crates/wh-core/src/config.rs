//! Simulation configuration.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and passed to `wh_sim::WorldBuilder`.  Every struct has a
//! `Default` that reproduces the reference 32 × 32 warehouse, so a config
//! file only needs to name the fields it changes.

use crate::{CellPos, CellRect, WhError, WhResult};

// ── AisleLanes ────────────────────────────────────────────────────────────────

/// The lane pattern of the warehouse floor.
///
/// Inside the square `[first, last]²`:
///
/// - every row is a horizontal lane (left/right neighbours are linked);
/// - vertical links only exist on *aisle columns* (`first`, `first + stride`,
///   `first + 2·stride`, …) and everywhere in the open *yard* at
///   `row >= open_rows_from`.
///
/// Cells outside the square exist but have no edges.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AisleLanes {
    pub first: u32,
    pub last: u32,
    pub stride: u32,
    pub open_rows_from: u32,
}

impl AisleLanes {
    #[inline]
    pub fn in_bounds(&self, cell: CellPos) -> bool {
        (self.first..=self.last).contains(&cell.row) && (self.first..=self.last).contains(&cell.col)
    }

    /// `true` for columns that carry a vertical aisle.
    #[inline]
    pub fn is_aisle_col(&self, col: u32) -> bool {
        col >= self.first && (col - self.first) % self.stride.max(1) == 0
    }
}

impl Default for AisleLanes {
    fn default() -> Self {
        Self { first: 2, last: 31, stride: 3, open_rows_from: 23 }
    }
}

// ── LayoutConfig ──────────────────────────────────────────────────────────────

/// Floor plan: grid size, lane pattern and the named regions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    pub rows: u32,
    pub cols: u32,
    pub lanes: AisleLanes,

    /// Bounding box of rack storage.  Aisle columns and `storage_gap_cols`
    /// inside it stay free.
    pub storage: CellRect,

    /// Extra storage columns kept free as cross aisles.
    pub storage_gap_cols: Vec<u32>,

    /// Where racks bound for a truck are dropped.
    pub outbound_dropoff: CellRect,

    /// Where racks delivered by a truck appear.
    pub inbound_dock: CellRect,

    /// Robot spawn cells, filled row-major.
    pub robot_spawn: CellRect,
}

impl LayoutConfig {
    /// `true` if a rack may be stored on `cell`.
    pub fn is_storage_cell(&self, cell: CellPos) -> bool {
        self.storage.contains(cell)
            && !self.lanes.is_aisle_col(cell.col)
            && !self.storage_gap_cols.contains(&cell.col)
    }

    /// All storage cells in row-major order.
    pub fn storage_cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.storage.cells().filter(move |&c| self.is_storage_cell(c))
    }

    fn in_grid(&self, rect: &CellRect) -> bool {
        !rect.is_empty() && rect.row_max < self.rows && rect.col_max < self.cols
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rows:             32,
            cols:             32,
            lanes:            AisleLanes::default(),
            storage:          CellRect::new(2, 24, 2, 28),
            storage_gap_cols: vec![15],
            outbound_dropoff: CellRect::new(25, 26, 2, 28),
            inbound_dock:     CellRect::new(27, 27, 2, 28),
            robot_spawn:      CellRect::new(29, 30, 2, 30),
        }
    }
}

// ── TruckConfig ───────────────────────────────────────────────────────────────

/// Truck fleet and road geometry.  Trucks drive along `z` only.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TruckConfig {
    /// Package capacity per truck, also the rack load picked up at the road.
    pub capacity: u32,
    /// Fixed `x` of each truck; one truck is spawned per entry.
    pub lanes_x: Vec<f64>,
    pub start_z: f64,
    pub bay_z: f64,
    pub road_z: f64,
    /// Distance driven per tick.
    pub speed: f64,
    /// A truck within this distance of its target has arrived.
    pub arrive_epsilon: f64,
    /// Racks on board when the truck first drives to the bay.
    pub initial_racks: u32,
}

impl Default for TruckConfig {
    fn default() -> Self {
        Self {
            capacity:       30,
            lanes_x:        vec![10.0, 20.0],
            start_z:        -10.0,
            bay_z:          -15.0,
            road_z:         -30.0,
            speed:          0.2,
            arrive_epsilon: 0.25,
            initial_racks:  30,
        }
    }
}

// ── WarehouseConfig ───────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WarehouseConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Ticks simulated by `World::run`.
    pub total_ticks: u64,

    /// Wall-clock pause between ticks for the background driver.
    pub tick_interval_ms: u64,

    /// Probability (percent) that each storage cell starts with a rack.
    pub rack_fill_percent: u8,

    /// Number of robots, bounded by the spawn region.
    pub robot_count: usize,

    /// Assignments each robot-pool pass may complete per tick.
    pub max_assignments_per_tick: usize,

    pub layout: LayoutConfig,
    pub trucks: TruckConfig,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            seed:                     42,
            total_ticks:              1_000,
            tick_interval_ms:         100,
            rack_fill_percent:        40,
            robot_count:              10,
            max_assignments_per_tick: 1,
            layout:                   LayoutConfig::default(),
            trucks:                   TruckConfig::default(),
        }
    }
}

impl WarehouseConfig {
    /// The tick at which `World::run` stops (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> crate::Tick {
        crate::Tick(self.total_ticks)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> WhResult<()> {
        let layout = &self.layout;
        if layout.rows == 0 || layout.cols == 0 {
            return Err(WhError::Config("grid must have at least one row and column".into()));
        }
        if self.rack_fill_percent > 100 {
            return Err(WhError::Config(format!(
                "rack_fill_percent {} exceeds 100",
                self.rack_fill_percent
            )));
        }
        if self.max_assignments_per_tick == 0 {
            return Err(WhError::Config("max_assignments_per_tick must be at least 1".into()));
        }
        if layout.lanes.stride == 0 {
            return Err(WhError::Config("lane stride must be at least 1".into()));
        }
        for (name, rect) in [
            ("storage", &layout.storage),
            ("outbound_dropoff", &layout.outbound_dropoff),
            ("inbound_dock", &layout.inbound_dock),
            ("robot_spawn", &layout.robot_spawn),
        ] {
            if !layout.in_grid(rect) {
                return Err(WhError::Config(format!("{name} region {rect:?} lies outside the grid")));
            }
        }
        if self.robot_count > layout.robot_spawn.len() {
            return Err(WhError::Config(format!(
                "{} robots requested but the spawn region holds {}",
                self.robot_count,
                layout.robot_spawn.len()
            )));
        }
        let trucks = &self.trucks;
        if trucks.capacity == 0 {
            return Err(WhError::Config("truck capacity must be at least 1".into()));
        }
        if trucks.initial_racks > trucks.capacity {
            return Err(WhError::Config("initial_racks exceeds truck capacity".into()));
        }
        if trucks.speed <= 0.0 || trucks.arrive_epsilon < trucks.speed / 2.0 {
            return Err(WhError::Config(
                "truck speed must be positive and arrive_epsilon at least half of it".into(),
            ));
        }
        Ok(())
    }
}
