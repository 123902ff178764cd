//! The `World` struct and its tick loop.

use std::collections::HashSet;

use wh_bay::Bay;
use wh_core::{CellPos, RackId, SimClock, Tick, WarehouseConfig};
use wh_grid::{DijkstraRouter, GridGraph, OccupancyMap, Router};
use wh_racks::{Rack, RackRegistry};
use wh_robots::{DropoffRegion, Floor, RobotPool};

use crate::{Entity, EntityMut, SimError, SimResult, Snapshot, Step, WorldEvent, WorldObserver};

/// The warehouse: grid, racks, robots, trucks and the bay.
///
/// One tick runs these phases in order:
///
/// 1. **Replenish**: while the bay holds delivered racks, one is placed on
///    the first free inbound dock cell, flagged from-truck.
/// 2. **Bay**: trucks advance, the bay handles their events and loads one
///    staged package onto a docked truck.
/// 3. **Occupancy**: the bitmap is rebuilt from rack positions.
/// 4. **Robots**: the inbound pass stores delivered racks; the outbound
///    pass, only while a truck is docked, carries stored racks to the
///    outbound dropoff where the bay stages them.  Each robot serves at most
///    one assignment per tick.
/// 5. **Collect**: every entity closes its tick through [`Step`] and the
///    changed ones form the tick's event batch.
///
/// Truck advancement always precedes robot assignment, because assignment
/// depends on the bay's just-updated counters.  Observers only see the batch
/// after phase 5.
///
/// Create via [`WorldBuilder`][crate::WorldBuilder].
pub struct World<R: Router = DijkstraRouter> {
    /// Configuration the world was built from.
    pub config: WarehouseConfig,

    /// Tick counter and wall-clock mapping.
    pub clock: SimClock,

    pub(crate) graph:     GridGraph,
    pub(crate) router:    R,
    pub(crate) occupancy: OccupancyMap,
    pub(crate) racks:     RackRegistry,
    pub(crate) robots:    RobotPool,
    pub(crate) bay:       Bay,

    /// Outbound dropoff slots, row-major.
    pub(crate) outbound: DropoffRegion,
    /// Storage slots, row-major.
    pub(crate) storage:  DropoffRegion,
    /// Inbound dock cells, row-major.
    pub(crate) inbound:  DropoffRegion,
}

impl<R: Router> World<R> {
    // ── Running ───────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: WorldObserver + ?Sized>(&mut self, observer: &mut O) {
        while self.clock.current_tick < self.config.end_tick() {
            self.tick_observed(observer);
        }
        observer.on_run_end(self.clock.current_tick);
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: WorldObserver + ?Sized>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.tick_observed(observer);
        }
    }

    /// Run one tick, reporting to `observer`.  Returns the number of events.
    pub fn tick_observed<O: WorldObserver + ?Sized>(&mut self, observer: &mut O) -> usize {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let events = self.process_tick(now);
        if !events.is_empty() {
            observer.on_batch(now, &events);
        }
        observer.on_tick_end(now, events.len());
        self.clock.advance();
        events.len()
    }

    /// Run one tick and return its event batch.
    pub fn tick(&mut self) -> Vec<WorldEvent> {
        let now = self.clock.current_tick;
        let events = self.process_tick(now);
        self.clock.advance();
        events
    }

    // ── Tick phases ───────────────────────────────────────────────────────

    fn process_tick(&mut self, now: Tick) -> Vec<WorldEvent> {
        let mut events = Vec::new();

        // ── Phase 1: replenish the inbound dock ───────────────────────────
        self.replenish_inbound();

        // ── Phase 2: trucks and bay ───────────────────────────────────────
        if let Some(loaded) = self.bay.step() {
            events.push(WorldEvent::Remove(loaded.snapshot()));
        }

        // ── Phase 3: occupancy ────────────────────────────────────────────
        self.racks
            .rebuild_occupancy(&mut self.occupancy, self.bay.staged_racks().map(Rack::pos));

        // ── Phase 4: robot passes ─────────────────────────────────────────
        let floor = Floor { graph: &self.graph, router: &self.router };
        self.robots.begin_tick();
        self.robots
            .inbound_pass(&mut self.racks, &mut self.occupancy, floor, &self.storage);
        if self.bay.has_docked_truck() {
            let delivered =
                self.robots.outbound_pass(&mut self.racks, &mut self.occupancy, floor, &self.outbound);
            for mut rack in delivered {
                // Staged racks leave the registry, so close their tick here.
                if let Some(s) = rack.step(now) {
                    events.push(WorldEvent::Update(s));
                }
                self.bay.stage_package(rack);
            }
        }

        // ── Phase 5: collect changes ──────────────────────────────────────
        let robots = self.robots.iter_mut().map(EntityMut::Robot);
        let racks = self.racks.iter_mut().map(EntityMut::Rack);
        let trucks = self.bay.trucks_mut().map(EntityMut::Truck);
        for mut entity in robots.chain(racks).chain(trucks) {
            if let Some(s) = entity.step(now) {
                events.push(WorldEvent::Update(s));
            }
        }

        events
    }

    fn replenish_inbound(&mut self) {
        if self.bay.pending_racks() == 0 {
            return;
        }
        let racks = &self.racks;
        let bay = &self.bay;
        let free = self
            .inbound
            .first_where_free(|c| racks.is_taken(c) || bay.staged_racks().any(|r| r.pos() == c));
        let Some(cell) = free else {
            log::debug!("inbound dock full, {} racks waiting at the bay", self.bay.pending_racks());
            return;
        };
        match self.racks.add_from_truck(cell) {
            Ok(id) => {
                self.bay.take_delivered_rack();
                log::debug!("{id} unloaded onto the dock at {cell}");
            }
            Err(e) => log::debug!("inbound placement failed: {e}"),
        }
    }

    // ── Views ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn graph(&self) -> &GridGraph {
        &self.graph
    }

    pub fn occupancy(&self) -> &OccupancyMap {
        &self.occupancy
    }

    pub fn racks(&self) -> &RackRegistry {
        &self.racks
    }

    pub fn robots(&self) -> &RobotPool {
        &self.robots
    }

    pub fn bay(&self) -> &Bay {
        &self.bay
    }

    /// A snapshot of every live entity: robots, registered racks, racks
    /// staged at the bay, and trucks.  For observers that join mid-run.
    pub fn snapshot_all(&self) -> Vec<Snapshot> {
        self.robots
            .iter()
            .map(Entity::snapshot)
            .chain(self.racks.iter().map(Entity::snapshot))
            .chain(self.bay.staged_racks().map(Entity::snapshot))
            .chain(self.bay.trucks().iter().map(Entity::snapshot))
            .collect()
    }

    // ── Audit ─────────────────────────────────────────────────────────────

    /// Check the cross-container invariants that must hold between ticks.
    pub fn audit(&self) -> SimResult<()> {
        let held: HashSet<RackId> = self.robots.held_racks().map(|r| r.id).collect();
        let on_floor = || self.racks.iter().chain(self.bay.staged_racks());

        if let Some(r) = on_floor().find(|r| r.is_busy() && !held.contains(&r.id)) {
            return Err(SimError::Audit(format!("{} is busy without an owning robot", r.id)));
        }
        if let Some(r) = self.racks.racks_in_transit_to_truck().next() {
            return Err(SimError::Audit(format!("{} is registered but bound for a truck", r.id)));
        }
        if let Some(r) = on_floor().find(|r| r.is_from_truck() && r.is_to_truck()) {
            return Err(SimError::Audit(format!("{} is flagged both ways", r.id)));
        }
        if !self.racks.index_is_consistent() {
            return Err(SimError::Audit("rack position index out of sync".into()));
        }
        let mut cells: HashSet<CellPos> = HashSet::new();
        if let Some(r) = on_floor().find(|r| !cells.insert(r.pos())) {
            return Err(SimError::Audit(format!("{} shares {} with another rack", r.id, r.pos())));
        }
        for robot in self.robots.iter() {
            if let Some(rack) = robot.carrying().filter(|r| r.pos() != robot.pos()) {
                return Err(SimError::Audit(format!("{} is not under {}", rack.id, robot.id)));
            }
        }
        for truck in self.bay.trucks() {
            if truck.packages() > truck.capacity() {
                return Err(SimError::Audit(format!(
                    "{} holds {} packages, capacity {}",
                    truck.id,
                    truck.packages(),
                    truck.capacity()
                )));
            }
        }
        Ok(())
    }
}
