//! `RobotPool` and its two assignment passes.
//!
//! # Transaction
//!
//! An assignment is planned against an immutable view first:
//!
//! 1. first idle robot, in spawn order;
//! 2. the requested rack, which must be registered and not busy;
//! 3. first free slot of the destination region, in its scan order;
//! 4. a route robot → rack, then a route rack → slot.
//!
//! Only when all four succeed is the plan committed: the rack leaves the
//! registry, the robot lifts it, moves to the slot in one step and sets it
//! down with `busy` cleared.  Any failure returns a [`PoolError`] with the
//! robots, the registry and the occupancy map untouched.
//!
//! # Passes
//!
//! * **Outbound**: stored racks (no transfer flag) go to the outbound
//!   dropoff and are handed back to the caller flagged `ToTruck`.
//! * **Inbound**: racks flagged `FromTruck` go to the first free storage
//!   slot and are registered again as stored racks.
//!
//! Each pass makes at most `max_assignments_per_tick` assignments and stops
//! at the first failure.  A robot works at most once per tick across both
//! passes: the passes skip robots already claimed since the last
//! [`RobotPool::begin_tick`], so the limit spreads work over the fleet
//! instead of teleporting one robot repeatedly.

use wh_core::{CellPos, RackId, RobotId};
use wh_grid::{GridGraph, OccupancyMap, Router};
use wh_racks::{Rack, RackRegistry, Transfer};

use crate::{DropoffRegion, PoolError, PoolResult, Robot};

/// Read-only routing context for one pass.
#[derive(Copy, Clone)]
pub struct Floor<'a> {
    pub graph:  &'a GridGraph,
    pub router: &'a dyn Router,
}

/// A committed assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    pub robot: RobotId,
    /// The rack, set down and released.  It is no longer in the registry.
    pub rack:  Rack,
    pub from:  CellPos,
    /// Cells travelled over both legs.
    pub moves: usize,
}

struct Plan {
    robot: usize,
    rack:  RackId,
    from:  CellPos,
    slot:  CellPos,
    moves: usize,
}

pub struct RobotPool {
    robots:                   Vec<Robot>,
    max_assignments_per_tick: usize,
    /// Robots that made an assignment in a pass since `begin_tick`.
    claimed:                  Vec<RobotId>,
}

impl RobotPool {
    pub fn new(max_assignments_per_tick: usize) -> Self {
        Self {
            robots:                   Vec::new(),
            max_assignments_per_tick: max_assignments_per_tick.max(1),
            claimed:                  Vec::new(),
        }
    }

    /// Add an idle robot at `pos`.
    pub fn spawn(&mut self, pos: CellPos) -> RobotId {
        let id = RobotId(self.robots.len() as u32);
        self.robots.push(Robot::new(id, pos));
        id
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn get(&self, id: RobotId) -> Option<&Robot> {
        self.robots.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Robot> {
        self.robots.iter()
    }

    pub fn len(&self) -> usize {
        self.robots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.robots.is_empty()
    }

    pub fn idle_count(&self) -> usize {
        self.robots.iter().filter(|r| !r.is_busy()).count()
    }

    /// Racks currently owned by a robot.
    pub fn held_racks(&self) -> impl Iterator<Item = &Rack> {
        self.robots.iter().filter_map(Robot::carrying)
    }

    #[inline]
    pub fn max_assignments_per_tick(&self) -> usize {
        self.max_assignments_per_tick
    }

    /// Robots already used by a pass this tick.
    pub fn claimed(&self) -> &[RobotId] {
        &self.claimed
    }

    /// Make every robot available to the passes again.
    pub fn begin_tick(&mut self) {
        self.claimed.clear();
    }

    /// Mutable access for change reporting.  Robots can only be moved by
    /// the pool itself.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Robot> {
        self.robots.iter_mut()
    }

    // ── Assignment ────────────────────────────────────────────────────────

    fn plan(
        &self,
        rack:      RackId,
        racks:     &RackRegistry,
        occupancy: &OccupancyMap,
        floor:     Floor<'_>,
        dropoff:   &DropoffRegion,
        skip:      &[RobotId],
    ) -> PoolResult<Plan> {
        let robot = self
            .robots
            .iter()
            .position(|r| !r.is_busy() && !skip.contains(&r.id))
            .ok_or(PoolError::NoIdleRobot)?;
        let from = racks
            .get(rack)
            .filter(|r| !r.is_busy())
            .map(Rack::pos)
            .ok_or(PoolError::RackUnavailable(rack))?;
        let slot = dropoff
            .first_where_free(|c| !floor.graph.contains(c) || occupancy.is_occupied(c) || racks.is_taken(c))
            .ok_or(PoolError::NoFreeSlot { region: dropoff.name })?;

        let start = self.robots[robot].pos();
        let to_rack = floor.router.route(floor.graph, occupancy, start, from)?;
        let to_slot = floor.router.route(floor.graph, occupancy, from, slot)?;

        Ok(Plan { robot, rack, from, slot, moves: to_rack.len() + to_slot.len() })
    }

    /// Move `rack` to the first free cell of `dropoff` with the first idle
    /// robot.  All or nothing: on `Err` no state has changed.
    pub fn assign_idle_robot_to_rack(
        &mut self,
        rack:      RackId,
        racks:     &mut RackRegistry,
        occupancy: &mut OccupancyMap,
        floor:     Floor<'_>,
        dropoff:   &DropoffRegion,
    ) -> PoolResult<Delivery> {
        self.assign(rack, racks, occupancy, floor, dropoff, &[])
    }

    fn assign(
        &mut self,
        rack:      RackId,
        racks:     &mut RackRegistry,
        occupancy: &mut OccupancyMap,
        floor:     Floor<'_>,
        dropoff:   &DropoffRegion,
        skip:      &[RobotId],
    ) -> PoolResult<Delivery> {
        let plan = self.plan(rack, racks, occupancy, floor, dropoff, skip)?;

        let lifted = racks.remove_rack(plan.rack).ok_or(PoolError::RackUnavailable(plan.rack))?;
        let robot = &mut self.robots[plan.robot];
        robot.teleport(plan.from);
        robot.lift(lifted);
        robot.teleport(plan.slot);
        let released = robot.release().ok_or(PoolError::RackUnavailable(plan.rack))?;

        occupancy.unmark(plan.from);
        occupancy.mark(plan.slot);

        log::trace!(
            "{} moved {} {} -> {} in {} moves",
            robot.id, plan.rack, plan.from, plan.slot, plan.moves
        );
        Ok(Delivery { robot: robot.id, rack: released, from: plan.from, moves: plan.moves })
    }

    /// Carry the first stored rack to the outbound dropoff.  The returned
    /// rack is flagged `ToTruck` and no longer registered.
    pub fn pickup_rack(
        &mut self,
        racks:     &mut RackRegistry,
        occupancy: &mut OccupancyMap,
        floor:     Floor<'_>,
        outbound:  &DropoffRegion,
    ) -> PoolResult<Rack> {
        self.pickup(racks, occupancy, floor, outbound, &[]).map(|d| d.rack)
    }

    fn pickup(
        &mut self,
        racks:     &mut RackRegistry,
        occupancy: &mut OccupancyMap,
        floor:     Floor<'_>,
        outbound:  &DropoffRegion,
        skip:      &[RobotId],
    ) -> PoolResult<Delivery> {
        let id = racks.first_where(Rack::is_idle).map(|r| r.id).ok_or(PoolError::NoPendingRack)?;
        let mut delivery = self.assign(id, racks, occupancy, floor, outbound, skip)?;
        delivery.rack.set_transfer(Transfer::ToTruck);
        Ok(delivery)
    }

    /// Carry the first truck-delivered rack into storage and register it
    /// there as a stored rack.
    pub fn store_inbound_rack(
        &mut self,
        racks:     &mut RackRegistry,
        occupancy: &mut OccupancyMap,
        floor:     Floor<'_>,
        storage:   &DropoffRegion,
    ) -> PoolResult<RackId> {
        self.store(racks, occupancy, floor, storage, &[]).map(|(_, id)| id)
    }

    fn store(
        &mut self,
        racks:     &mut RackRegistry,
        occupancy: &mut OccupancyMap,
        floor:     Floor<'_>,
        storage:   &DropoffRegion,
        skip:      &[RobotId],
    ) -> PoolResult<(RobotId, RackId)> {
        let id = racks
            .first_where(|r| r.is_from_truck() && !r.is_busy())
            .map(|r| r.id)
            .ok_or(PoolError::NoPendingRack)?;
        let mut delivery = self.assign(id, racks, occupancy, floor, storage, skip)?;
        delivery.rack.set_transfer(Transfer::Idle);
        Ok((delivery.robot, racks.insert(delivery.rack)?))
    }

    // ── Passes ────────────────────────────────────────────────────────────

    /// Warehouse → truck.  Returns the racks that reached the dropoff.
    pub fn outbound_pass(
        &mut self,
        racks:     &mut RackRegistry,
        occupancy: &mut OccupancyMap,
        floor:     Floor<'_>,
        outbound:  &DropoffRegion,
    ) -> Vec<Rack> {
        let mut delivered = Vec::new();
        let mut claimed = std::mem::take(&mut self.claimed);
        for _ in 0..self.max_assignments_per_tick {
            match self.pickup(racks, occupancy, floor, outbound, &claimed) {
                Ok(delivery) => {
                    claimed.push(delivery.robot);
                    delivered.push(delivery.rack);
                }
                Err(e) => {
                    log_abort("outbound", &e);
                    break;
                }
            }
        }
        self.claimed = claimed;
        delivered
    }

    /// Truck → warehouse.  Returns the ids of the racks stored.
    pub fn inbound_pass(
        &mut self,
        racks:     &mut RackRegistry,
        occupancy: &mut OccupancyMap,
        floor:     Floor<'_>,
        storage:   &DropoffRegion,
    ) -> Vec<RackId> {
        let mut stored = Vec::new();
        let mut claimed = std::mem::take(&mut self.claimed);
        for _ in 0..self.max_assignments_per_tick {
            match self.store(racks, occupancy, floor, storage, &claimed) {
                Ok((robot, id)) => {
                    claimed.push(robot);
                    stored.push(id);
                }
                Err(e) => {
                    log_abort("inbound", &e);
                    break;
                }
            }
        }
        self.claimed = claimed;
        stored
    }
}

fn log_abort(pass: &str, e: &PoolError) {
    match e {
        PoolError::NoPendingRack | PoolError::NoIdleRobot => log::trace!("{pass} pass idle: {e}"),
        _ => log::debug!("{pass} assignment aborted, retrying next tick: {e}"),
    }
}
