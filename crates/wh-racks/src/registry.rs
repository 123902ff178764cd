//! `RackRegistry`: every rack that currently sits on the warehouse floor.
//!
//! # Ordering
//!
//! Racks are kept in insertion order.  The robot pool scans them front to
//! back, so "first eligible rack" is FIFO by registration.  A rack that is
//! taken out (lifted by a robot) and put back goes to the end of the queue.
//!
//! # Position index
//!
//! A `cell → rack` map enforces one rack per cell.  With the `fx-hash`
//! feature it uses FxHash instead of SipHash.
//!
//! # Occupancy
//!
//! The registry does not keep an occupancy bitmap of its own.  The tick
//! driver calls [`rebuild_occupancy`](RackRegistry::rebuild_occupancy) once
//! per tick, which costs O(cells) per tick instead of per edit.

use wh_core::{CellPos, RackId};
use wh_grid::OccupancyMap;

use crate::{Rack, RegistryError, RegistryResult, Transfer};

#[cfg(feature = "fx-hash")]
type CellIndex = rustc_hash::FxHashMap<CellPos, RackId>;
#[cfg(not(feature = "fx-hash"))]
type CellIndex = std::collections::HashMap<CellPos, RackId>;

#[derive(Default)]
pub struct RackRegistry {
    racks:   Vec<Rack>,
    by_cell: CellIndex,
    next_id: u32,
}

impl RackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Membership ────────────────────────────────────────────────────────

    /// Register a new stored rack at `pos`.
    pub fn add_rack(&mut self, pos: CellPos) -> RegistryResult<RackId> {
        self.add_with(pos, Transfer::Idle)
    }

    /// Register a rack just delivered by a truck.  It is flagged
    /// [`Transfer::FromTruck`] until a robot stores it.
    pub fn add_from_truck(&mut self, pos: CellPos) -> RegistryResult<RackId> {
        self.add_with(pos, Transfer::FromTruck)
    }

    fn add_with(&mut self, pos: CellPos, transfer: Transfer) -> RegistryResult<RackId> {
        self.check_free(pos)?;
        let id = RackId(self.next_id);
        self.next_id += 1;
        let mut rack = Rack::new(id, pos);
        rack.set_transfer(transfer);
        self.push(rack);
        Ok(id)
    }

    /// Put back a rack that was previously removed, keeping its id.
    pub fn insert(&mut self, rack: Rack) -> RegistryResult<RackId> {
        self.check_free(rack.pos())?;
        wh_core::invariant!(!self.contains(rack.id), "{} inserted twice", rack.id);
        wh_core::invariant!(!rack.is_busy(), "{} inserted while still held", rack.id);
        let id = rack.id;
        self.next_id = self.next_id.max(id.0 + 1);
        self.push(rack);
        Ok(id)
    }

    fn check_free(&self, pos: CellPos) -> RegistryResult<()> {
        match self.by_cell.get(&pos) {
            Some(&existing) => Err(RegistryError::CellTaken { cell: pos, existing }),
            None => Ok(()),
        }
    }

    fn push(&mut self, rack: Rack) {
        self.by_cell.insert(rack.pos(), rack.id);
        self.racks.push(rack);
    }

    /// Take a rack out of the registry.  Unknown ids are a no-op.
    pub fn remove_rack(&mut self, id: RackId) -> Option<Rack> {
        let i = self.position(id)?;
        let rack = self.racks.remove(i);
        self.by_cell.remove(&rack.pos());
        Some(rack)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    fn position(&self, id: RackId) -> Option<usize> {
        self.racks.iter().position(|r| r.id == id)
    }

    pub fn get(&self, id: RackId) -> Option<&Rack> {
        self.position(id).map(|i| &self.racks[i])
    }

    pub fn contains(&self, id: RackId) -> bool {
        self.position(id).is_some()
    }

    pub fn rack_at(&self, pos: CellPos) -> Option<&Rack> {
        self.by_cell.get(&pos).and_then(|&id| self.get(id))
    }

    pub fn is_taken(&self, pos: CellPos) -> bool {
        self.by_cell.contains_key(&pos)
    }

    /// Racks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rack> {
        self.racks.iter()
    }

    /// First rack in insertion order matching `pred`.
    pub fn first_where(&self, mut pred: impl FnMut(&Rack) -> bool) -> Option<&Rack> {
        self.racks.iter().find(|r| pred(r))
    }

    /// Racks handed over for truck pickup that are still registered.
    ///
    /// Racks bound for a truck leave the registry as soon as they reach the
    /// outbound dropoff, so outside of a robot pass this is empty.
    pub fn racks_in_transit_to_truck(&self) -> impl Iterator<Item = &Rack> {
        self.racks.iter().filter(|r| r.is_to_truck())
    }

    /// Racks delivered by a truck that still wait for a storage slot.
    pub fn racks_from_truck(&self) -> impl Iterator<Item = &Rack> {
        self.racks.iter().filter(|r| r.is_from_truck())
    }

    pub fn positions(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.racks.iter().map(Rack::pos)
    }

    pub fn len(&self) -> usize {
        self.racks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.racks.is_empty()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Move a registered rack.  Returns `Ok(false)` for an unknown id.
    pub fn relocate(&mut self, id: RackId, to: CellPos) -> RegistryResult<bool> {
        let Some(i) = self.position(id) else {
            return Ok(false);
        };
        let from = self.racks[i].pos();
        if from == to {
            return Ok(true);
        }
        self.check_free(to)?;
        self.by_cell.remove(&from);
        self.by_cell.insert(to, id);
        self.racks[i].set_pos(to);
        Ok(true)
    }

    /// Set the transfer flags of a registered rack.  Returns `false` for an
    /// unknown id.
    pub fn set_transfer(&mut self, id: RackId, transfer: Transfer) -> bool {
        match self.position(id) {
            Some(i) => {
                self.racks[i].set_transfer(transfer);
                true
            }
            None => false,
        }
    }

    /// Mutable access for change reporting.  Positions must only be changed
    /// through [`relocate`](Self::relocate); see [`index_is_consistent`](Self::index_is_consistent).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Rack> {
        self.racks.iter_mut()
    }

    /// `true` if every rack is indexed under its own cell and nothing else
    /// is indexed.
    pub fn index_is_consistent(&self) -> bool {
        self.by_cell.len() == self.racks.len()
            && self.racks.iter().all(|r| self.by_cell.get(&r.pos()) == Some(&r.id))
    }

    // ── Occupancy ─────────────────────────────────────────────────────────

    /// A fresh `rows × cols` bitmap with every rack cell occupied.
    pub fn occupancy_bitmap(&self, rows: u32, cols: u32) -> OccupancyMap {
        OccupancyMap::from_cells(rows, cols, self.positions())
    }

    /// Rebuild `map` from rack positions plus `extra` cells (racks held
    /// outside the registry that still stand on the floor).
    pub fn rebuild_occupancy(&self, map: &mut OccupancyMap, extra: impl IntoIterator<Item = CellPos>) {
        map.rebuild(self.positions().chain(extra));
    }
}
