//! The loading bay.
//!
//! # Counters
//!
//! | Counter         | Up                               | Down                        |
//! |-----------------|----------------------------------|-----------------------------|
//! | pending racks   | `Available { delivered }`        | `take_delivered_rack`       |
//! | packages        | `stage_package` (outbound rack)  | one per tick onto a truck   |
//!
//! # Step order
//!
//! 1. every truck advances one tick;
//! 2. queued truck events are handled;
//! 3. one staged package is loaded onto the first docked truck;
//! 4. events raised by that load are handled.
//!
//! Everything happens inside [`Bay::step`], so the world sees the counters
//! already settled when robot assignment runs.

use std::collections::VecDeque;

use wh_core::{TruckConfig, TruckId};
use wh_racks::Rack;

use crate::{Truck, TruckEvent};

pub struct Bay {
    trucks: Vec<Truck>,
    /// Bay-controlled trucks, in arrival order.
    docked: Vec<TruckId>,
    events: VecDeque<TruckEvent>,

    pending_racks: u32,
    /// Outbound racks waiting as packages, oldest first.
    staged: VecDeque<Rack>,
}

impl Bay {
    /// One truck per entry of `cfg.lanes_x`.
    pub fn new(cfg: &TruckConfig) -> Self {
        let trucks = cfg
            .lanes_x
            .iter()
            .enumerate()
            .map(|(i, &x)| Truck::new(TruckId(i as u32), x, cfg))
            .collect();
        Self {
            trucks,
            docked: Vec::new(),
            events: VecDeque::new(),
            pending_racks: 0,
            staged: VecDeque::new(),
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn trucks(&self) -> &[Truck] {
        &self.trucks
    }

    pub fn truck(&self, id: TruckId) -> Option<&Truck> {
        self.trucks.get(id.index())
    }

    pub fn docked(&self) -> &[TruckId] {
        &self.docked
    }

    pub fn has_docked_truck(&self) -> bool {
        !self.docked.is_empty()
    }

    /// Racks unloaded from trucks that have not been placed on the floor.
    pub fn pending_racks(&self) -> u32 {
        self.pending_racks
    }

    /// Packages waiting to be loaded onto a truck.
    pub fn packages(&self) -> usize {
        self.staged.len()
    }

    /// Staged outbound racks.  They still stand on their dropoff cells.
    pub fn staged_racks(&self) -> impl Iterator<Item = &Rack> {
        self.staged.iter()
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Take one delivered rack off the pending counter.  Returns `false` if
    /// none is pending.
    pub fn take_delivered_rack(&mut self) -> bool {
        if self.pending_racks == 0 {
            return false;
        }
        self.pending_racks -= 1;
        true
    }

    /// Hand an outbound rack to the bay, where it counts as one package.
    pub fn stage_package(&mut self, rack: Rack) {
        wh_core::invariant!(rack.is_to_truck(), "{} staged without the to-truck flag", rack.id);
        wh_core::invariant!(!rack.is_busy(), "{} staged while held", rack.id);
        self.staged.push_back(rack);
    }

    /// Undock `truck` and send it to the road.  Unknown ids are ignored.
    pub fn send_truck_to_road(&mut self, truck: TruckId) {
        self.docked.retain(|&t| t != truck);
        if let Some(t) = self.trucks.get_mut(truck.index()) {
            t.send_to_road();
            log::info!("{truck} dispatched to the road with {} packages", t.packages());
        }
    }

    /// Advance the bay one tick.  Returns the staged rack loaded onto a
    /// truck this tick, if any; it has left the world.
    pub fn step(&mut self) -> Option<Rack> {
        for truck in &mut self.trucks {
            truck.step();
            self.events.extend(truck.drain_events());
        }
        self.process_events();
        let loaded = self.load_package_on_truck();
        self.process_events();
        loaded
    }

    fn load_package_on_truck(&mut self) -> Option<Rack> {
        let &first = self.docked.first()?;
        if self.staged.is_empty() {
            return None;
        }
        let truck = self.trucks.get_mut(first.index())?;
        if !truck.add_package() {
            return None;
        }
        self.events.extend(truck.drain_events());
        self.staged.pop_front()
    }

    fn process_events(&mut self) {
        while let Some(event) = self.events.pop_front() {
            match event {
                TruckEvent::Available { truck, delivered } => {
                    self.pending_racks += delivered;
                    if !self.docked.contains(&truck) {
                        self.docked.push(truck);
                    }
                    log::info!("{truck} docked, {delivered} racks delivered");
                }
                TruckEvent::Full { truck } => self.send_truck_to_road(truck),
            }
        }
    }

    /// Mutable access for change reporting.  Truck transitions are only
    /// reachable through the bay.
    pub fn trucks_mut(&mut self) -> impl Iterator<Item = &mut Truck> {
        self.trucks.iter_mut()
    }
}
