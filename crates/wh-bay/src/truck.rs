//! Per-truck state machine.
//!
//! ```text
//!            arrive                 racks == 0
//! DrivingToBay ──────► Loading ──────────────► AtBayUnloaded
//!      ▲                                             │ send_to_road
//!      │ packages == 0, refill racks                 ▼
//!    AtRoad ◄──────────────────────────────── DrivingToRoad
//!                       arrive
//! ```
//!
//! Driving moves `speed` toward the target each tick.  A truck within
//! `arrive_epsilon` of its target arrives instead of moving.

use wh_core::{TruckConfig, TruckId, WorldPos};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TruckState {
    DrivingToBay,
    /// At the bay, handing over one rack per tick.
    Loading,
    /// Empty and waiting at the bay; the bay owns the next transition.
    AtBayUnloaded,
    DrivingToRoad,
    /// At the road, unloading one package per tick.
    AtRoad,
}

/// Raised by a truck, handled by the bay.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TruckEvent {
    /// The truck has handed over all its racks and can take packages.
    Available { truck: TruckId, delivered: u32 },
    /// The package counter reached capacity.
    Full { truck: TruckId },
}

#[derive(Clone, Debug)]
pub struct Truck {
    pub id: TruckId,
    x:      f64,
    z:      f64,
    state:  TruckState,

    /// Packages aboard, `0..=capacity`.
    packages:  u32,
    /// Racks aboard, still to be handed to the bay.
    racks:     u32,
    /// Racks handed over during the current bay visit.
    delivered: u32,

    capacity: u32,
    speed:    f64,
    epsilon:  f64,
    bay_z:    f64,
    road_z:   f64,

    outbox:  Vec<TruckEvent>,
    changed: bool,
}

impl Truck {
    /// A truck on lane `x`, driving from `start_z` to the bay with
    /// `initial_racks` aboard.
    pub fn new(id: TruckId, x: f64, cfg: &TruckConfig) -> Self {
        Self {
            id,
            x,
            z: cfg.start_z,
            state: TruckState::DrivingToBay,
            packages: 0,
            racks: cfg.initial_racks.min(cfg.capacity),
            delivered: 0,
            capacity: cfg.capacity,
            speed: cfg.speed,
            epsilon: cfg.arrive_epsilon,
            bay_z: cfg.bay_z,
            road_z: cfg.road_z,
            outbox: Vec::new(),
            changed: true,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> TruckState {
        self.state
    }

    pub fn is_bay_controlled(&self) -> bool {
        self.state == TruckState::AtBayUnloaded
    }

    #[inline]
    pub fn packages(&self) -> u32 {
        self.packages
    }

    #[inline]
    pub fn racks(&self) -> u32 {
        self.racks
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.packages >= self.capacity
    }

    pub fn world_pos(&self) -> WorldPos {
        WorldPos::new(self.x, 0.0, self.z)
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Advance one tick.
    pub(crate) fn step(&mut self) {
        match self.state {
            TruckState::DrivingToBay => self.drive(self.bay_z, TruckState::Loading),
            TruckState::DrivingToRoad => self.drive(self.road_z, TruckState::AtRoad),
            TruckState::Loading => {
                if self.racks > 0 {
                    self.racks -= 1;
                    self.delivered += 1;
                }
                if self.racks == 0 {
                    self.state = TruckState::AtBayUnloaded;
                    let delivered = std::mem::take(&mut self.delivered);
                    self.outbox.push(TruckEvent::Available { truck: self.id, delivered });
                }
            }
            TruckState::AtBayUnloaded => {}
            TruckState::AtRoad => {
                self.packages = self.packages.saturating_sub(1);
                if self.packages == 0 {
                    self.racks = self.capacity;
                    self.state = TruckState::DrivingToBay;
                    log::info!("{} emptied at the road, returning with {} racks", self.id, self.racks);
                }
            }
        }
    }

    fn drive(&mut self, target: f64, arrived: TruckState) {
        if (self.z - target).abs() <= self.epsilon {
            self.state = arrived;
            log::info!("{} arrived at z={:.2} ({:?})", self.id, self.z, arrived);
        } else {
            self.z += if target > self.z { self.speed } else { -self.speed };
            self.changed = true;
        }
    }

    /// Put one package aboard.  Returns `false`, leaving the counter
    /// unchanged, when the truck is already full.  Raises
    /// [`TruckEvent::Full`] on the package that fills it.
    pub(crate) fn add_package(&mut self) -> bool {
        if self.is_full() {
            return false;
        }
        self.packages += 1;
        if self.is_full() {
            self.outbox.push(TruckEvent::Full { truck: self.id });
        }
        true
    }

    /// Release the truck from the bay and head for the road.
    pub(crate) fn send_to_road(&mut self) {
        if self.state != TruckState::AtBayUnloaded {
            log::debug!("{} sent to road from {:?}", self.id, self.state);
        }
        self.state = TruckState::DrivingToRoad;
    }

    /// Events raised since the last call, oldest first.
    pub(crate) fn drain_events(&mut self) -> impl Iterator<Item = TruckEvent> + '_ {
        self.outbox.drain(..)
    }

    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    pub fn check(&self) {
        wh_core::invariant!(
            self.packages <= self.capacity,
            "{} holds {} packages, capacity {}",
            self.id,
            self.packages,
            self.capacity
        );
    }
}
