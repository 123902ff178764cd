//! A single storage rack.

use wh_core::{CellPos, RackId};

/// Where a rack is in its transfer lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transfer {
    /// Stored in the warehouse.
    Idle,
    /// Queued for, or handed to, a truck.
    ToTruck,
    /// Freshly delivered by a truck; needs a storage slot.
    FromTruck,
}

/// A storage rack on the grid.
///
/// `from_truck` and `to_truck` are never both set.  `busy` is only true while
/// a robot holds the rack; the robot pool clears it before the rack is put
/// back anywhere observable.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rack {
    pub id: RackId,
    pos: CellPos,
    from_truck: bool,
    to_truck: bool,
    busy: bool,
    /// Set whenever something an observer can see has changed.
    changed: bool,
}

impl Rack {
    /// A stored rack at `pos`.  New racks start out changed so their first
    /// snapshot is emitted.
    pub fn new(id: RackId, pos: CellPos) -> Self {
        Self { id, pos, from_truck: false, to_truck: false, busy: false, changed: true }
    }

    #[inline]
    pub fn pos(&self) -> CellPos {
        self.pos
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    #[inline]
    pub fn is_from_truck(&self) -> bool {
        self.from_truck
    }

    #[inline]
    pub fn is_to_truck(&self) -> bool {
        self.to_truck
    }

    pub fn transfer(&self) -> Transfer {
        match (self.from_truck, self.to_truck) {
            (true, _) => Transfer::FromTruck,
            (_, true) => Transfer::ToTruck,
            _ => Transfer::Idle,
        }
    }

    /// Neither flag set and not held by a robot.
    #[inline]
    pub fn is_idle(&self) -> bool {
        !self.busy && !self.from_truck && !self.to_truck
    }

    /// Move the rack.  Registry-held racks must be moved through
    /// [`RackRegistry`](crate::RackRegistry) so the position index follows.
    pub fn set_pos(&mut self, pos: CellPos) {
        if pos != self.pos {
            self.pos = pos;
            self.changed = true;
        }
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn set_transfer(&mut self, transfer: Transfer) {
        self.from_truck = transfer == Transfer::FromTruck;
        self.to_truck = transfer == Transfer::ToTruck;
        self.check();
    }

    /// Report and clear the changed flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Guard the flag invariant at a mutation boundary.
    pub fn check(&self) {
        wh_core::invariant!(
            !(self.from_truck && self.to_truck),
            "{} flagged both from-truck and to-truck",
            self.id
        );
    }
}
