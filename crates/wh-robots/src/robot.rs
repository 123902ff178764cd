use wh_core::{CellPos, RobotId};
use wh_racks::Rack;

/// A mobile robot.  Busy exactly while it carries a rack, and a carried rack
/// always stands on the robot's cell.
#[derive(Clone, Debug)]
pub struct Robot {
    pub id:   RobotId,
    pos:      CellPos,
    carrying: Option<Rack>,
    changed:  bool,
}

impl Robot {
    pub fn new(id: RobotId, pos: CellPos) -> Self {
        Self { id, pos, carrying: None, changed: true }
    }

    #[inline]
    pub fn pos(&self) -> CellPos {
        self.pos
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.carrying.is_some()
    }

    pub fn carrying(&self) -> Option<&Rack> {
        self.carrying.as_ref()
    }

    /// Take exclusive ownership of `rack`.  The robot must be idle and
    /// standing on the rack's cell.
    pub(crate) fn lift(&mut self, mut rack: Rack) {
        wh_core::invariant!(self.carrying.is_none(), "{} lifted {} while busy", self.id, rack.id);
        wh_core::invariant!(rack.pos() == self.pos, "{} lifted {} from another cell", self.id, rack.id);
        rack.set_busy(true);
        self.carrying = Some(rack);
    }

    /// Move to `pos` in one step, together with any carried rack.
    pub(crate) fn teleport(&mut self, pos: CellPos) {
        if pos == self.pos {
            return;
        }
        self.pos = pos;
        self.changed = true;
        if let Some(rack) = self.carrying.as_mut() {
            rack.set_pos(pos);
        }
    }

    /// Set the carried rack down on the current cell and give it up.
    pub(crate) fn release(&mut self) -> Option<Rack> {
        let mut rack = self.carrying.take()?;
        rack.set_busy(false);
        Some(rack)
    }

    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}
