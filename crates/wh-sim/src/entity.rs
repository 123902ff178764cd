//! Entity snapshots and the per-tick `Step` capability.
//!
//! Robots, racks and trucks are unrelated types owned by different
//! containers.  The world reaches them through one tagged variant,
//! [`EntityMut`], and never needs to know which container an entity lives in
//! once it has been collected.

use std::fmt;

use wh_bay::Truck;
use wh_core::{RackId, RobotId, Rotation, Tick, TruckId, WorldPos};
use wh_racks::Rack;
use wh_robots::Robot;

/// Height at which robots are drawn, so a carried rack sits on top.
pub const ROBOT_Y: f64 = 0.15;

// ── Identity ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EntityKind {
    Robot,
    Rack,
    Truck,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Robot => "robot",
            EntityKind::Rack => "rack",
            EntityKind::Truck => "truck",
        }
    }
}

/// Identity of any world entity.  Displays as `"rack-3"`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityId {
    Robot(RobotId),
    Rack(RackId),
    Truck(TruckId),
}

impl EntityId {
    pub fn kind(self) -> EntityKind {
        match self {
            EntityId::Robot(_) => EntityKind::Robot,
            EntityId::Rack(_) => EntityKind::Rack,
            EntityId::Truck(_) => EntityKind::Truck,
        }
    }

    fn number(self) -> u32 {
        match self {
            EntityId::Robot(id) => id.0,
            EntityId::Rack(id) => id.0,
            EntityId::Truck(id) => id.0,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind().as_str(), self.number())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for EntityId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Immutable view of one entity at the end of a tick.
///
/// With `serde` it serializes to the flat record renderers expect:
/// `{"id", "type", "x", "y", "z", "rotationX", "rotationY", "rotationZ"}`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Snapshot {
    pub id: EntityId,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rotation_x: f64,
    pub rotation_y: f64,
    pub rotation_z: f64,
}

impl Snapshot {
    pub fn new(id: EntityId, pos: WorldPos, rotation: Rotation) -> Self {
        Self {
            id,
            kind: id.kind(),
            x: pos.x,
            y: pos.y,
            z: pos.z,
            rotation_x: rotation.x,
            rotation_y: rotation.y,
            rotation_z: rotation.z,
        }
    }

    pub fn pos(&self) -> WorldPos {
        WorldPos::new(self.x, self.y, self.z)
    }
}

/// One entry of a tick's event batch.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "lowercase"))]
pub enum WorldEvent {
    Update(Snapshot),
    Remove(Snapshot),
}

impl WorldEvent {
    pub fn snapshot(&self) -> &Snapshot {
        match self {
            WorldEvent::Update(s) | WorldEvent::Remove(s) => s,
        }
    }
}

// ── Entity / Step ─────────────────────────────────────────────────────────────

/// Read side shared by every entity type.
pub trait Entity {
    fn entity_id(&self) -> EntityId;

    fn world_pos(&self) -> WorldPos;

    fn rotation(&self) -> Rotation {
        Rotation::ZERO
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.entity_id(), self.world_pos(), self.rotation())
    }
}

/// Closes an entity's tick.  Called once per entity after every mutation of
/// the tick has happened; returns a snapshot if anything observable changed.
pub trait Step: Entity {
    fn step(&mut self, tick: Tick) -> Option<Snapshot>;
}

impl Entity for Robot {
    fn entity_id(&self) -> EntityId {
        EntityId::Robot(self.id)
    }

    fn world_pos(&self) -> WorldPos {
        self.pos().to_world(ROBOT_Y)
    }
}

impl Step for Robot {
    fn step(&mut self, _tick: Tick) -> Option<Snapshot> {
        self.take_changed().then(|| self.snapshot())
    }
}

impl Entity for Rack {
    fn entity_id(&self) -> EntityId {
        EntityId::Rack(self.id)
    }

    fn world_pos(&self) -> WorldPos {
        self.pos().to_world(0.0)
    }
}

impl Step for Rack {
    fn step(&mut self, _tick: Tick) -> Option<Snapshot> {
        self.check();
        self.take_changed().then(|| self.snapshot())
    }
}

impl Entity for Truck {
    fn entity_id(&self) -> EntityId {
        EntityId::Truck(self.id)
    }

    fn world_pos(&self) -> WorldPos {
        Truck::world_pos(self)
    }
}

impl Step for Truck {
    fn step(&mut self, _tick: Tick) -> Option<Snapshot> {
        self.check();
        self.take_changed().then(|| self.snapshot())
    }
}

/// Mutable handle to any entity, dispatched without knowing its container.
pub enum EntityMut<'a> {
    Robot(&'a mut Robot),
    Rack(&'a mut Rack),
    Truck(&'a mut Truck),
}

impl EntityMut<'_> {
    pub fn step(&mut self, tick: Tick) -> Option<Snapshot> {
        match self {
            EntityMut::Robot(r) => r.step(tick),
            EntityMut::Rack(r) => r.step(tick),
            EntityMut::Truck(t) => t.step(tick),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        match self {
            EntityMut::Robot(r) => r.snapshot(),
            EntityMut::Rack(r) => r.snapshot(),
            EntityMut::Truck(t) => t.snapshot(),
        }
    }
}
