//! `wh-sim`: the world tick driver for the warehouse simulation.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Replenish  : one delivered rack per tick goes onto the inbound dock.
//!   ② Bay        : trucks advance; Available/Full events are handled;
//!                  one staged package is loaded onto a docked truck.
//!   ③ Occupancy  : bitmap rebuilt from rack positions.
//!   ④ Robots     : inbound pass (dock → storage), then, while a truck is
//!                  docked, outbound pass (storage → outbound dropoff).
//!   ⑤ Collect    : every entity's `Step` reports what changed; the batch
//!                  goes to the observer in one call.
//! ```
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `serde`   | `Snapshot`/`WorldEvent` serialize to renderer JSON.      |
//! | `fx-hash` | FxHash for the rack position index.                      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use wh_core::WarehouseConfig;
//! use wh_sim::{NoopObserver, WorldBuilder};
//!
//! let mut world = WorldBuilder::new(WarehouseConfig::default()).build()?;
//! world.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod driver;
pub mod entity;
pub mod error;
pub mod observer;
pub mod world;


pub use builder::WorldBuilder;
pub use driver::PollingDriver;
pub use entity::{Entity, EntityId, EntityKind, EntityMut, Snapshot, Step, WorldEvent, ROBOT_Y};
pub use error::{SimError, SimResult};
pub use observer::{BatchRecorder, NoopObserver, WorldObserver};
pub use world::World;
