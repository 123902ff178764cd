//! `wh-core`: foundational types for the warehouse simulation.
//!
//! This crate is a dependency of every other `wh-*` crate.  It has no `wh-*`
//! dependencies and only small external ones (`rand`, `thiserror`, `log`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `CellId`, `RackId`, `RobotId`, `TruckId`                  |
//! | [`cell`]        | `CellPos`, `CellRect`, `WorldPos`, `Rotation`             |
//! | [`time`]        | `Tick`, `SimClock`                                        |
//! | [`config`]      | `WarehouseConfig`, `LayoutConfig`, `AisleLanes`, `TruckConfig` |
//! | [`rng`]         | `SimRng`                                                  |
//! | [`invariant`]   | `invariant!` guard for state-mutation boundaries          |
//! | [`error`]       | `WhError`, `WhResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod cell;
pub mod config;
pub mod error;
pub mod ids;
pub mod invariant;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::{CellPos, CellRect, Rotation, WorldPos};
pub use config::{AisleLanes, LayoutConfig, TruckConfig, WarehouseConfig};
pub use error::{WhError, WhResult};
pub use ids::{CellId, RackId, RobotId, TruckId};
pub use rng::SimRng;
pub use time::{SimClock, Tick};

#[doc(hidden)]
pub use log as __log;
