//! `wh-grid`: warehouse lattice, occupancy, and routing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`graph`]     | `GridGraph` (CSR lattice), `GridGraphBuilder`, `LaneRule` |
//! | [`occupancy`] | `OccupancyMap`: versioned cell → occupied bitmap         |
//! | [`router`]    | `Router` trait, `Route`, `DijkstraRouter`                 |
//! | [`error`]     | `GridError`, `GridResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod graph;
pub mod occupancy;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{GridError, GridResult};
pub use graph::{FullLattice, GridGraph, GridGraphBuilder, LaneRule};
pub use occupancy::OccupancyMap;
pub use router::{DijkstraRouter, Route, Router};
