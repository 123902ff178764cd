//! `wh-racks`: rack entities and the rack registry.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`rack`]     | `Rack`, `Transfer`: one storage rack and its flags        |
//! | [`registry`] | `RackRegistry`: insertion-ordered racks + position index  |
//! | [`error`]    | `RegistryError`, `RegistryResult<T>`                       |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the position index.        |
//! | `serde`   | Derives `Serialize`/`Deserialize` on public types.       |

pub mod error;
pub mod rack;
pub mod registry;

#[cfg(test)]
mod tests;

pub use error::{RegistryError, RegistryResult};
pub use rack::{Rack, Transfer};
pub use registry::RackRegistry;
