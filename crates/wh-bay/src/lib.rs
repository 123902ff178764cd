//! `wh-bay`: trucks and the loading bay.
//!
//! Trucks shuttle between the road and the bay along `z`.  At the bay they
//! unload their racks, then wait, bay-controlled, while the bay loads
//! packages onto them.  A full truck is sent back to the road, unloads its
//! packages there and returns with a fresh load of racks.
//!
//! Trucks never call into the bay.  They push [`TruckEvent`]s into an outbox
//! that the bay drains into its own queue and handles synchronously within
//! the same [`Bay::step`].

pub mod bay;
pub mod truck;

#[cfg(test)]
mod tests;

pub use bay::Bay;
pub use truck::{Truck, TruckEvent, TruckState};
