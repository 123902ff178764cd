//! `wh-robots`: the robot pool.
//!
//! Robots are either idle or carry exactly one rack.  Moving a rack is a
//! single transaction: both route queries and the slot lookup must succeed
//! before anything is mutated, otherwise the pool returns a [`PoolError`] and
//! the caller retries on a later tick.
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`robot`]  | `Robot`                                                   |
//! | [`region`] | `DropoffRegion`: ordered candidate slots                 |
//! | [`pool`]   | `RobotPool`, `Floor`, `Delivery`: assignment passes      |
//! | [`error`]  | `PoolError`, `PoolResult<T>`                              |

pub mod error;
pub mod pool;
pub mod region;
pub mod robot;


pub use error::{PoolError, PoolResult};
pub use pool::{Delivery, Floor, RobotPool};
pub use region::DropoffRegion;
pub use robot::Robot;
