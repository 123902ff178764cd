//! Invariant guard for state-mutation boundaries.
//!
//! A broken invariant (a rack flagged both inbound and outbound, two racks on
//! one cell, …) is a logic fault, not a runtime condition.  Debug builds stop
//! immediately; release builds log the fault and keep the simulation running.

/// Check a logic invariant.
///
/// ```
/// let from_truck = true;
/// let to_truck = false;
/// wh_core::invariant!(!(from_truck && to_truck), "rack flagged both ways");
/// ```
#[macro_export]
macro_rules! invariant {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            if cfg!(debug_assertions) {
                panic!("invariant violated: {}", format_args!($($arg)+));
            } else {
                $crate::__log::error!("invariant violated: {}", format_args!($($arg)+));
            }
        }
    };
}
