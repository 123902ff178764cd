//! Grid-subsystem error type.

use thiserror::Error;

use wh_core::CellPos;

/// Errors produced by `wh-grid`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The target is walled off by occupied cells or the lane pattern.
    #[error("no path from {from} to {to}")]
    NotReachable { from: CellPos, to: CellPos },

    #[error("cell {0} is outside the grid")]
    CellOutOfBounds(CellPos),
}

pub type GridResult<T> = Result<T, GridError>;
