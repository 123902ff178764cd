use thiserror::Error;
use wh_core::{CellPos, RackId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("cell {cell} already holds {existing}")]
    CellTaken { cell: CellPos, existing: RackId },
}

pub type RegistryResult<T> = Result<T, RegistryError>;
