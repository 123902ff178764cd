use thiserror::Error;
use wh_core::RackId;
use wh_grid::GridError;
use wh_racks::RegistryError;

/// Why an assignment was not made.  Every variant is recoverable: the pool
/// state is untouched and the caller may simply try again next tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("no idle robot")]
    NoIdleRobot,

    #[error("no rack waiting for this pass")]
    NoPendingRack,

    #[error("{0} is unknown or already held")]
    RackUnavailable(RackId),

    #[error("no free slot in the {region} region")]
    NoFreeSlot { region: &'static str },

    #[error(transparent)]
    Routing(#[from] GridError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub type PoolResult<T> = Result<T, PoolError>;
