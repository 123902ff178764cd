use thiserror::Error;
use wh_core::WhError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] WhError),

    #[error("world audit failed: {0}")]
    Audit(String),

    #[error("failed to start the polling driver: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("polling driver thread panicked")]
    DriverPanicked,
}

pub type SimResult<T> = Result<T, SimError>;
