//! Framework error type.
//!
//! Sub-crates define their own error enums for their recoverable conditions
//! and convert into `WhError` only where a configuration or I/O fault has to
//! cross a crate boundary.

use thiserror::Error;

/// The top-level error type for `wh-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum WhError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `wh-*` crates.
pub type WhResult<T> = Result<T, WhError>;
