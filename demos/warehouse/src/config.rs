//! Config file loading.

use std::fs;
use std::path::Path;

use wh_core::{WarehouseConfig, WhError, WhResult};

/// Read a JSON config.  Missing fields take their defaults.
pub fn load(path: &Path) -> WhResult<WarehouseConfig> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| WhError::Parse(format!("{}: {e}", path.display())))
}
