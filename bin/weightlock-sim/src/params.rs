use std::{fs, path::Path};

use anyhow::{anyhow, Context};
use tracing::warn;
use weightlock_params::prelude::LedgerParams;

/// Loads params from `path`, falling back to the defaults if the file does not exist.
pub(crate) fn load_params(path: impl AsRef<Path>) -> Result<LedgerParams, anyhow::Error> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "params file not found, using defaults");
        return Ok(LedgerParams::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read params file {}", path.display()))?;
    let params = LedgerParams::from_toml_str(&contents)
        .map_err(|e| anyhow!(format!("Failed to parse params file: {}", e)))?;

    Ok(params)
}
