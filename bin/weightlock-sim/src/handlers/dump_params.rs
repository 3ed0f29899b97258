use std::fs;

use anyhow::{Context, Result};
use tracing::info;
use weightlock_params::prelude::LedgerParams;

use crate::cli::DumpParamsArgs;

pub(crate) fn handle_dump_params(args: DumpParamsArgs) -> Result<()> {
    let rendered = toml::to_string(&LedgerParams::default())?;

    match args.output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote default params");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
