/// Account the simulated asset holds locked funds under.
pub(crate) const DEFAULT_CUSTODIAN: &str =
    "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

/// Params file read when `--params` is not given.
pub(crate) const DEFAULT_PARAMS_PATH: &str = "params.toml";
