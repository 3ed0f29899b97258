use std::path::PathBuf;

use clap::{Parser, Subcommand};
use weightlock_primitives::AccountId;

use crate::constants::{DEFAULT_CUSTODIAN, DEFAULT_PARAMS_PATH};

#[derive(Parser)]
#[command(
    name = "weightlock-sim",
    about = "Replays governance-weight ledger journals against an in-memory ledger",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Commands {
    Replay(ReplayArgs),

    DumpParams(DumpParamsArgs),
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Replay a journal and print the resulting balances as JSON", version)]
pub(crate) struct ReplayArgs {
    #[arg(long, help = "the path to the journal file")]
    pub(crate) journal: PathBuf,

    #[arg(
        long,
        env = "WEIGHTLOCK_PARAMS",
        default_value = DEFAULT_PARAMS_PATH,
        help = "the path to the params file; defaults are used if it does not exist"
    )]
    pub(crate) params: PathBuf,

    #[arg(
        long,
        default_value = DEFAULT_CUSTODIAN,
        help = "the account the ledger holds locked funds under"
    )]
    pub(crate) custodian: AccountId,

    #[arg(long, help = "record failed operations and continue instead of aborting")]
    pub(crate) keep_going: bool,

    #[arg(long, help = "also print the full ledger state")]
    pub(crate) dump_state: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Print the default params as TOML", version)]
pub(crate) struct DumpParamsArgs {
    #[arg(long, help = "write to this file instead of stdout")]
    pub(crate) output: Option<PathBuf>,
}
