//! CLI that replays recorded ledger operations against an in-memory ledger.

mod cli;
mod constants;
mod handlers;
mod journal;
mod params;

use anyhow::{Error, Result};
use clap::Parser;
use weightlock_common::logging::{self, LoggerConfig};

use crate::handlers::{dump_params, replay};

fn main() -> Result<(), Error> {
    logging::init(LoggerConfig::with_base_name("weightlock-sim"));

    let cli = cli::Cli::parse();
    match cli.command {
        cli::Commands::Replay(args) => replay::handle_replay(args),
        cli::Commands::DumpParams(args) => dump_params::handle_dump_params(args),
    }
}
