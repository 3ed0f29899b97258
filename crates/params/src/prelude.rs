//! Just import this if you want a no-brainer `use` statement to get the most of the `params`
//! crate.

pub use crate::{default::*, errors::ParamsError, ledger::LedgerParams};
