//! This crate contains the parameters that dictate the behavior of the ledger: the accepted range
//! of lock durations and the bonding-curve coefficient.
//!
//! Two ledgers configured with different parameters mint different derived balances for the same
//! inputs, so these values must be fixed for the lifetime of a ledger.

pub mod default;
pub mod errors;
pub mod ledger;
pub mod prelude;
