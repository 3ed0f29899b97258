//! # Weightlock ledger
//!
//! Composes the bonding-curve stake book and the delegation registry into the public state
//! transitions of the ledger:
//!
//! | transition | effect |
//! |---|---|
//! | [`Ledger::stake`] | pulls the underlying into custody and mints derived weight |
//! | [`Ledger::increase_stake`] | tops up an open stake at its original lock ratio |
//! | [`Ledger::delegate`] / [`Ledger::undelegate`] / [`Ledger::undelegate_all`] | reallocate derived weight |
//! | [`Ledger::withdraw`] | releases every delegation, burns the derived balance and pays out |
//!
//! Each transition validates everything it can before the only fallible external call (the asset
//! transfer) and writes its state afterwards, so a failed call leaves the ledger untouched.
//! [`SharedLedger`] wraps a ledger behind a single lock for hosts that serve several callers.

pub mod errors;
pub mod ledger;
pub mod ops;
pub mod shared;
pub mod stake;

#[cfg(test)]
mod testing;

pub use errors::{LedgerError, LedgerResult};
pub use ledger::{Ledger, Staked, Withdrawn};
pub use ops::{LedgerEvent, LedgerOp};
pub use shared::SharedLedger;
pub use stake::AccountState;
