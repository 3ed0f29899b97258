//! This module defines the [`StakeDb`] trait, which holds the state owned by the stake ledger.

use serde::{Deserialize, Serialize};
use weightlock_primitives::{AccountId, Amount, LockRatio, Timestamp};

/// The lock held by a single account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    /// Underlying units currently in custody for this account.
    pub locked_amount: Amount,

    /// Time from which the stake may be withdrawn.
    pub maturity: Timestamp,

    /// Ratio recorded when the stake was opened; top-ups reuse it.
    pub lock_ratio: LockRatio,
}

/// Interface to the stake records, derived balances and supply counters.
pub trait StakeDb {
    /// Returns the stake of `owner`, if any.
    fn get_stake(&self, owner: &AccountId) -> Option<StakeRecord>;

    /// Inserts or replaces the stake of `owner`.
    fn put_stake(&mut self, owner: AccountId, stake: StakeRecord);

    /// Deletes the stake of `owner`, returning it.
    fn remove_stake(&mut self, owner: &AccountId) -> Option<StakeRecord>;

    /// Derived balance of `owner`; zero if none was ever minted.
    fn derived_balance(&self, owner: &AccountId) -> Amount;

    /// Sets the derived balance of `owner`. Setting zero erases the entry.
    fn set_derived_balance(&mut self, owner: AccountId, amount: Amount);

    /// Sum of all derived balances.
    fn derived_supply(&self) -> Amount;

    /// Sets the sum of all derived balances.
    fn set_derived_supply(&mut self, amount: Amount);

    /// Sum of all locked amounts.
    fn total_locked(&self) -> Amount;

    /// Sets the sum of all locked amounts.
    fn set_total_locked(&mut self, amount: Amount);
}
