//! In-memory implementation of the underlying asset.

use std::collections::HashMap;

use tracing::trace;
use weightlock_primitives::{AccountId, Amount};

use crate::{
    errors::{AssetError, AssetResult},
    UnderlyingAsset,
};

/// A fungible balance ledger kept in memory.
///
/// `custodian` is the account the ledger holds locked funds under; pulls are spent from the
/// allowance that owners grant to it.
#[derive(Debug, Clone)]
pub struct InMemoryAsset {
    /// Account that holds the ledger's custody balance.
    custodian: AccountId,

    /// Balances per account.
    balances: HashMap<AccountId, Amount>,

    /// Approved spend per `(owner, spender)`.
    allowances: HashMap<(AccountId, AccountId), Amount>,

    /// Sum of all balances.
    total_supply: Amount,
}

impl InMemoryAsset {
    /// Creates an empty asset whose custody account is `custodian`.
    pub fn new(custodian: AccountId) -> Self {
        Self {
            custodian,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: 0,
        }
    }

    /// The account that holds the ledger's custody balance.
    pub const fn custodian(&self) -> AccountId {
        self.custodian
    }

    /// Balance of `owner`.
    pub fn balance_of(&self, owner: &AccountId) -> Amount {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    /// Amount `spender` may still pull from `owner`.
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    /// Sum of all balances.
    pub const fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Creates `amount` new units in `to`.
    pub fn mint(&mut self, to: AccountId, amount: Amount) -> AssetResult<()> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(AssetError::Overflow(to))?;
        let balance = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(AssetError::Overflow(to))?;

        self.total_supply = supply;
        self.balances.insert(to, balance);

        trace!(%to, %amount, "minted underlying");
        Ok(())
    }

    /// Sets the amount `spender` may pull from `owner`, replacing any previous approval.
    pub fn approve(&mut self, owner: AccountId, spender: AccountId, amount: Amount) {
        trace!(%owner, %spender, %amount, "approved spender");
        self.allowances.insert((owner, spender), amount);
    }

    /// Approves the custodian to pull `amount` from `owner`.
    pub fn approve_custodian(&mut self, owner: AccountId, amount: Amount) {
        self.approve(owner, self.custodian, amount);
    }

    /// Moves `amount` from `from` to `to` on behalf of `from`.
    pub fn transfer(&mut self, from: AccountId, to: AccountId, amount: Amount) -> AssetResult<()> {
        let (from_balance, to_balance) = self.checked_balances(from, to, amount)?;

        self.balances.insert(from, from_balance);
        self.balances.insert(to, to_balance);

        trace!(%from, %to, %amount, "transferred underlying");
        Ok(())
    }

    /// Computes the post-transfer balances of `from` and `to` without applying them.
    fn checked_balances(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> AssetResult<(Amount, Amount)> {
        let available = self.balance_of(&from);
        let from_balance =
            available
                .checked_sub(amount)
                .ok_or(AssetError::InsufficientBalance {
                    owner: from,
                    available,
                    requested: amount,
                })?;

        if from == to {
            return Ok((available, available));
        }

        let to_balance = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(AssetError::Overflow(to))?;

        Ok((from_balance, to_balance))
    }
}

impl UnderlyingAsset for InMemoryAsset {
    fn check_pull(&self, from: AccountId, amount: Amount) -> AssetResult<()> {
        let available = self.allowance(&from, &self.custodian);
        if available < amount {
            return Err(AssetError::InsufficientAllowance {
                owner: from,
                available,
                requested: amount,
            });
        }

        self.checked_balances(from, self.custodian, amount)
            .map(|_| ())
    }

    fn pull(&mut self, from: AccountId, amount: Amount) -> AssetResult<()> {
        self.check_pull(from, amount)?;

        let custodian = self.custodian;
        let remaining = self.allowance(&from, &custodian) - amount;

        self.transfer(from, custodian, amount)?;
        self.allowances.insert((from, custodian), remaining);

        Ok(())
    }

    fn check_push(&self, to: AccountId, amount: Amount) -> AssetResult<()> {
        self.checked_balances(self.custodian, to, amount)
            .map(|_| ())
    }

    fn push(&mut self, to: AccountId, amount: Amount) -> AssetResult<()> {
        self.transfer(self.custodian, to, amount)
    }
}
