//! A serializable form of the ledger's transitions, for journals and replay.

use serde::{Deserialize, Serialize};
use weightlock_asset::UnderlyingAsset;
use weightlock_db::{DelegationDb, StakeDb};
use weightlock_delegation::{Delegated, Undelegated};
use weightlock_primitives::{AccountId, Amount, Seconds, Timestamp};

use crate::{
    errors::LedgerResult,
    ledger::{Ledger, Staked, Withdrawn},
};

/// One of the six public transitions, without its caller and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerOp {
    /// See [`Ledger::stake`].
    Stake {
        /// Underlying units to lock.
        amount: Amount,
        /// Lock duration in seconds.
        lock_duration: Seconds,
    },

    /// See [`Ledger::increase_stake`].
    IncreaseStake {
        /// Underlying units to add.
        amount: Amount,
    },

    /// See [`Ledger::delegate`].
    Delegate {
        /// The receiving account.
        delegatee: AccountId,
        /// Derived units to delegate.
        amount: Amount,
    },

    /// See [`Ledger::undelegate`].
    Undelegate {
        /// Believed predecessor of `delegatee` in the caller's outbound list.
        #[serde(default = "head")]
        predecessor_hint: AccountId,
        /// The receiving account.
        delegatee: AccountId,
        /// Derived units to take back.
        amount: Amount,
    },

    /// See [`Ledger::undelegate_all`].
    UndelegateAll,

    /// See [`Ledger::withdraw`].
    Withdraw,
}

const fn head() -> AccountId {
    AccountId::HEAD
}

/// What a successfully applied [`LedgerOp`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// A stake was opened.
    Staked(Staked),

    /// An open stake was topped up.
    StakeIncreased(Staked),

    /// An edge was created or incremented.
    Delegated(Delegated),

    /// An edge was decremented or removed.
    Undelegated(Undelegated),

    /// Every edge of the caller was removed.
    UndelegatedAll(Vec<Undelegated>),

    /// A stake was closed.
    Withdrawn(Withdrawn),
}

impl<S, A> Ledger<S, A>
where
    S: StakeDb + DelegationDb,
    A: UnderlyingAsset,
{
    /// Applies `op` on behalf of `caller` at `now`.
    pub fn apply(
        &mut self,
        caller: AccountId,
        now: Timestamp,
        op: LedgerOp,
    ) -> LedgerResult<LedgerEvent> {
        Ok(match op {
            LedgerOp::Stake {
                amount,
                lock_duration,
            } => LedgerEvent::Staked(self.stake(caller, now, amount, lock_duration)?),
            LedgerOp::IncreaseStake { amount } => {
                LedgerEvent::StakeIncreased(self.increase_stake(caller, amount)?)
            }
            LedgerOp::Delegate { delegatee, amount } => {
                LedgerEvent::Delegated(self.delegate(caller, delegatee, amount)?)
            }
            LedgerOp::Undelegate {
                predecessor_hint,
                delegatee,
                amount,
            } => LedgerEvent::Undelegated(self.undelegate(
                caller,
                predecessor_hint,
                delegatee,
                amount,
            )?),
            LedgerOp::UndelegateAll => LedgerEvent::UndelegatedAll(self.undelegate_all(caller)?),
            LedgerOp::Withdraw => LedgerEvent::Withdrawn(self.withdraw(caller, now)?),
        })
    }
}
