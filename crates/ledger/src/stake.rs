//! The bonding-curve stake book: locking, minting and burning.
//!
//! Transitions are split into a *plan* step that reads the store and computes every new value, and
//! a *commit* step that writes them and cannot fail. The facade moves the underlying asset in
//! between, so a refused transfer never leaves a half-written stake behind.

use serde::{Deserialize, Serialize};
use tracing::debug;
use weightlock_db::{StakeDb, StakeRecord};
use weightlock_params::prelude::LedgerParams;
use weightlock_primitives::{AccountId, Amount, Seconds, Timestamp};

use crate::errors::{LedgerError, LedgerResult};

/// Where an account stands in the stake lifecycle at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum AccountState {
    /// No stake is open.
    Unstaked,

    /// A stake is open and cannot be withdrawn before `matures_at`.
    Locked {
        /// Maturity of the stake.
        matures_at: Timestamp,
    },

    /// A stake is open and may be withdrawn.
    Matured,
}

/// The writes of a successful `stake` or `increase_stake`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mint {
    pub(crate) owner: AccountId,
    pub(crate) amount: Amount,
    pub(crate) minted: Amount,
    pub(crate) record: StakeRecord,
    balance: Amount,
    supply: Amount,
    total_locked: Amount,
}

/// The writes of a successful `withdraw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Burn {
    pub(crate) owner: AccountId,
    pub(crate) released: Amount,
    pub(crate) burned: Amount,
    supply: Amount,
    total_locked: Amount,
}

/// Plans opening a stake of `amount` locked for `lock_duration` from `now`.
pub(crate) fn plan_open<S: StakeDb>(
    db: &S,
    params: &LedgerParams,
    owner: AccountId,
    amount: Amount,
    lock_duration: Seconds,
    now: Timestamp,
) -> LedgerResult<Mint> {
    if amount == 0 {
        return Err(LedgerError::ZeroAmount);
    }
    if lock_duration < params.min_lock_duration {
        return Err(LedgerError::LockTooShort {
            requested: lock_duration,
            min: params.min_lock_duration,
        });
    }
    if lock_duration > params.max_lock_duration {
        return Err(LedgerError::LockTooLong {
            requested: lock_duration,
            max: params.max_lock_duration,
        });
    }
    if db.get_stake(&owner).is_some() {
        return Err(LedgerError::AlreadyStaked(owner));
    }

    let lock_ratio = params.lock_ratio(lock_duration)?;
    let maturity = now
        .checked_add(lock_duration)
        .ok_or(LedgerError::Overflow)?;

    let record = StakeRecord {
        locked_amount: amount,
        maturity,
        lock_ratio,
    };

    plan_mint(db, params, owner, amount, record)
}

/// Plans adding `amount` to the open stake of `owner` at its recorded lock ratio.
///
/// Maturity is left unchanged.
pub(crate) fn plan_top_up<S: StakeDb>(
    db: &S,
    params: &LedgerParams,
    owner: AccountId,
    amount: Amount,
) -> LedgerResult<Mint> {
    if amount == 0 {
        return Err(LedgerError::ZeroAmount);
    }
    let Some(mut record) = db.get_stake(&owner) else {
        return Err(LedgerError::NoActiveStake(owner));
    };

    record.locked_amount = record
        .locked_amount
        .checked_add(amount)
        .ok_or(LedgerError::Overflow)?;

    plan_mint(db, params, owner, amount, record)
}

fn plan_mint<S: StakeDb>(
    db: &S,
    params: &LedgerParams,
    owner: AccountId,
    amount: Amount,
    record: StakeRecord,
) -> LedgerResult<Mint> {
    let minted = record
        .lock_ratio
        .weigh(amount, params.curve_coefficient)?;

    let balance = db
        .derived_balance(&owner)
        .checked_add(minted)
        .ok_or(LedgerError::Overflow)?;
    let supply = db
        .derived_supply()
        .checked_add(minted)
        .ok_or(LedgerError::Overflow)?;
    let total_locked = db
        .total_locked()
        .checked_add(amount)
        .ok_or(LedgerError::Overflow)?;

    debug!(%owner, %amount, %minted, ratio = %record.lock_ratio.raw(), "planned mint");

    Ok(Mint {
        owner,
        amount,
        minted,
        record,
        balance,
        supply,
        total_locked,
    })
}

/// Plans closing the stake of `owner` at `now`.
pub(crate) fn plan_close<S: StakeDb>(
    db: &S,
    owner: AccountId,
    now: Timestamp,
) -> LedgerResult<Burn> {
    let Some(record) = db.get_stake(&owner) else {
        return Err(LedgerError::NothingToWithdraw(owner));
    };
    if now < record.maturity {
        return Err(LedgerError::LockNotMatured {
            matures_at: record.maturity,
            now,
        });
    }

    let burned = db.derived_balance(&owner);
    let supply = db.derived_supply().checked_sub(burned).ok_or_else(|| {
        LedgerError::Corrupted(format!("derived supply is below the balance of {owner}"))
    })?;
    let total_locked = db
        .total_locked()
        .checked_sub(record.locked_amount)
        .ok_or_else(|| {
            LedgerError::Corrupted(format!("total locked is below the stake of {owner}"))
        })?;

    Ok(Burn {
        owner,
        released: record.locked_amount,
        burned,
        supply,
        total_locked,
    })
}

pub(crate) fn commit_mint<S: StakeDb>(db: &mut S, mint: &Mint) {
    db.put_stake(mint.owner, mint.record);
    db.set_derived_balance(mint.owner, mint.balance);
    db.set_derived_supply(mint.supply);
    db.set_total_locked(mint.total_locked);
}

pub(crate) fn commit_burn<S: StakeDb>(db: &mut S, burn: &Burn) {
    db.remove_stake(&burn.owner);
    db.set_derived_balance(burn.owner, 0);
    db.set_derived_supply(burn.supply);
    db.set_total_locked(burn.total_locked);
}

/// Lifecycle state of `owner` at `now`.
pub(crate) fn account_state<S: StakeDb>(
    db: &S,
    owner: &AccountId,
    now: Timestamp,
) -> AccountState {
    match db.get_stake(owner) {
        None => AccountState::Unstaked,
        Some(record) if now < record.maturity => AccountState::Locked {
            matures_at: record.maturity,
        },
        Some(_) => AccountState::Matured,
    }
}
