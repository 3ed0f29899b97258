//! Errors returned by the ledger's public transitions.

use thiserror::Error;
use weightlock_asset::AssetError;
use weightlock_delegation::RegistryError;
use weightlock_params::prelude::ParamsError;
use weightlock_primitives::{AccountId, PrimitiveError, Seconds, Timestamp};

/// Reasons a ledger transition can be refused.
///
/// Every error is raised before any state is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The caller is the null identity or a list sentinel.
    #[error("{0} is not a valid caller")]
    InvalidCaller(AccountId),

    /// The requested amount is zero.
    #[error("amount must be non-zero")]
    ZeroAmount,

    /// The lock is shorter than the configured minimum.
    #[error("lock of {requested}s is shorter than the minimum of {min}s")]
    LockTooShort {
        /// Requested lock duration.
        requested: Seconds,
        /// Configured minimum.
        min: Seconds,
    },

    /// The lock is longer than the configured maximum.
    #[error("lock of {requested}s is longer than the maximum of {max}s")]
    LockTooLong {
        /// Requested lock duration.
        requested: Seconds,
        /// Configured maximum.
        max: Seconds,
    },

    /// The caller could not fund the requested amount.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(AssetError),

    /// The underlying asset refused a transfer for a reason other than the caller's funds.
    #[error("asset transfer failed: {0}")]
    Asset(AssetError),

    /// The caller already has an open stake.
    #[error("{0} already has an open stake")]
    AlreadyStaked(AccountId),

    /// The caller has no stake to top up.
    #[error("{0} has no open stake")]
    NoActiveStake(AccountId),

    /// The stake cannot be withdrawn yet.
    #[error("stake matures at {matures_at}, now is {now}")]
    LockNotMatured {
        /// Maturity of the stake.
        matures_at: Timestamp,
        /// Time supplied with the call.
        now: Timestamp,
    },

    /// The caller has no stake to withdraw.
    #[error("{0} has nothing to withdraw")]
    NothingToWithdraw(AccountId),

    /// A delegation transition was refused.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The bonding curve could not be evaluated.
    #[error("curve evaluation failed: {0}")]
    Curve(#[from] PrimitiveError),

    /// The ledger was configured with unusable parameters.
    #[error("invalid params: {0}")]
    Params(#[from] ParamsError),

    /// A balance, supply or timestamp would overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Stored supply counters disagree with the balances they summarize.
    #[error("ledger state is corrupted: {0}")]
    Corrupted(String),
}

impl From<AssetError> for LedgerError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::InsufficientAllowance { .. } | AssetError::InsufficientBalance { .. } => {
                Self::InsufficientFunds(err)
            }
            AssetError::Overflow(_) => Self::Asset(err),
        }
    }
}

/// Result type for ledger transitions.
pub type LedgerResult<T> = Result<T, LedgerError>;
