//! Errors raised by the underlying asset.

use thiserror::Error;
use weightlock_primitives::{AccountId, Amount};

/// Reasons an asset transfer can be refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// The owner has not approved the spender for the requested amount.
    #[error("allowance of {available} from {owner} is below {requested}")]
    InsufficientAllowance {
        /// The account whose funds were requested.
        owner: AccountId,
        /// The currently approved amount.
        available: Amount,
        /// The requested amount.
        requested: Amount,
    },

    /// The source account does not hold the requested amount.
    #[error("balance of {available} in {owner} is below {requested}")]
    InsufficientBalance {
        /// The account whose funds were requested.
        owner: AccountId,
        /// The current balance.
        available: Amount,
        /// The requested amount.
        requested: Amount,
    },

    /// Crediting the destination would overflow its balance.
    #[error("balance of {0} would overflow")]
    Overflow(AccountId),
}

/// Result type for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;
