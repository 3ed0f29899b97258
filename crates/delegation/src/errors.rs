//! Errors raised by the delegation registry.

use thiserror::Error;
use weightlock_primitives::{AccountId, Amount};

/// Reasons a registry operation can be refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// An account attempted to delegate to itself.
    #[error("{0} cannot delegate to itself")]
    InvalidSelfDelegation(AccountId),

    /// The delegatee is the null identity or a list sentinel.
    #[error("{0} cannot receive delegations")]
    InvalidRecipient(AccountId),

    /// The delegator is the null identity or a list sentinel.
    #[error("{0} cannot delegate")]
    InvalidDelegator(AccountId),

    /// The requested amount is zero.
    #[error("amount must be non-zero")]
    ZeroAmount,

    /// The delegator does not have enough undelegated derived balance.
    #[error("only {available} derived balance is undelegated, {requested} requested")]
    InsufficientDerivedBalance {
        /// Derived balance not yet delegated.
        available: Amount,
        /// Requested amount.
        requested: Amount,
    },

    /// There is no edge between the two accounts.
    #[error("{delegator} does not delegate to {delegatee}")]
    NoSuchDelegation {
        /// The delegator.
        delegator: AccountId,
        /// The delegatee.
        delegatee: AccountId,
    },

    /// The delegator has nothing delegated.
    #[error("{0} has no outstanding delegations")]
    NoDelegationsOutstanding(AccountId),

    /// A cached total would overflow.
    #[error("delegation total overflowed")]
    Overflow,

    /// The stored lists disagree with each other or with the edge amounts.
    ///
    /// This is never expected to happen; it means the store was modified outside the registry.
    #[error("delegation registry is corrupted: {0}")]
    Corrupted(String),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
