//! Errors for the ledger primitives.

use thiserror::Error;

/// Errors raised while constructing or operating on primitive types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// The denominator of a ratio was zero.
    #[error("ratio denominator must be non-zero")]
    ZeroDenominator,

    /// The numerator of a lock ratio exceeded its denominator.
    #[error("lock duration {lock} exceeds the maximum of {max}")]
    RatioAboveOne {
        /// The requested lock duration.
        lock: u64,
        /// The maximum lock duration.
        max: u64,
    },

    /// A fixed-point product did not fit the target integer width.
    #[error("fixed-point arithmetic overflowed")]
    Overflow,

    /// An account identity could not be parsed from its hex representation.
    #[error("invalid account id: {0}")]
    InvalidAccountId(String),
}
