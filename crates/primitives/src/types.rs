//! Scalar aliases used throughout the ledger.

/// Quantity of either the underlying asset or the derived balance, in base units.
pub type Amount = u128;

/// Absolute time in seconds, supplied by the caller once per operation.
pub type Timestamp = u64;

/// A span of time in seconds.
pub type Seconds = u64;
