//! Errors for the ledger parameters.

use thiserror::Error;
use weightlock_primitives::Seconds;

/// Inconsistent or unreadable ledger parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// The maximum lock duration is zero.
    #[error("max_lock_duration must be non-zero")]
    ZeroMaxLock,

    /// The minimum lock duration exceeds the maximum.
    #[error("min_lock_duration ({min}s) exceeds max_lock_duration ({max}s)")]
    InvertedLockBounds {
        /// Configured minimum.
        min: Seconds,
        /// Configured maximum.
        max: Seconds,
    },

    /// The curve coefficient is zero, which would never mint anything.
    #[error("curve_coefficient must be non-zero")]
    ZeroCoefficient,

    /// The TOML source could not be parsed.
    #[error("could not parse params: {0}")]
    Parse(String),
}
