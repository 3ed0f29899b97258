//! Parameters for the bonding-curve stake ledger.

use serde::{Deserialize, Serialize};
use weightlock_primitives::{LockRatio, PrimitiveError, Seconds};

use crate::{
    default::{CURVE_COEFFICIENT, MAX_LOCK_DURATION, MIN_LOCK_DURATION},
    errors::ParamsError,
};

/// The parameters of a ledger instance.
///
/// The lock ratio of a stake is `lock_duration / max_lock_duration` and the derived amount minted
/// for `amount` of the underlying asset is `curve_coefficient * ratio² * amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Shortest accepted lock, in seconds.
    pub min_lock_duration: Seconds,

    /// Longest accepted lock, in seconds.
    pub max_lock_duration: Seconds,

    /// Multiplier applied on top of the squared lock ratio.
    pub curve_coefficient: u32,
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            min_lock_duration: MIN_LOCK_DURATION,
            max_lock_duration: MAX_LOCK_DURATION,
            curve_coefficient: CURVE_COEFFICIENT,
        }
    }
}

impl LedgerParams {
    /// Checks that the parameters describe a usable curve.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.max_lock_duration == 0 {
            return Err(ParamsError::ZeroMaxLock);
        }
        if self.min_lock_duration > self.max_lock_duration {
            return Err(ParamsError::InvertedLockBounds {
                min: self.min_lock_duration,
                max: self.max_lock_duration,
            });
        }
        if self.curve_coefficient == 0 {
            return Err(ParamsError::ZeroCoefficient);
        }

        Ok(())
    }

    /// Parses and validates parameters from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ParamsError> {
        let params: Self = toml::from_str(s).map_err(|e| ParamsError::Parse(e.to_string()))?;
        params.validate()?;

        Ok(params)
    }

    /// Lock ratio for a lock of `lock_duration` seconds.
    ///
    /// Range checks against `min_lock_duration` are the caller's concern; this only rejects locks
    /// above the maximum.
    pub fn lock_ratio(&self, lock_duration: Seconds) -> Result<LockRatio, PrimitiveError> {
        LockRatio::from_durations(lock_duration, self.max_lock_duration)
    }
}
