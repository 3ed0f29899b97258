//! Fixed-point lock ratio and the bonding-curve product built on top of it.

use ethnum::U256;
use serde::{Deserialize, Serialize};

use crate::{
    errors::PrimitiveError,
    types::{Amount, Seconds},
};

/// Denominator of every fixed-point value in the ledger (`1.0 == 1e18`).
pub const FIXED_POINT_SCALE: u128 = 1_000_000_000_000_000_000;

/// The fraction `lock_duration / max_lock_duration`, scaled by [`FIXED_POINT_SCALE`].
///
/// A ratio is recorded once when a stake is opened and reused for every later top-up, so it is a
/// plain value type with no notion of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockRatio(u128);

impl LockRatio {
    /// The ratio of a lock at the maximum duration.
    pub const ONE: Self = Self(FIXED_POINT_SCALE);

    /// Computes `lock / max` in fixed point, rounding down.
    ///
    /// Fails if `max` is zero or `lock > max`.
    pub fn from_durations(lock: Seconds, max: Seconds) -> Result<Self, PrimitiveError> {
        if max == 0 {
            return Err(PrimitiveError::ZeroDenominator);
        }
        if lock > max {
            return Err(PrimitiveError::RatioAboveOne { lock, max });
        }

        // u64::MAX * 1e18 < u128::MAX, so this cannot overflow.
        Ok(Self(lock as u128 * FIXED_POINT_SCALE / max as u128))
    }

    /// Returns the scaled value.
    pub const fn raw(&self) -> u128 {
        self.0
    }

    /// Evaluates the bonding curve `coefficient * ratio² * amount`, rounding down.
    ///
    /// The product is formed in 256 bits and only narrowed once divided by the squared scale.
    pub fn weigh(&self, amount: Amount, coefficient: u32) -> Result<Amount, PrimitiveError> {
        let scale = U256::new(FIXED_POINT_SCALE);
        let ratio = U256::new(self.0);

        let product = ratio
            .checked_mul(ratio)
            .and_then(|r2| r2.checked_mul(U256::new(amount)))
            .and_then(|p| p.checked_mul(U256::new(coefficient as u128)))
            .ok_or(PrimitiveError::Overflow)?;

        let weighted = product / (scale * scale);
        if weighted > U256::new(u128::MAX) {
            return Err(PrimitiveError::Overflow);
        }

        Ok(weighted.as_u128())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const MAX: Seconds = 4 * 365 * 24 * 60 * 60;

    #[test]
    fn full_lock_is_unit_ratio() {
        let ratio = LockRatio::from_durations(MAX, MAX).unwrap();
        assert_eq!(ratio, LockRatio::ONE);
        assert_eq!(ratio.weigh(100, 2).unwrap(), 200);
    }

    #[test]
    fn half_lock_weighs_a_quarter() {
        let ratio = LockRatio::from_durations(MAX / 2, MAX).unwrap();
        assert_eq!(ratio.raw(), FIXED_POINT_SCALE / 2);
        assert_eq!(ratio.weigh(100, 2).unwrap(), 50);
    }

    #[test]
    fn invalid_durations_are_rejected() {
        assert_eq!(
            LockRatio::from_durations(1, 0),
            Err(PrimitiveError::ZeroDenominator)
        );
        assert_eq!(
            LockRatio::from_durations(11, 10),
            Err(PrimitiveError::RatioAboveOne { lock: 11, max: 10 })
        );
    }

    #[test]
    fn huge_amounts_report_overflow() {
        assert_eq!(
            LockRatio::ONE.weigh(u128::MAX, 2),
            Err(PrimitiveError::Overflow)
        );
        assert_eq!(LockRatio::ONE.weigh(u128::MAX, 1), Ok(u128::MAX));
    }

    proptest! {
        #[test]
        fn weight_never_exceeds_coefficient_times_amount(
            lock in 0..=MAX,
            amount in 0u128..=1_000_000_000_000_000_000_000_000u128,
            coefficient in 1u32..=10,
        ) {
            let ratio = LockRatio::from_durations(lock, MAX).unwrap();
            let weight = ratio.weigh(amount, coefficient).unwrap();
            prop_assert!(weight <= amount * coefficient as u128);
        }

        #[test]
        fn weight_is_monotonic_in_lock(
            a in 0..=MAX,
            b in 0..=MAX,
            amount in 0u128..=1_000_000_000_000u128,
        ) {
            let (short, long) = if a <= b { (a, b) } else { (b, a) };
            let short = LockRatio::from_durations(short, MAX).unwrap();
            let long = LockRatio::from_durations(long, MAX).unwrap();
            prop_assert!(short.weigh(amount, 2).unwrap() <= long.weigh(amount, 2).unwrap());
        }
    }
}
