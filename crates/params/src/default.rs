//! Default values for the ledger parameters.

use weightlock_primitives::Seconds;

/// Number of seconds in a day.
pub const SECONDS_PER_DAY: Seconds = 24 * 60 * 60;

/// Default shortest accepted lock.
pub const MIN_LOCK_DURATION: Seconds = 7 * SECONDS_PER_DAY;

/// Default longest accepted lock, which is also the denominator of the lock ratio.
pub const MAX_LOCK_DURATION: Seconds = 4 * 365 * SECONDS_PER_DAY;

/// Default bonding-curve coefficient.
pub const CURVE_COEFFICIENT: u32 = 2;
