//! Deterministic and arbitrary account identities.

use proptest::prelude::*;
use weightlock_primitives::{account::ACCOUNT_ID_SIZE, AccountId};

/// Byte that fills the custodian identity.
const CUSTODIAN_BYTE: u8 = 0xcc;

/// A deterministic, non-reserved account derived from `seed`.
///
/// # Panics
///
/// If `seed` is `0`, which would produce the null identity, or equals the custodian byte.
pub fn account(seed: u8) -> AccountId {
    assert!(
        seed != 0 && seed != CUSTODIAN_BYTE,
        "seed {seed} maps to a reserved test identity"
    );

    AccountId::new([seed; ACCOUNT_ID_SIZE])
}

/// The account under which a test ledger holds its custody balance.
pub fn custodian() -> AccountId {
    AccountId::new([CUSTODIAN_BYTE; ACCOUNT_ID_SIZE])
}

/// Generates an arbitrary account that is neither reserved nor the test custodian.
pub fn arb_account() -> impl Strategy<Value = AccountId> {
    any::<[u8; ACCOUNT_ID_SIZE]>()
        .prop_map(AccountId::new)
        .prop_filter("reserved identities are not accounts", |id| {
            !id.is_reserved() && *id != custodian()
        })
}

/// Generates one of the first `n` deterministic accounts (`account(1)..=account(n)`).
///
/// Drawing from a small pool makes repeated interactions between the same accounts likely.
pub fn arb_pooled_account(n: u8) -> impl Strategy<Value = AccountId> {
    (1..=n).prop_map(account)
}
