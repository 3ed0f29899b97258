//! Property tests driving random operation sequences through a ledger.

use proptest::prelude::*;
use weightlock_asset::InMemoryAsset;
use weightlock_db::LedgerInMemory;
use weightlock_delegation::consistency::check_accounts;
use weightlock_params::prelude::LedgerParams;
use weightlock_primitives::{AccountId, Amount, Seconds, Timestamp};
use weightlock_test_utils::accounts::{account, arb_pooled_account, custodian};

use crate::{Ledger, LedgerOp};

type TestLedger = Ledger<LedgerInMemory, InMemoryAsset>;

/// Number of accounts interacting in a run.
const POOL: u8 = 5;

/// Underlying units each account starts with.
const FUNDING: Amount = 1_000_000;

fn pool() -> Vec<AccountId> {
    (1..=POOL).map(account).collect()
}

fn funded_ledger() -> TestLedger {
    let mut asset = InMemoryAsset::new(custodian());
    for who in pool() {
        asset.mint(who, FUNDING).unwrap();
        asset.approve_custodian(who, FUNDING);
    }

    Ledger::new(LedgerParams::default(), LedgerInMemory::new(), asset).unwrap()
}

/// Lock durations around and inside the accepted range.
fn arb_lock() -> impl Strategy<Value = Seconds> {
    let params = LedgerParams::default();
    prop_oneof![
        1 => Just(params.min_lock_duration - 1),
        1 => Just(params.max_lock_duration + 1),
        8 => params.min_lock_duration..=params.max_lock_duration,
    ]
}

fn arb_op() -> impl Strategy<Value = LedgerOp> {
    let amount = 0..=FUNDING / 4;
    let hint = prop_oneof![Just(AccountId::HEAD), arb_pooled_account(POOL)];

    prop_oneof![
        3 => (amount.clone(), arb_lock())
            .prop_map(|(amount, lock_duration)| LedgerOp::Stake { amount, lock_duration }),
        2 => amount.clone().prop_map(|amount| LedgerOp::IncreaseStake { amount }),
        5 => (arb_pooled_account(POOL), amount.clone())
            .prop_map(|(delegatee, amount)| LedgerOp::Delegate { delegatee, amount }),
        4 => (hint, arb_pooled_account(POOL), amount).prop_map(
            |(predecessor_hint, delegatee, amount)| LedgerOp::Undelegate {
                predecessor_hint,
                delegatee,
                amount,
            }
        ),
        1 => Just(LedgerOp::UndelegateAll),
        2 => Just(LedgerOp::Withdraw),
    ]
}

/// A caller, the time that passes before its call, and the operation.
fn arb_step() -> impl Strategy<Value = (AccountId, Seconds, LedgerOp)> {
    let max = LedgerParams::default().max_lock_duration;
    (arb_pooled_account(POOL), 0..=max / 8, arb_op())
}

fn assert_invariants(ledger: &TestLedger) -> Result<(), TestCaseError> {
    let accounts = pool();
    let asset = ledger.asset();

    check_accounts(ledger.db(), accounts.iter().copied())
        .map_err(|err| TestCaseError::fail(err.to_string()))?;

    let mut supply = 0;
    for who in &accounts {
        prop_assert!(ledger.amount_delegated(who) <= ledger.derived_balance(who));

        let locked = ledger.stake_of(who).map_or(0, |stake| stake.locked_amount);
        prop_assert_eq!(asset.balance_of(who) + locked, FUNDING);
        if locked == 0 {
            prop_assert_eq!(ledger.derived_balance(who), 0);
        }

        supply += ledger.derived_balance(who);
    }

    prop_assert_eq!(ledger.derived_supply(), supply);
    prop_assert_eq!(asset.balance_of(&custodian()), ledger.total_locked());

    Ok(())
}

proptest! {
    #[test]
    fn random_journals_preserve_invariants(
        steps in prop::collection::vec(arb_step(), 1..64),
    ) {
        let mut ledger = funded_ledger();
        let mut now: Timestamp = 0;

        for (caller, elapsed, op) in steps {
            now += elapsed;
            let before = ledger.clone();

            match ledger.apply(caller, now, op) {
                Ok(_) => assert_invariants(&ledger)?,
                Err(_) => {
                    prop_assert_eq!(ledger.db(), before.db());
                    for who in pool().into_iter().chain([custodian()]) {
                        prop_assert_eq!(
                            ledger.asset().balance_of(&who),
                            before.asset().balance_of(&who)
                        );
                    }
                }
            }
        }

        // everyone can always get their funds back once every lock has matured
        now += LedgerParams::default().max_lock_duration;
        for who in pool() {
            if ledger.stake_of(&who).is_some() {
                ledger.withdraw(who, now).unwrap();
            }
            prop_assert_eq!(ledger.asset().balance_of(&who), FUNDING);
            prop_assert_eq!(ledger.amount_delegated(&who), 0);
            prop_assert_eq!(ledger.derived_balance(&who), 0);
        }
        prop_assert_eq!(ledger.db(), &LedgerInMemory::new());
    }
}
