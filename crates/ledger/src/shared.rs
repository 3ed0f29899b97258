//! A ledger shared between threads behind a single lock.

use std::sync::Arc;

use parking_lot::Mutex;
use weightlock_asset::UnderlyingAsset;
use weightlock_db::{DelegationDb, StakeDb};
use weightlock_primitives::{AccountId, Timestamp};

use crate::{
    errors::LedgerResult,
    ledger::Ledger,
    ops::{LedgerEvent, LedgerOp},
};

/// A cloneable handle to a [`Ledger`].
///
/// Every transition holds the lock for its whole duration, so transitions are serialized and no
/// caller ever observes another's partial effects.
#[derive(Debug)]
pub struct SharedLedger<S, A> {
    inner: Arc<Mutex<Ledger<S, A>>>,
}

impl<S, A> Clone for SharedLedger<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A> SharedLedger<S, A>
where
    S: StakeDb + DelegationDb,
    A: UnderlyingAsset,
{
    /// Wraps `ledger`.
    pub fn new(ledger: Ledger<S, A>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Applies `op` on behalf of `caller` at `now`.
    pub fn apply(
        &self,
        caller: AccountId,
        now: Timestamp,
        op: LedgerOp,
    ) -> LedgerResult<LedgerEvent> {
        self.inner.lock().apply(caller, now, op)
    }

    /// Runs `f` against a consistent view of the ledger.
    pub fn read<R>(&self, f: impl FnOnce(&Ledger<S, A>) -> R) -> R {
        f(&*self.inner.lock())
    }

    /// Runs `f` with exclusive access to the ledger.
    pub fn write<R>(&self, f: impl FnOnce(&mut Ledger<S, A>) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use weightlock_asset::InMemoryAsset;
    use weightlock_db::LedgerInMemory;
    use weightlock_delegation::consistency::check_accounts;
    use weightlock_params::prelude::LedgerParams;
    use weightlock_test_utils::accounts::{account, custodian};

    use super::*;

    #[test]
    fn concurrent_callers_are_serialized() {
        let stakers: Vec<_> = (1..=8).map(account).collect();
        let target = account(9);

        let mut asset = InMemoryAsset::new(custodian());
        for staker in &stakers {
            asset.mint(*staker, 1_000).unwrap();
            asset.approve_custodian(*staker, 1_000);
        }
        let ledger = Ledger::new(LedgerParams::default(), LedgerInMemory::new(), asset).unwrap();
        let max = ledger.params().max_lock_duration;
        let shared = SharedLedger::new(ledger);

        let handles: Vec<_> = stakers
            .iter()
            .map(|staker| {
                let (shared, staker) = (shared.clone(), *staker);
                thread::spawn(move || {
                    shared
                        .apply(
                            staker,
                            0,
                            LedgerOp::Stake {
                                amount: 1_000,
                                lock_duration: max,
                            },
                        )
                        .unwrap();
                    for _ in 0..10 {
                        shared
                            .apply(
                                staker,
                                0,
                                LedgerOp::Delegate {
                                    delegatee: target,
                                    amount: 100,
                                },
                            )
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        shared.read(|ledger| {
            assert_eq!(ledger.amount_received(&target), 8 * 1_000);
            assert_eq!(ledger.delegators_of(&target).len(), 8);
            assert_eq!(ledger.total_locked(), 8 * 1_000);
            check_accounts(ledger.db(), stakers.iter().copied().chain([target])).unwrap();
        });

        let released = shared.write(|ledger| ledger.withdraw(stakers[0], max)).unwrap();
        assert_eq!(released.undelegated.len(), 1);
        assert_eq!(shared.read(|ledger| ledger.amount_received(&target)), 7 * 1_000);
    }
}
