//! The ledger facade: the public transitions and read accessors.

use tracing::{debug, info};
use weightlock_asset::UnderlyingAsset;
use weightlock_db::{DelegationDb, StakeDb, StakeRecord};
use weightlock_delegation::{query, Delegated, DelegationRegistry, Undelegated};
use weightlock_params::prelude::LedgerParams;
use weightlock_primitives::{AccountId, Amount, LockRatio, Seconds, Timestamp};

use crate::{
    errors::{LedgerError, LedgerResult},
    stake::{self, AccountState, Mint},
};

/// Result of a successful [`Ledger::stake`] or [`Ledger::increase_stake`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staked {
    /// The staking account.
    pub owner: AccountId,

    /// Underlying units pulled into custody by this call.
    pub amount: Amount,

    /// Derived units minted by this call.
    pub minted: Amount,

    /// Total underlying units locked after the call.
    pub locked_amount: Amount,

    /// Ratio the mint was computed at.
    pub lock_ratio: LockRatio,

    /// Maturity of the stake.
    pub maturity: Timestamp,
}

impl From<&Mint> for Staked {
    fn from(mint: &Mint) -> Self {
        Self {
            owner: mint.owner,
            amount: mint.amount,
            minted: mint.minted,
            locked_amount: mint.record.locked_amount,
            lock_ratio: mint.record.lock_ratio,
            maturity: mint.record.maturity,
        }
    }
}

/// Result of a successful [`Ledger::withdraw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawn {
    /// The withdrawing account.
    pub owner: AccountId,

    /// Underlying units returned to the owner.
    pub released: Amount,

    /// Derived units burned.
    pub burned: Amount,

    /// Delegations that had to be released first; empty if there were none.
    pub undelegated: Vec<Undelegated>,
}

/// A governance-weight ledger over a store `S` and an underlying asset `A`.
///
/// Every transition takes the verified identity of its caller; transitions that depend on time
/// take the current time as well, which is never advanced during the call.
#[derive(Debug, Clone)]
pub struct Ledger<S, A> {
    params: LedgerParams,
    db: S,
    asset: A,
}

impl<S, A> Ledger<S, A>
where
    S: StakeDb + DelegationDb,
    A: UnderlyingAsset,
{
    /// Creates a ledger after validating `params`.
    pub fn new(params: LedgerParams, db: S, asset: A) -> LedgerResult<Self> {
        params.validate()?;

        Ok(Self { params, db, asset })
    }

    /// The parameters this ledger was created with.
    pub const fn params(&self) -> &LedgerParams {
        &self.params
    }

    /// The underlying store.
    pub const fn db(&self) -> &S {
        &self.db
    }

    /// The underlying asset.
    pub const fn asset(&self) -> &A {
        &self.asset
    }

    /// Mutable access to the underlying asset, for hosts that fund accounts or grant allowances.
    pub fn asset_mut(&mut self) -> &mut A {
        &mut self.asset
    }

    /// Consumes the ledger, returning its store and asset.
    pub fn into_parts(self) -> (S, A) {
        (self.db, self.asset)
    }

    /// Locks `amount` of the caller's underlying asset for `lock_duration` seconds from `now`.
    ///
    /// Mints `coefficient * (lock_duration / max_lock_duration)² * amount` derived units.
    pub fn stake(
        &mut self,
        caller: AccountId,
        now: Timestamp,
        amount: Amount,
        lock_duration: Seconds,
    ) -> LedgerResult<Staked> {
        ensure_caller(&caller)?;

        let mint = stake::plan_open(&self.db, &self.params, caller, amount, lock_duration, now)?;
        self.pull(caller, amount)?;
        stake::commit_mint(&mut self.db, &mint);

        info!(%caller, %amount, minted = %mint.minted, maturity = %mint.record.maturity, "staked");

        Ok(Staked::from(&mint))
    }

    /// Adds `amount` to the caller's open stake, minting at the ratio recorded when it was opened.
    ///
    /// The maturity of the stake is not changed.
    pub fn increase_stake(&mut self, caller: AccountId, amount: Amount) -> LedgerResult<Staked> {
        ensure_caller(&caller)?;

        let mint = stake::plan_top_up(&self.db, &self.params, caller, amount)?;
        self.pull(caller, amount)?;
        stake::commit_mint(&mut self.db, &mint);

        info!(
            %caller,
            %amount,
            minted = %mint.minted,
            locked = %mint.record.locked_amount,
            "increased stake"
        );

        Ok(Staked::from(&mint))
    }

    /// Delegates `amount` of the caller's undelegated derived balance to `delegatee`.
    pub fn delegate(
        &mut self,
        caller: AccountId,
        delegatee: AccountId,
        amount: Amount,
    ) -> LedgerResult<Delegated> {
        ensure_caller(&caller)?;

        let balance = self.db.derived_balance(&caller);

        Ok(DelegationRegistry::new(&mut self.db).delegate(caller, delegatee, amount, balance)?)
    }

    /// Takes up to `amount` back from the caller's delegation to `delegatee`.
    ///
    /// `predecessor_hint` should name the entry preceding `delegatee` in the caller's outbound
    /// list, or [`AccountId::HEAD`]. It is verified before use and a wrong hint only costs a scan.
    pub fn undelegate(
        &mut self,
        caller: AccountId,
        predecessor_hint: AccountId,
        delegatee: AccountId,
        amount: Amount,
    ) -> LedgerResult<Undelegated> {
        ensure_caller(&caller)?;

        Ok(DelegationRegistry::new(&mut self.db).undelegate(
            caller,
            predecessor_hint,
            delegatee,
            amount,
        )?)
    }

    /// Releases every delegation of the caller.
    pub fn undelegate_all(&mut self, caller: AccountId) -> LedgerResult<Vec<Undelegated>> {
        ensure_caller(&caller)?;

        Ok(DelegationRegistry::new(&mut self.db).undelegate_all(caller)?)
    }

    /// Closes the caller's matured stake.
    ///
    /// Outstanding delegations are released first, then the whole derived balance is burned and
    /// the locked amount is returned to the caller. Every write is validated before the payout
    /// and applied after it, so a refused payout leaves stake and delegations untouched.
    pub fn withdraw(&mut self, caller: AccountId, now: Timestamp) -> LedgerResult<Withdrawn> {
        ensure_caller(&caller)?;

        let burn = stake::plan_close(&self.db, caller, now)?;
        self.asset
            .check_push(caller, burn.released)
            .map_err(LedgerError::Asset)?;

        let release = if query::amount_delegated(&self.db, &caller) > 0 {
            let release = DelegationRegistry::new(&mut self.db).plan_undelegate_all(caller)?;
            debug!(
                %caller,
                edges = release.released().len(),
                "releasing delegations before withdrawal"
            );
            Some(release)
        } else {
            None
        };

        self.asset
            .push(caller, burn.released)
            .map_err(LedgerError::Asset)?;

        let undelegated = match release {
            Some(release) => DelegationRegistry::new(&mut self.db).commit_undelegate_all(release),
            None => Vec::new(),
        };
        stake::commit_burn(&mut self.db, &burn);

        info!(
            %caller,
            released = %burn.released,
            burned = %burn.burned,
            undelegated = undelegated.len(),
            "withdrew stake"
        );

        Ok(Withdrawn {
            owner: caller,
            released: burn.released,
            burned: burn.burned,
            undelegated,
        })
    }

    /// The open stake of `owner`, if any.
    pub fn stake_of(&self, owner: &AccountId) -> Option<StakeRecord> {
        self.db.get_stake(owner)
    }

    /// Derived balance of `owner`, delegated or not.
    pub fn derived_balance(&self, owner: &AccountId) -> Amount {
        self.db.derived_balance(owner)
    }

    /// Part of the derived balance of `owner` that is not delegated.
    pub fn undelegated_balance(&self, owner: &AccountId) -> Amount {
        self.derived_balance(owner)
            .saturating_sub(self.amount_delegated(owner))
    }

    /// Sum of the delegations made by `delegator`.
    pub fn amount_delegated(&self, delegator: &AccountId) -> Amount {
        query::amount_delegated(&self.db, delegator)
    }

    /// Sum of the delegations received by `delegatee`.
    pub fn amount_received(&self, delegatee: &AccountId) -> Amount {
        query::amount_received(&self.db, delegatee)
    }

    /// Amount `delegator` delegates to `delegatee`.
    pub fn delegation_amount(&self, delegator: &AccountId, delegatee: &AccountId) -> Amount {
        query::delegation_amount(&self.db, delegator, delegatee)
    }

    /// Accounts delegating to `delegatee`.
    pub fn delegators_of(&self, delegatee: &AccountId) -> Vec<AccountId> {
        query::delegators_of(&self.db, delegatee)
    }

    /// Accounts `delegator` delegates to.
    pub fn delegatees_of(&self, delegator: &AccountId) -> Vec<AccountId> {
        query::delegatees_of(&self.db, delegator)
    }

    /// Whether `delegator` delegates to `delegatee`.
    pub fn is_delegator_of(&self, delegator: &AccountId, delegatee: &AccountId) -> bool {
        query::is_delegator_of(&self.db, delegator, delegatee)
    }

    /// Whether `delegatee` receives from `delegator`.
    pub fn is_delegatee_of(&self, delegatee: &AccountId, delegator: &AccountId) -> bool {
        query::is_delegatee_of(&self.db, delegatee, delegator)
    }

    /// Sum of all derived balances.
    pub fn derived_supply(&self) -> Amount {
        self.db.derived_supply()
    }

    /// Sum of all locked underlying units.
    pub fn total_locked(&self) -> Amount {
        self.db.total_locked()
    }

    /// Lifecycle state of `owner` at `now`.
    pub fn account_state(&self, owner: &AccountId, now: Timestamp) -> AccountState {
        stake::account_state(&self.db, owner, now)
    }

    fn pull(&mut self, from: AccountId, amount: Amount) -> LedgerResult<()> {
        self.asset.pull(from, amount).map_err(|err| {
            debug!(%from, %amount, %err, "could not pull underlying");
            LedgerError::from(err)
        })
    }
}

fn ensure_caller(caller: &AccountId) -> LedgerResult<()> {
    if caller.is_reserved() {
        return Err(LedgerError::InvalidCaller(*caller));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use weightlock_asset::{AssetError, AssetResult, InMemoryAsset};
    use weightlock_db::LedgerInMemory;
    use weightlock_delegation::{consistency::check_accounts, HintUse, RegistryError};
    use weightlock_params::prelude::SECONDS_PER_DAY;
    use weightlock_primitives::FIXED_POINT_SCALE;
    use weightlock_test_utils::accounts::{account, custodian};

    use super::*;

    type TestLedger = Ledger<LedgerInMemory, InMemoryAsset>;

    const UNIT: Amount = FIXED_POINT_SCALE;

    fn setup(funded: &[(AccountId, Amount)]) -> TestLedger {
        let mut asset = InMemoryAsset::new(custodian());
        for (who, amount) in funded {
            asset.mint(*who, *amount).unwrap();
            asset.approve_custodian(*who, *amount);
        }

        Ledger::new(LedgerParams::default(), LedgerInMemory::new(), asset).unwrap()
    }

    fn max_lock(ledger: &TestLedger) -> Seconds {
        ledger.params().max_lock_duration
    }

    #[test]
    fn curve_is_quadratic_in_lock_ratio() {
        let (alice, bob) = (account(1), account(2));
        let mut ledger = setup(&[(alice, 100), (bob, 100)]);
        let max = max_lock(&ledger);

        let full = ledger.stake(alice, 0, 100, max).unwrap();
        assert_eq!(full.minted, 200);
        assert_eq!(full.lock_ratio, LockRatio::ONE);

        let half = ledger.stake(bob, 0, 100, max / 2).unwrap();
        assert_eq!(half.minted, 50);

        assert_eq!(ledger.derived_supply(), 250);
        assert_eq!(ledger.total_locked(), 200);
        assert_eq!(ledger.asset().balance_of(&custodian()), 200);
    }

    #[test]
    fn stake_failures_leave_no_trace() {
        let alice = account(1);
        let mut ledger = setup(&[(alice, 100)]);
        let max = max_lock(&ledger);

        assert!(matches!(
            ledger.stake(alice, 0, 101, max),
            Err(LedgerError::InsufficientFunds(
                AssetError::InsufficientAllowance { .. }
            ))
        ));
        assert_eq!(
            ledger.stake(AccountId::NULL, 0, 1, max),
            Err(LedgerError::InvalidCaller(AccountId::NULL))
        );
        assert_eq!(
            ledger.increase_stake(alice, 1),
            Err(LedgerError::NoActiveStake(alice))
        );

        assert_eq!(*ledger.db(), LedgerInMemory::new());
        assert_eq!(ledger.asset().balance_of(&alice), 100);
    }

    #[test]
    fn second_stake_is_rejected_until_withdrawn() {
        let alice = account(1);
        let mut ledger = setup(&[(alice, 300)]);
        let min = ledger.params().min_lock_duration;

        ledger.stake(alice, 0, 100, min).unwrap();
        assert_eq!(
            ledger.stake(alice, 0, 100, min),
            Err(LedgerError::AlreadyStaked(alice))
        );

        ledger.withdraw(alice, min).unwrap();
        ledger.stake(alice, min, 100, min).unwrap();
        assert_eq!(ledger.stake_of(&alice).unwrap().maturity, 2 * min);
    }

    #[test]
    fn increase_stake_reuses_the_original_ratio() {
        let alice = account(1);
        let mut ledger = setup(&[(alice, 1_000)]);
        let max = max_lock(&ledger);

        let opened = ledger.stake(alice, 5, 100, max / 2).unwrap();
        let topped = ledger.increase_stake(alice, 100).unwrap();

        assert_eq!(topped.minted, opened.minted);
        assert_eq!(topped.lock_ratio, opened.lock_ratio);
        assert_eq!(topped.maturity, opened.maturity);
        assert_eq!(topped.locked_amount, 200);
        assert_eq!(ledger.derived_balance(&alice), 100);
    }

    #[test]
    fn delegation_scenario_from_a_180_day_lock() {
        let (alice, a, b) = (account(1), account(2), account(3));
        let mut ledger = setup(&[(alice, 1_000 * UNIT)]);

        let staked = ledger
            .stake(alice, 0, 1_000 * UNIT, 180 * SECONDS_PER_DAY)
            .unwrap();
        assert_eq!(staked.lock_ratio.raw(), 123_287_671_232_876_712);
        assert_eq!(staked.minted, 30_399_699_756_051_791_918);

        ledger.delegate(alice, a, 300).unwrap();
        ledger.delegate(alice, b, 200).unwrap();
        assert_eq!(ledger.amount_delegated(&alice), 500);
        // most recent first
        assert_eq!(ledger.delegatees_of(&alice), vec![b, a]);

        let out = ledger.undelegate(alice, AccountId::HEAD, a, 300).unwrap();
        assert_eq!(out.remaining, 0);
        assert_eq!(out.hint, Some(HintUse::Scanned));

        assert!(ledger.delegators_of(&a).is_empty());
        assert!(!ledger.is_delegator_of(&alice, &a));
        assert!(!ledger.is_delegatee_of(&a, &alice));
        assert!(ledger.is_delegator_of(&alice, &b));
        assert!(ledger.is_delegatee_of(&b, &alice));
        assert_eq!(ledger.delegatees_of(&alice), vec![b]);
        assert_eq!(ledger.delegation_amount(&alice, &b), 200);
        assert_eq!(ledger.amount_delegated(&alice), 200);
        assert_eq!(ledger.amount_received(&b), 200);
        check_accounts(ledger.db(), [alice, a, b]).unwrap();
    }

    #[test]
    fn delegation_is_bounded_by_derived_balance() {
        let (alice, bob) = (account(1), account(2));
        let mut ledger = setup(&[(alice, 100)]);
        let max = max_lock(&ledger);

        assert!(matches!(
            ledger.delegate(alice, bob, 1),
            Err(LedgerError::Registry(
                RegistryError::InsufficientDerivedBalance { .. }
            ))
        ));

        ledger.stake(alice, 0, 100, max).unwrap();
        ledger.delegate(alice, bob, 150).unwrap();
        assert_eq!(ledger.undelegated_balance(&alice), 50);
        assert_eq!(
            ledger.delegate(alice, bob, 51),
            Err(LedgerError::Registry(
                RegistryError::InsufficientDerivedBalance {
                    available: 50,
                    requested: 51,
                }
            ))
        );
        assert_eq!(
            ledger.delegate(alice, alice, 1),
            Err(LedgerError::Registry(RegistryError::InvalidSelfDelegation(
                alice
            )))
        );
    }

    #[test]
    fn undelegate_all_clears_every_inbound_list() {
        let alice = account(1);
        let delegatees: Vec<_> = (2..=6).map(account).collect();
        let mut ledger = setup(&[(alice, 100)]);
        let max = max_lock(&ledger);

        assert_eq!(
            ledger.undelegate_all(alice),
            Err(LedgerError::Registry(RegistryError::NoDelegationsOutstanding(alice)))
        );

        ledger.stake(alice, 0, 100, max).unwrap();
        for (i, delegatee) in delegatees.iter().enumerate() {
            ledger.delegate(alice, *delegatee, 10 + i as Amount).unwrap();
        }

        let released = ledger.undelegate_all(alice).unwrap();
        assert_eq!(released.len(), delegatees.len());
        assert_eq!(ledger.amount_delegated(&alice), 0);
        for delegatee in &delegatees {
            assert!(ledger.delegators_of(delegatee).is_empty());
            assert_eq!(ledger.amount_received(delegatee), 0);
        }
        // the derived balance itself is untouched
        assert_eq!(ledger.derived_balance(&alice), 200);
    }

    #[test]
    fn early_withdraw_fails_without_side_effects() {
        let (alice, bob) = (account(1), account(2));
        let mut ledger = setup(&[(alice, 100)]);
        let max = max_lock(&ledger);

        ledger.stake(alice, 1_000, 100, max).unwrap();
        ledger.delegate(alice, bob, 120).unwrap();
        let before = ledger.db().clone();

        for now in [1_000, 1_000 + max - 1] {
            assert_eq!(
                ledger.withdraw(alice, now),
                Err(LedgerError::LockNotMatured {
                    matures_at: 1_000 + max,
                    now,
                })
            );
        }

        assert_eq!(*ledger.db(), before);
        assert_eq!(ledger.asset().balance_of(&alice), 0);
        assert_eq!(
            ledger.withdraw(bob, 1_000 + max),
            Err(LedgerError::NothingToWithdraw(bob))
        );
    }

    #[test]
    fn withdraw_releases_delegations_and_conserves_the_underlying() {
        let (alice, bob, carol) = (account(1), account(2), account(3));
        let mut ledger = setup(&[(alice, 500), (carol, 100)]);
        let max = max_lock(&ledger);

        ledger.stake(alice, 0, 300, max).unwrap();
        ledger.increase_stake(alice, 200).unwrap();
        ledger.stake(carol, 0, 100, max).unwrap();

        ledger.delegate(alice, bob, 400).unwrap();
        ledger.delegate(alice, carol, 100).unwrap();
        ledger.delegate(carol, bob, 50).unwrap();
        ledger.undelegate(alice, carol, bob, 150).unwrap();

        let withdrawn = ledger.withdraw(alice, max).unwrap();
        assert_eq!(withdrawn.released, 500);
        assert_eq!(withdrawn.burned, 1_000);
        assert_eq!(withdrawn.undelegated.len(), 2);

        assert_eq!(ledger.asset().balance_of(&alice), 500);
        assert_eq!(ledger.derived_balance(&alice), 0);
        assert_eq!(ledger.amount_delegated(&alice), 0);
        assert_eq!(ledger.account_state(&alice, max), AccountState::Unstaked);

        // carol's own delegation survives
        assert_eq!(ledger.delegators_of(&bob), vec![carol]);
        assert_eq!(ledger.amount_received(&bob), 50);
        assert_eq!(ledger.derived_supply(), 200);
        assert_eq!(ledger.total_locked(), 100);
        assert_eq!(ledger.asset().balance_of(&custodian()), 100);
        check_accounts(ledger.db(), [alice, bob, carol]).unwrap();
    }

    /// Custody that passes every preflight but refuses the payout itself.
    #[derive(Debug)]
    struct RefusingPayout(InMemoryAsset);

    impl UnderlyingAsset for RefusingPayout {
        fn check_pull(&self, from: AccountId, amount: Amount) -> AssetResult<()> {
            self.0.check_pull(from, amount)
        }

        fn pull(&mut self, from: AccountId, amount: Amount) -> AssetResult<()> {
            self.0.pull(from, amount)
        }

        fn check_push(&self, to: AccountId, amount: Amount) -> AssetResult<()> {
            self.0.check_push(to, amount)
        }

        fn push(&mut self, to: AccountId, _amount: Amount) -> AssetResult<()> {
            Err(AssetError::Overflow(to))
        }
    }

    #[test]
    fn refused_payout_keeps_stake_and_delegations() {
        let (alice, bob) = (account(1), account(2));
        let mut asset = InMemoryAsset::new(custodian());
        asset.mint(alice, 100).unwrap();
        asset.approve_custodian(alice, 100);
        let mut ledger = Ledger::new(
            LedgerParams::default(),
            LedgerInMemory::new(),
            RefusingPayout(asset),
        )
        .unwrap();
        let max = ledger.params().max_lock_duration;

        ledger.stake(alice, 0, 100, max).unwrap();
        ledger.delegate(alice, bob, 120).unwrap();
        let before = ledger.db().clone();

        assert_eq!(
            ledger.withdraw(alice, max),
            Err(LedgerError::Asset(AssetError::Overflow(alice)))
        );
        assert_eq!(*ledger.db(), before);
        assert_eq!(ledger.delegators_of(&bob), vec![alice]);
        assert_eq!(ledger.derived_balance(&alice), 200);
        assert_eq!(ledger.asset().0.balance_of(&custodian()), 100);
        check_accounts(ledger.db(), [alice, bob]).unwrap();
    }

    #[test]
    fn withdraw_without_delegations() {
        let alice = account(1);
        let mut ledger = setup(&[(alice, 100)]);
        let min = ledger.params().min_lock_duration;

        ledger.stake(alice, 0, 100, min).unwrap();
        let withdrawn = ledger.withdraw(alice, min).unwrap();

        assert!(withdrawn.undelegated.is_empty());
        assert_eq!(ledger.asset().balance_of(&alice), 100);
        assert_eq!(*ledger.db(), LedgerInMemory::new());
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = LedgerParams {
            curve_coefficient: 0,
            ..LedgerParams::default()
        };

        assert!(matches!(
            Ledger::new(params, LedgerInMemory::new(), InMemoryAsset::new(custodian())),
            Err(LedgerError::Params(_))
        ));
    }
}
