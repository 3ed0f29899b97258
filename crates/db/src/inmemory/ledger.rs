//! In-memory store holding the whole ledger state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;
use weightlock_primitives::{AccountId, Amount};

use crate::{
    delegation::{DelegationDb, InboundLink, OutboundLink},
    stake::{StakeDb, StakeRecord},
};

/// A two-level map `outer -> inner -> value`.
type NestedMap<V> = BTreeMap<AccountId, BTreeMap<AccountId, V>>;

/// In-memory implementation of [`StakeDb`] and [`DelegationDb`].
///
/// Ordered maps keep snapshots deterministic; the store derives `serde` so a ledger state can be
/// dumped and restored wholesale. Zero amounts are never stored, so two stores holding the same
/// logical state compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerInMemory {
    /// Stake per owner.
    stakes: BTreeMap<AccountId, StakeRecord>,

    /// Derived balance per owner.
    derived_balances: BTreeMap<AccountId, Amount>,

    /// Sum of all derived balances.
    derived_supply: Amount,

    /// Sum of all locked amounts.
    total_locked: Amount,

    /// delegatee -> member -> link.
    inbound: NestedMap<InboundLink>,

    /// delegator -> member -> link.
    outbound: NestedMap<OutboundLink>,

    /// delegator -> delegatee -> amount.
    edges: NestedMap<Amount>,

    /// Outbound total per delegator.
    delegated: BTreeMap<AccountId, Amount>,

    /// Inbound total per delegatee.
    received: BTreeMap<AccountId, Amount>,
}

impl LedgerInMemory {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accounts holding a stake.
    pub fn staker_count(&self) -> usize {
        self.stakes.len()
    }

    /// All accounts holding a stake, in identity order.
    pub fn stakers(&self) -> impl Iterator<Item = &AccountId> {
        self.stakes.keys()
    }

    /// All edges as `(delegator, delegatee, amount)`, in identity order.
    pub fn edges(&self) -> impl Iterator<Item = (AccountId, AccountId, Amount)> + '_ {
        self.edges.iter().flat_map(|(delegator, row)| {
            row.iter()
                .map(move |(delegatee, amount)| (*delegator, *delegatee, *amount))
        })
    }
}

fn nested_get<V: Copy>(map: &NestedMap<V>, outer: &AccountId, inner: &AccountId) -> Option<V> {
    map.get(outer).and_then(|row| row.get(inner)).copied()
}

fn nested_put<V>(map: &mut NestedMap<V>, outer: AccountId, inner: AccountId, value: V) {
    map.entry(outer).or_default().insert(inner, value);
}

fn nested_remove<V>(map: &mut NestedMap<V>, outer: &AccountId, inner: &AccountId) {
    if let Some(row) = map.get_mut(outer) {
        row.remove(inner);
        if row.is_empty() {
            map.remove(outer);
        }
    }
}

fn put_or_erase(map: &mut BTreeMap<AccountId, Amount>, key: AccountId, amount: Amount) {
    if amount == 0 {
        map.remove(&key);
    } else {
        map.insert(key, amount);
    }
}

impl StakeDb for LedgerInMemory {
    fn get_stake(&self, owner: &AccountId) -> Option<StakeRecord> {
        self.stakes.get(owner).copied()
    }

    fn put_stake(&mut self, owner: AccountId, stake: StakeRecord) {
        trace!(%owner, ?stake, "writing stake");
        self.stakes.insert(owner, stake);
    }

    fn remove_stake(&mut self, owner: &AccountId) -> Option<StakeRecord> {
        trace!(%owner, "removing stake");
        self.stakes.remove(owner)
    }

    fn derived_balance(&self, owner: &AccountId) -> Amount {
        self.derived_balances.get(owner).copied().unwrap_or_default()
    }

    fn set_derived_balance(&mut self, owner: AccountId, amount: Amount) {
        put_or_erase(&mut self.derived_balances, owner, amount);
    }

    fn derived_supply(&self) -> Amount {
        self.derived_supply
    }

    fn set_derived_supply(&mut self, amount: Amount) {
        self.derived_supply = amount;
    }

    fn total_locked(&self) -> Amount {
        self.total_locked
    }

    fn set_total_locked(&mut self, amount: Amount) {
        self.total_locked = amount;
    }
}

impl DelegationDb for LedgerInMemory {
    fn inbound_link(&self, delegatee: &AccountId, who: &AccountId) -> Option<InboundLink> {
        nested_get(&self.inbound, delegatee, who)
    }

    fn put_inbound_link(&mut self, delegatee: AccountId, who: AccountId, link: InboundLink) {
        nested_put(&mut self.inbound, delegatee, who, link);
    }

    fn remove_inbound_link(&mut self, delegatee: &AccountId, who: &AccountId) {
        nested_remove(&mut self.inbound, delegatee, who);
    }

    fn outbound_link(&self, delegator: &AccountId, who: &AccountId) -> Option<OutboundLink> {
        nested_get(&self.outbound, delegator, who)
    }

    fn put_outbound_link(&mut self, delegator: AccountId, who: AccountId, link: OutboundLink) {
        nested_put(&mut self.outbound, delegator, who, link);
    }

    fn remove_outbound_link(&mut self, delegator: &AccountId, who: &AccountId) {
        nested_remove(&mut self.outbound, delegator, who);
    }

    fn edge_amount(&self, delegator: &AccountId, delegatee: &AccountId) -> Amount {
        nested_get(&self.edges, delegator, delegatee).unwrap_or_default()
    }

    fn set_edge_amount(&mut self, delegator: AccountId, delegatee: AccountId, amount: Amount) {
        if amount == 0 {
            nested_remove(&mut self.edges, &delegator, &delegatee);
        } else {
            nested_put(&mut self.edges, delegator, delegatee, amount);
        }
    }

    fn amount_delegated(&self, delegator: &AccountId) -> Amount {
        self.delegated.get(delegator).copied().unwrap_or_default()
    }

    fn set_amount_delegated(&mut self, delegator: AccountId, amount: Amount) {
        put_or_erase(&mut self.delegated, delegator, amount);
    }

    fn amount_received(&self, delegatee: &AccountId) -> Amount {
        self.received.get(delegatee).copied().unwrap_or_default()
    }

    fn set_amount_received(&mut self, delegatee: AccountId, amount: Amount) {
        put_or_erase(&mut self.received, delegatee, amount);
    }
}

#[cfg(test)]
mod tests {
    use weightlock_primitives::LockRatio;
    use weightlock_test_utils::{accounts::account, arbitrary_generator::ArbitraryGenerator};

    use super::*;

    #[test]
    fn zero_amounts_are_not_stored() {
        let mut db = LedgerInMemory::new();
        let (alice, bob) = (account(1), account(2));

        db.set_edge_amount(alice, bob, 10);
        db.set_amount_delegated(alice, 10);
        db.set_derived_balance(alice, 20);
        assert_ne!(db, LedgerInMemory::new());

        db.set_edge_amount(alice, bob, 0);
        db.set_amount_delegated(alice, 0);
        db.set_derived_balance(alice, 0);
        assert_eq!(db, LedgerInMemory::new());
    }

    #[test]
    fn removing_last_link_drops_the_row() {
        let mut db = LedgerInMemory::new();
        let (alice, bob) = (account(1), account(2));
        let link = OutboundLink {
            next: AccountId::TAIL,
        };

        db.put_outbound_link(alice, bob, link);
        assert_eq!(db.outbound_link(&alice, &bob), Some(link));
        assert_eq!(db.outbound_link(&bob, &alice), None);

        db.remove_outbound_link(&alice, &bob);
        assert_eq!(db, LedgerInMemory::new());
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut db = LedgerInMemory::new();
        let (alice, bob) = (account(1), account(2));

        db.put_stake(
            alice,
            StakeRecord {
                locked_amount: 1_000,
                maturity: 42,
                lock_ratio: LockRatio::ONE,
            },
        );
        db.set_derived_balance(alice, 2_000);
        db.put_inbound_link(
            bob,
            alice,
            InboundLink {
                prev: AccountId::HEAD,
                next: AccountId::TAIL,
            },
        );
        db.set_edge_amount(alice, bob, 5);

        let json = serde_json::to_string(&db).unwrap();
        let restored: LedgerInMemory = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, db);
        assert_eq!(restored.edges().collect::<Vec<_>>(), vec![(alice, bob, 5)]);
        assert_eq!(restored.stakers().collect::<Vec<_>>(), vec![&alice]);
    }

    #[test]
    fn stakes_are_keyed_per_account() {
        let mut generator = ArbitraryGenerator::new();
        let mut db = LedgerInMemory::new();

        let owners: Vec<AccountId> = (0..8).map(|_| generator.generate()).collect();
        for (i, owner) in owners.iter().enumerate() {
            db.put_stake(
                *owner,
                StakeRecord {
                    locked_amount: i as Amount + 1,
                    maturity: 0,
                    lock_ratio: LockRatio::ONE,
                },
            );
        }

        assert_eq!(db.staker_count(), owners.len());
        for (i, owner) in owners.iter().enumerate() {
            assert_eq!(db.get_stake(owner).unwrap().locked_amount, i as Amount + 1);
        }

        db.remove_stake(&owners[0]);
        assert_eq!(db.get_stake(&owners[0]), None);
        assert_eq!(db.staker_count(), owners.len() - 1);
    }
}
