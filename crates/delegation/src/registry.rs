//! The state transitions of the delegation registry.

use tracing::{debug, info};
use weightlock_db::{DelegationDb, InboundLink};
use weightlock_primitives::{AccountId, Amount};

use crate::{
    errors::{RegistryError, RegistryResult},
    inbound,
    outbound::{self, HintUse},
};

/// Result of a successful [`DelegationRegistry::delegate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delegated {
    /// The delegating account.
    pub delegator: AccountId,

    /// The receiving account.
    pub delegatee: AccountId,

    /// Amount added to the edge.
    pub amount: Amount,

    /// Edge amount after the call.
    pub edge_amount: Amount,

    /// Whether the edge was created by this call.
    pub created: bool,
}

/// Result of removing weight from a single edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undelegated {
    /// The delegating account.
    pub delegator: AccountId,

    /// The receiving account.
    pub delegatee: AccountId,

    /// Amount actually taken off the edge.
    pub amount: Amount,

    /// Edge amount after the call; zero means the edge and both list entries are gone.
    pub remaining: Amount,

    /// How the outbound predecessor was found, if the entry had to be unlinked.
    pub hint: Option<HintUse>,
}

/// Mutating handle over a [`DelegationDb`].
///
/// Every method validates first and only then writes, so an `Err` leaves the store untouched.
#[derive(Debug)]
pub struct DelegationRegistry<'db, D> {
    db: &'db mut D,
}

impl<'db, D: DelegationDb> DelegationRegistry<'db, D> {
    /// Wraps a store.
    pub fn new(db: &'db mut D) -> Self {
        Self { db }
    }

    /// Moves `amount` of `delegator`'s undelegated weight to `delegatee`.
    ///
    /// `derived_balance` is the delegator's current derived balance, owned by the stake ledger.
    /// A new edge is linked at the front of both lists; an existing edge is only incremented.
    pub fn delegate(
        &mut self,
        delegator: AccountId,
        delegatee: AccountId,
        amount: Amount,
        derived_balance: Amount,
    ) -> RegistryResult<Delegated> {
        if delegator.is_reserved() {
            return Err(RegistryError::InvalidDelegator(delegator));
        }
        if delegatee == delegator {
            return Err(RegistryError::InvalidSelfDelegation(delegator));
        }
        if delegatee.is_reserved() {
            return Err(RegistryError::InvalidRecipient(delegatee));
        }
        if amount == 0 {
            return Err(RegistryError::ZeroAmount);
        }

        let delegated = self.db.amount_delegated(&delegator);
        let available = derived_balance.saturating_sub(delegated);
        if amount > available {
            debug!(%delegator, %available, requested = %amount, "insufficient derived balance");
            return Err(RegistryError::InsufficientDerivedBalance {
                available,
                requested: amount,
            });
        }

        let edge = self.db.edge_amount(&delegator, &delegatee);
        let edge_amount = edge.checked_add(amount).ok_or(RegistryError::Overflow)?;
        let new_delegated = delegated
            .checked_add(amount)
            .ok_or(RegistryError::Overflow)?;
        let new_received = self
            .db
            .amount_received(&delegatee)
            .checked_add(amount)
            .ok_or(RegistryError::Overflow)?;

        let created = edge == 0;
        if created {
            inbound::push_front(self.db, delegatee, delegator);
            outbound::push_front(self.db, delegator, delegatee);
        }
        self.db.set_edge_amount(delegator, delegatee, edge_amount);
        self.db.set_amount_delegated(delegator, new_delegated);
        self.db.set_amount_received(delegatee, new_received);

        info!(%delegator, %delegatee, %amount, %edge_amount, created, "delegated");

        Ok(Delegated {
            delegator,
            delegatee,
            amount,
            edge_amount,
            created,
        })
    }

    /// Takes up to `amount` back from the edge `delegator -> delegatee`.
    ///
    /// The edge shrinks by `min(amount, edge)`; if it reaches zero the entry is unlinked from both
    /// lists. `predecessor_hint` should name the entry preceding `delegatee` in `delegator`'s
    /// outbound list (or [`AccountId::HEAD`]); it is verified before use.
    pub fn undelegate(
        &mut self,
        delegator: AccountId,
        predecessor_hint: AccountId,
        delegatee: AccountId,
        amount: Amount,
    ) -> RegistryResult<Undelegated> {
        let edge = self.db.edge_amount(&delegator, &delegatee);
        if edge == 0 {
            return Err(RegistryError::NoSuchDelegation {
                delegator,
                delegatee,
            });
        }
        if amount == 0 {
            return Err(RegistryError::ZeroAmount);
        }

        let taken = amount.min(edge);
        let remaining = edge - taken;
        let new_delegated = self
            .db
            .amount_delegated(&delegator)
            .checked_sub(taken)
            .ok_or_else(|| corrupted_total("outbound", &delegator))?;
        let new_received = self
            .db
            .amount_received(&delegatee)
            .checked_sub(taken)
            .ok_or_else(|| corrupted_total("inbound", &delegatee))?;

        // locate the splice point before writing anything
        let splice = match remaining {
            0 => {
                let link = self.db.inbound_link(&delegatee, &delegator).ok_or_else(|| {
                    RegistryError::Corrupted(format!(
                        "{delegator} is missing from the inbound list of {delegatee}"
                    ))
                })?;
                let (pred, hint) =
                    outbound::predecessor(self.db, &delegator, &delegatee, &predecessor_hint)?;
                let next = outbound::next_of(self.db, &delegator, &delegatee).ok_or_else(|| {
                    RegistryError::Corrupted(format!(
                        "{delegatee} is missing from the outbound list of {delegator}"
                    ))
                })?;
                Some((link, pred, next, hint))
            }
            _ => None,
        };

        let hint = splice.map(|(link, pred, next, hint)| {
            inbound::unlink(self.db, delegatee, delegator, link);
            outbound::unlink(self.db, delegator, delegatee, pred, next);
            hint
        });
        self.db.set_edge_amount(delegator, delegatee, remaining);
        self.db.set_amount_delegated(delegator, new_delegated);
        self.db.set_amount_received(delegatee, new_received);

        info!(%delegator, %delegatee, amount = %taken, %remaining, ?hint, "undelegated");

        Ok(Undelegated {
            delegator,
            delegatee,
            amount: taken,
            remaining,
            hint,
        })
    }

    /// Releases every delegation of `delegator`.
    ///
    /// Walks the outbound list from `HEAD` to `TAIL`, unlinking `delegator` from each delegatee's
    /// inbound list and zeroing each edge. Cost is linear in the number of edges.
    pub fn undelegate_all(&mut self, delegator: AccountId) -> RegistryResult<Vec<Undelegated>> {
        let release = self.plan_undelegate_all(delegator)?;
        Ok(self.commit_undelegate_all(release))
    }

    /// Validates every delegation of `delegator` and captures what releasing them would write.
    ///
    /// Nothing is written. The returned [`ReleaseAll`] is only valid until the store changes.
    pub fn plan_undelegate_all(&self, delegator: AccountId) -> RegistryResult<ReleaseAll> {
        let db = &*self.db;
        let total = db.amount_delegated(&delegator);
        if total == 0 {
            return Err(RegistryError::NoDelegationsOutstanding(delegator));
        }

        let mut released = Vec::new();
        let mut links = Vec::new();
        let mut sum: Amount = 0;
        let mut cursor = outbound::next_of(db, &delegator, &AccountId::HEAD)
            .unwrap_or(AccountId::TAIL);
        while cursor != AccountId::TAIL {
            let delegatee = cursor;
            let edge = db.edge_amount(&delegator, &delegatee);
            let link = db.inbound_link(&delegatee, &delegator);
            let received = db.amount_received(&delegatee).checked_sub(edge);

            let (Some(link), Some(received)) = (link, received) else {
                return Err(RegistryError::Corrupted(format!(
                    "edge {delegator} -> {delegatee} disagrees with the inbound side"
                )));
            };
            if edge == 0 || released.len() > MAX_WALK {
                return Err(RegistryError::Corrupted(format!(
                    "outbound list of {delegator} is inconsistent at {delegatee}"
                )));
            }

            sum = sum.checked_add(edge).ok_or(RegistryError::Overflow)?;
            links.push((link, received));
            released.push(Undelegated {
                delegator,
                delegatee,
                amount: edge,
                remaining: 0,
                hint: None,
            });

            cursor = outbound::next_of(db, &delegator, &delegatee).ok_or_else(|| {
                RegistryError::Corrupted(format!("outbound list of {delegator} is broken"))
            })?;
        }
        if sum != total {
            return Err(corrupted_total("outbound", &delegator));
        }

        Ok(ReleaseAll {
            delegator,
            total,
            released,
            links,
        })
    }

    /// Applies a release captured by [`DelegationRegistry::plan_undelegate_all`].
    pub fn commit_undelegate_all(&mut self, release: ReleaseAll) -> Vec<Undelegated> {
        let ReleaseAll {
            delegator,
            total,
            released,
            links,
        } = release;

        for (entry, (link, received)) in released.iter().zip(links) {
            inbound::unlink(self.db, entry.delegatee, delegator, link);
            self.db.set_edge_amount(delegator, entry.delegatee, 0);
            self.db.set_amount_received(entry.delegatee, received);
        }
        let members: Vec<_> = released.iter().map(|entry| entry.delegatee).collect();
        outbound::clear(self.db, delegator, &members);
        self.db.set_amount_delegated(delegator, 0);

        info!(%delegator, edges = released.len(), amount = %total, "undelegated all");

        released
    }
}

/// Every write needed to release all delegations of one account, validated but not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAll {
    delegator: AccountId,
    total: Amount,
    released: Vec<Undelegated>,
    links: Vec<(InboundLink, Amount)>,
}

impl ReleaseAll {
    /// The edges that will be released.
    pub fn released(&self) -> &[Undelegated] {
        &self.released
    }
}

/// Upper bound on list length when walking, which turns a cyclic (corrupted) list into an error
/// instead of an endless loop.
#[cfg(not(test))]
pub(crate) const MAX_WALK: usize = 1 << 24;

#[cfg(test)]
pub(crate) const MAX_WALK: usize = 1 << 10;

fn corrupted_total(side: &str, who: &AccountId) -> RegistryError {
    RegistryError::Corrupted(format!("cached {side} total of {who} is below its edges"))
}
