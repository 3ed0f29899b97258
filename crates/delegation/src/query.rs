//! Read-only accessors consumed by the ledger and by the governance collaborator.

use weightlock_db::DelegationDb;
use weightlock_primitives::{AccountId, Amount};

use crate::{inbound, outbound, registry::MAX_WALK};

/// Cached sum of all edges leaving `delegator`.
pub fn amount_delegated<D: DelegationDb>(db: &D, delegator: &AccountId) -> Amount {
    db.amount_delegated(delegator)
}

/// Cached sum of all edges arriving at `delegatee`.
pub fn amount_received<D: DelegationDb>(db: &D, delegatee: &AccountId) -> Amount {
    db.amount_received(delegatee)
}

/// Amount on the edge `delegator -> delegatee`; zero if there is none.
pub fn delegation_amount<D: DelegationDb>(
    db: &D,
    delegator: &AccountId,
    delegatee: &AccountId,
) -> Amount {
    db.edge_amount(delegator, delegatee)
}

/// Whether `delegator` appears in the inbound list of `delegatee`.
pub fn is_delegator_of<D: DelegationDb>(
    db: &D,
    delegator: &AccountId,
    delegatee: &AccountId,
) -> bool {
    !delegator.is_reserved() && db.inbound_link(delegatee, delegator).is_some()
}

/// Whether `delegatee` appears in the outbound list of `delegator`.
pub fn is_delegatee_of<D: DelegationDb>(
    db: &D,
    delegatee: &AccountId,
    delegator: &AccountId,
) -> bool {
    !delegatee.is_reserved() && db.outbound_link(delegator, delegatee).is_some()
}

/// Accounts delegating to `delegatee`, most recent first.
pub fn delegators_of<D: DelegationDb>(db: &D, delegatee: &AccountId) -> Vec<AccountId> {
    walk(|who| inbound::next_of(db, delegatee, who))
}

/// Accounts `delegator` delegates to, most recent first.
pub fn delegatees_of<D: DelegationDb>(db: &D, delegator: &AccountId) -> Vec<AccountId> {
    walk(|who| outbound::next_of(db, delegator, who))
}

/// Follows `next` from `HEAD` until `TAIL`, a missing link or [`MAX_WALK`] steps.
pub(crate) fn walk(next: impl Fn(&AccountId) -> Option<AccountId>) -> Vec<AccountId> {
    let mut members = Vec::new();
    let mut cursor = AccountId::HEAD;

    while let Some(following) = next(&cursor) {
        if following == AccountId::TAIL || members.len() >= MAX_WALK {
            break;
        }
        members.push(following);
        cursor = following;
    }

    members
}
