//! Doubly-linked inbound lists: for each delegatee, the accounts delegating to it.
//!
//! Layout for a list owned by `D` holding `a` then `b`:
//!
//! ```text
//! HEAD{next: a} <-> a{prev: HEAD, next: b} <-> b{prev: a, next: TAIL} <-> TAIL{prev: b}
//! ```
//!
//! The sentinel links are stored under the [`AccountId::HEAD`]/[`AccountId::TAIL`] keys of the
//! same list and are erased again once the list is empty.

use tracing::trace;
use weightlock_db::{DelegationDb, InboundLink};
use weightlock_primitives::AccountId;

/// Link of the `HEAD` sentinel, or the empty-list link if absent.
fn head<D: DelegationDb>(db: &D, owner: &AccountId) -> InboundLink {
    db.inbound_link(owner, &AccountId::HEAD)
        .unwrap_or(EMPTY_SENTINEL)
}

/// Link of the `TAIL` sentinel, or the empty-list link if absent.
fn tail<D: DelegationDb>(db: &D, owner: &AccountId) -> InboundLink {
    db.inbound_link(owner, &AccountId::TAIL)
        .unwrap_or(EMPTY_SENTINEL)
}

/// Sentinel link of an empty list.
const EMPTY_SENTINEL: InboundLink = InboundLink {
    prev: AccountId::HEAD,
    next: AccountId::TAIL,
};

/// Returns the successor of `who` in the inbound list of `owner`, where `who` may be `HEAD`.
pub(crate) fn next_of<D: DelegationDb>(
    db: &D,
    owner: &AccountId,
    who: &AccountId,
) -> Option<AccountId> {
    if *who == AccountId::HEAD {
        return Some(head(db, owner).next);
    }

    db.inbound_link(owner, who).map(|link| link.next)
}

/// Returns the predecessor of `who` in the inbound list of `owner`, where `who` may be `TAIL`.
pub(crate) fn prev_of<D: DelegationDb>(
    db: &D,
    owner: &AccountId,
    who: &AccountId,
) -> Option<AccountId> {
    if *who == AccountId::TAIL {
        return Some(tail(db, owner).prev);
    }

    db.inbound_link(owner, who).map(|link| link.prev)
}

/// Rewrites the `next` pointer of `at`, which may be `HEAD`.
fn set_next<D: DelegationDb>(db: &mut D, owner: AccountId, at: AccountId, next: AccountId) {
    let mut link = if at == AccountId::HEAD {
        head(db, &owner)
    } else {
        db.inbound_link(&owner, &at).unwrap_or(EMPTY_SENTINEL)
    };
    link.next = next;
    db.put_inbound_link(owner, at, link);
}

/// Rewrites the `prev` pointer of `at`, which may be `TAIL`.
fn set_prev<D: DelegationDb>(db: &mut D, owner: AccountId, at: AccountId, prev: AccountId) {
    let mut link = if at == AccountId::TAIL {
        tail(db, &owner)
    } else {
        db.inbound_link(&owner, &at).unwrap_or(EMPTY_SENTINEL)
    };
    link.prev = prev;
    db.put_inbound_link(owner, at, link);
}

/// Inserts `who` at the front of the inbound list of `owner`.
///
/// `who` must not already be a member.
pub(crate) fn push_front<D: DelegationDb>(db: &mut D, owner: AccountId, who: AccountId) {
    let first = head(db, &owner).next;

    db.put_inbound_link(
        owner,
        who,
        InboundLink {
            prev: AccountId::HEAD,
            next: first,
        },
    );
    set_prev(db, owner, first, who);
    set_next(db, owner, AccountId::HEAD, who);

    trace!(%owner, %who, %first, "linked into inbound list");
}

/// Removes `who`, whose current link is `link`, from the inbound list of `owner`.
///
/// Runs in constant time using only the neighbours stored in `link`.
pub(crate) fn unlink<D: DelegationDb>(
    db: &mut D,
    owner: AccountId,
    who: AccountId,
    link: InboundLink,
) {
    set_next(db, owner, link.prev, link.next);
    set_prev(db, owner, link.next, link.prev);
    db.remove_inbound_link(&owner, &who);

    if head(db, &owner).next == AccountId::TAIL {
        db.remove_inbound_link(&owner, &AccountId::HEAD);
        db.remove_inbound_link(&owner, &AccountId::TAIL);
    }

    trace!(%owner, %who, prev = %link.prev, next = %link.next, "unlinked from inbound list");
}
