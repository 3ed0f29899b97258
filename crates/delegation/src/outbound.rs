//! Singly-linked outbound lists: for each delegator, the accounts it delegates to.
//!
//! Only the `HEAD` sentinel is stored; the last entry points at [`AccountId::TAIL`]. Removing an
//! entry needs its predecessor, which is either supplied as a verified hint or found by walking
//! the list.

use tracing::{debug, trace};
use weightlock_db::{DelegationDb, OutboundLink};
use weightlock_primitives::AccountId;

use crate::{
    errors::{RegistryError, RegistryResult},
    registry::MAX_WALK,
};

/// How the predecessor of a removed outbound entry was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintUse {
    /// The caller's hint was verified and used directly.
    Trusted,

    /// The hint did not precede the entry, so the list was scanned from `HEAD`.
    Scanned,
}

/// Returns the successor of `who` in the outbound list of `owner`, where `who` may be `HEAD`.
pub(crate) fn next_of<D: DelegationDb>(
    db: &D,
    owner: &AccountId,
    who: &AccountId,
) -> Option<AccountId> {
    match db.outbound_link(owner, who) {
        Some(link) => Some(link.next),
        None if *who == AccountId::HEAD => Some(AccountId::TAIL),
        None => None,
    }
}

/// Inserts `who` at the front of the outbound list of `owner`.
///
/// `who` must not already be a member.
pub(crate) fn push_front<D: DelegationDb>(db: &mut D, owner: AccountId, who: AccountId) {
    let first = next_of(db, &owner, &AccountId::HEAD).unwrap_or(AccountId::TAIL);

    db.put_outbound_link(owner, who, OutboundLink { next: first });
    db.put_outbound_link(owner, AccountId::HEAD, OutboundLink { next: who });

    trace!(%owner, %who, %first, "linked into outbound list");
}

/// Whether `hint` is `HEAD` or a member of the outbound list of `owner`.
fn is_position<D: DelegationDb>(db: &D, owner: &AccountId, hint: &AccountId) -> bool {
    *hint == AccountId::HEAD || (!hint.is_reserved() && db.outbound_link(owner, hint).is_some())
}

/// Locates the predecessor of member `who` in the outbound list of `owner`.
///
/// `hint` is used only if it is a position in this very list whose successor is `who`. Any other
/// hint, including one taken from a different delegator's list, falls back to a walk from `HEAD`.
pub(crate) fn predecessor<D: DelegationDb>(
    db: &D,
    owner: &AccountId,
    who: &AccountId,
    hint: &AccountId,
) -> RegistryResult<(AccountId, HintUse)> {
    if is_position(db, owner, hint) && next_of(db, owner, hint) == Some(*who) {
        return Ok((*hint, HintUse::Trusted));
    }

    debug!(%owner, %who, %hint, "stale predecessor hint, scanning outbound list");

    let mut cursor = AccountId::HEAD;
    for _ in 0..=MAX_WALK {
        let next = next_of(db, owner, &cursor).ok_or_else(|| {
            RegistryError::Corrupted(format!("outbound list of {owner} is broken at {cursor}"))
        })?;

        if next == *who {
            return Ok((cursor, HintUse::Scanned));
        }
        if next == AccountId::TAIL {
            return Err(RegistryError::Corrupted(format!(
                "{who} is missing from the outbound list of {owner}"
            )));
        }

        cursor = next;
    }

    Err(RegistryError::Corrupted(format!(
        "outbound list of {owner} does not reach its tail"
    )))
}

/// Removes `who` from the outbound list of `owner`, splicing `pred.next` over it.
///
/// `pred` must be the verified predecessor returned by [`predecessor`] and `next` the current
/// successor of `who`.
pub(crate) fn unlink<D: DelegationDb>(
    db: &mut D,
    owner: AccountId,
    who: AccountId,
    pred: AccountId,
    next: AccountId,
) {
    db.remove_outbound_link(&owner, &who);

    if pred == AccountId::HEAD && next == AccountId::TAIL {
        db.remove_outbound_link(&owner, &AccountId::HEAD);
    } else {
        db.put_outbound_link(owner, pred, OutboundLink { next });
    }

    trace!(%owner, %who, %pred, %next, "unlinked from outbound list");
}

/// Drops every link of the outbound list of `owner`, given its members.
pub(crate) fn clear<D: DelegationDb>(db: &mut D, owner: AccountId, members: &[AccountId]) {
    for member in members {
        db.remove_outbound_link(&owner, member);
    }
    db.remove_outbound_link(&owner, &AccountId::HEAD);
}
