//! Exhaustive consistency checks over the stored lists.
//!
//! These walk whole lists and are meant for tests and offline audits, never for the hot path.

use std::collections::HashSet;

use weightlock_db::DelegationDb;
use weightlock_primitives::{AccountId, Amount};

use crate::{
    errors::{RegistryError, RegistryResult},
    inbound, outbound,
    registry::MAX_WALK,
};

/// Checks both lists owned by `account` against the edge amounts and the cached totals.
///
/// For the outbound list: every member has a non-zero edge, appears in the member's inbound list,
/// and the edges sum to `amount_delegated`. For the inbound list: `prev` mirrors `next`, every
/// member has a non-zero edge and an outbound entry, and the edges sum to `amount_received`.
pub fn check_account<D: DelegationDb>(db: &D, account: &AccountId) -> RegistryResult<()> {
    let corrupted = |what: String| Err(RegistryError::Corrupted(format!("{account}: {what}")));

    let mut seen = HashSet::new();
    let mut sum: Amount = 0;
    let mut cursor = AccountId::HEAD;
    loop {
        let Some(next) = outbound::next_of(db, account, &cursor) else {
            return corrupted(format!("outbound list breaks after {cursor}"));
        };
        if next == AccountId::TAIL {
            break;
        }
        if next.is_reserved() || !seen.insert(next) || seen.len() > MAX_WALK {
            return corrupted(format!("outbound list repeats or holds a reserved id at {next}"));
        }

        let edge = db.edge_amount(account, &next);
        if edge == 0 {
            return corrupted(format!("outbound entry {next} has no edge"));
        }
        if db.inbound_link(&next, account).is_none() {
            return corrupted(format!("missing from the inbound list of {next}"));
        }

        sum = sum.checked_add(edge).ok_or(RegistryError::Overflow)?;
        cursor = next;
    }
    if sum != db.amount_delegated(account) {
        return corrupted(format!(
            "outbound edges sum to {sum}, cached total is {}",
            db.amount_delegated(account)
        ));
    }

    let mut seen = HashSet::new();
    let mut sum: Amount = 0;
    let mut cursor = AccountId::HEAD;
    loop {
        let Some(next) = inbound::next_of(db, account, &cursor) else {
            return corrupted(format!("inbound list breaks after {cursor}"));
        };
        if inbound::prev_of(db, account, &next) != Some(cursor) {
            return corrupted(format!("inbound prev of {next} does not point at {cursor}"));
        }
        if next == AccountId::TAIL {
            break;
        }
        if next.is_reserved() || !seen.insert(next) || seen.len() > MAX_WALK {
            return corrupted(format!("inbound list repeats or holds a reserved id at {next}"));
        }

        let edge = db.edge_amount(&next, account);
        if edge == 0 {
            return corrupted(format!("inbound entry {next} has no edge"));
        }
        if db.outbound_link(&next, account).is_none() {
            return corrupted(format!("missing from the outbound list of {next}"));
        }

        sum = sum.checked_add(edge).ok_or(RegistryError::Overflow)?;
        cursor = next;
    }
    if sum != db.amount_received(account) {
        return corrupted(format!(
            "inbound edges sum to {sum}, cached total is {}",
            db.amount_received(account)
        ));
    }

    Ok(())
}

/// Runs [`check_account`] over every account in `accounts`.
pub fn check_accounts<D, I>(db: &D, accounts: I) -> RegistryResult<()>
where
    D: DelegationDb,
    I: IntoIterator<Item = AccountId>,
{
    accounts
        .into_iter()
        .try_for_each(|account| check_account(db, &account))
}
