//! This module defines the [`DelegationDb`] trait, which holds the state owned by the delegation
//! registry.
//!
//! Two families of lists are stored, both anchored by the [`AccountId::HEAD`] and
//! [`AccountId::TAIL`] sentinels:
//!
//! - the *inbound* list of a delegatee, keyed by delegatee and holding one doubly-linked
//!   [`InboundLink`] per delegator (plus one for each sentinel);
//! - the *outbound* list of a delegator, keyed by delegator and holding one singly-linked
//!   [`OutboundLink`] per delegatee (plus one for `HEAD`).
//!
//! The storage layer knows nothing about list shape; keeping the links consistent is the job of
//! the registry.

use serde::{Deserialize, Serialize};
use weightlock_primitives::{AccountId, Amount};

/// Neighbours of an entry in an inbound (per-delegatee) list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundLink {
    /// The previous entry, or [`AccountId::HEAD`].
    pub prev: AccountId,

    /// The next entry, or [`AccountId::TAIL`].
    pub next: AccountId,
}

/// Successor of an entry in an outbound (per-delegator) list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundLink {
    /// The next entry, or [`AccountId::TAIL`].
    pub next: AccountId,
}

/// Interface to the delegation edges, the list links and the cached totals.
pub trait DelegationDb {
    /// Link of `who` in the inbound list of `delegatee`.
    fn inbound_link(&self, delegatee: &AccountId, who: &AccountId) -> Option<InboundLink>;

    /// Inserts or replaces the link of `who` in the inbound list of `delegatee`.
    fn put_inbound_link(&mut self, delegatee: AccountId, who: AccountId, link: InboundLink);

    /// Deletes the link of `who` in the inbound list of `delegatee`.
    fn remove_inbound_link(&mut self, delegatee: &AccountId, who: &AccountId);

    /// Link of `who` in the outbound list of `delegator`.
    fn outbound_link(&self, delegator: &AccountId, who: &AccountId) -> Option<OutboundLink>;

    /// Inserts or replaces the link of `who` in the outbound list of `delegator`.
    fn put_outbound_link(&mut self, delegator: AccountId, who: AccountId, link: OutboundLink);

    /// Deletes the link of `who` in the outbound list of `delegator`.
    fn remove_outbound_link(&mut self, delegator: &AccountId, who: &AccountId);

    /// Amount delegated from `delegator` to `delegatee`; zero if there is no edge.
    fn edge_amount(&self, delegator: &AccountId, delegatee: &AccountId) -> Amount;

    /// Sets the edge amount. Setting zero erases the edge.
    fn set_edge_amount(&mut self, delegator: AccountId, delegatee: AccountId, amount: Amount);

    /// Cached sum of all edges leaving `delegator`.
    fn amount_delegated(&self, delegator: &AccountId) -> Amount;

    /// Sets the cached outbound total. Setting zero erases the entry.
    fn set_amount_delegated(&mut self, delegator: AccountId, amount: Amount);

    /// Cached sum of all edges arriving at `delegatee`.
    fn amount_received(&self, delegatee: &AccountId) -> Amount;

    /// Sets the cached inbound total. Setting zero erases the entry.
    fn set_amount_received(&mut self, delegatee: AccountId, amount: Amount);
}
