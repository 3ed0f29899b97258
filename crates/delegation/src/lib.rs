//! # Delegation registry
//!
//! Tracks which accounts delegate derived weight to which other accounts.
//!
//! Every delegation edge `(delegator, delegatee) -> amount` is represented three times:
//!
//! 1. in the edge-amount map;
//! 2. as an entry for `delegator` in the *inbound* list of `delegatee`;
//! 3. as an entry for `delegatee` in the *outbound* list of `delegator`.
//!
//! An edge exists if and only if all three agree and the amount is non-zero. Both lists are
//! sentinel-anchored linked lists laid over a key-value store (see
//! [`DelegationDb`](weightlock_db::DelegationDb)), which gives O(1) insertion and O(1) removal
//! without any native sequence type. The inbound list is doubly linked so an entry can be
//! removed knowing only its own key; the outbound list is singly linked and is only ever walked
//! in full when every delegation of an account is released at once.
//!
//! Callers may pass a *predecessor hint* when removing from the outbound list. A hint is only used
//! after checking that it really precedes the entry being removed; otherwise the predecessor is
//! found by scanning from the head of the list.

pub mod consistency;
pub mod errors;
mod inbound;
mod outbound;
pub mod query;
pub mod registry;

pub use errors::{RegistryError, RegistryResult};
pub use outbound::HintUse;
pub use registry::{Delegated, DelegationRegistry, ReleaseAll, Undelegated};
