//! Storage interfaces for the ledger and an in-memory implementation of them.
//!
//! The traits expose the persistent state as plain key-value accessors. They are synchronous and
//! infallible: every ledger operation runs as a single serialized unit, validates everything up
//! front and then writes, so a write must never be able to fail halfway through.

pub mod delegation;
pub mod inmemory;
pub mod stake;

pub use delegation::{DelegationDb, InboundLink, OutboundLink};
pub use inmemory::LedgerInMemory;
pub use stake::{StakeDb, StakeRecord};
