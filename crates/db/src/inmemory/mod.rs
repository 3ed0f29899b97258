//! In-memory implementations of the storage traits.

pub mod ledger;

pub use ledger::LedgerInMemory;
