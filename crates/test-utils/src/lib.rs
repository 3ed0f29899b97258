//! This crate provides test-utilities shared by the ledger crates.
//!
//! These utilities are mostly used to generate deterministic or arbitrary accounts for testing
//! purposes.

pub mod accounts;
pub mod arbitrary_generator;
