//! This crate contains the general types and pure functions shared by every other crate in the
//! ledger workspace: account identities (including the reserved list markers), amounts,
//! timestamps and the fixed-point lock ratio used by the bonding curve.
//!
//! It lies at the bottom of the crate-hierarchy in this workspace i.e., it does not depend on any
//! other crate in this workspace.

pub mod account;
pub mod errors;
pub mod fixed;
pub mod types;

pub use account::AccountId;
pub use errors::PrimitiveError;
pub use fixed::{LockRatio, FIXED_POINT_SCALE};
pub use types::{Amount, Seconds, Timestamp};
