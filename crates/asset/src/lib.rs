//! The interface to the fungible asset that gets locked by the ledger, along with an in-memory
//! implementation of it.
//!
//! The ledger never owns the asset's books. It only asks the asset to *pull* funds from a caller
//! into its custody when a stake is opened or topped up, and to *push* funds back when a stake is
//! withdrawn.

pub mod errors;
pub mod inmemory;

pub use errors::{AssetError, AssetResult};
pub use inmemory::InMemoryAsset;
use weightlock_primitives::{AccountId, Amount};

/// A transferable balance ledger with allowance-style pulls.
///
/// Implementations must be all-or-nothing: a call that returns an error must not have moved any
/// funds.
pub trait UnderlyingAsset {
    /// Checks whether [`UnderlyingAsset::pull`] would succeed without moving any funds.
    fn check_pull(&self, from: AccountId, amount: Amount) -> AssetResult<()>;

    /// Moves `amount` from `from` into the ledger's custody.
    ///
    /// Fails with [`AssetError::InsufficientAllowance`] if `from` has not authorized the ledger to
    /// spend `amount`, or [`AssetError::InsufficientBalance`] if `from` does not hold it.
    fn pull(&mut self, from: AccountId, amount: Amount) -> AssetResult<()>;

    /// Checks whether [`UnderlyingAsset::push`] would succeed without moving any funds.
    fn check_push(&self, to: AccountId, amount: Amount) -> AssetResult<()>;

    /// Moves `amount` out of the ledger's custody to `to`.
    ///
    /// Must succeed whenever [`UnderlyingAsset::check_push`] succeeded for the same arguments and
    /// no funds have moved since.
    fn push(&mut self, to: AccountId, amount: Amount) -> AssetResult<()>;
}
