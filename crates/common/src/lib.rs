//! Crate includes reusable utils for the ledger's binaries that handle common behavior.
//! Such as initializing the tracing framework.

pub mod logging;

// Re-export tracing crate for convenience.
pub use tracing;
