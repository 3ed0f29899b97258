use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use weightlock_ledger::LedgerOp;
use weightlock_primitives::{AccountId, Amount, Timestamp};

/// A recorded sequence of operations together with the balances they start from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Journal {
    /// Underlying balances minted before the first entry.
    #[serde(default)]
    pub(crate) genesis: Vec<GenesisAccount>,

    /// The operations, in the order they are applied.
    pub(crate) entries: Vec<JournalEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct GenesisAccount {
    pub(crate) account: AccountId,

    pub(crate) balance: Amount,

    /// Allowance granted to the custodian; the whole balance if absent.
    #[serde(default)]
    pub(crate) allowance: Option<Amount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct JournalEntry {
    pub(crate) caller: AccountId,

    pub(crate) now: Timestamp,

    pub(crate) op: LedgerOp,
}

impl Journal {
    pub(crate) fn from_path(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read journal {}", path.display()))?;

        Self::from_json(&contents)
            .with_context(|| format!("failed to parse journal {}", path.display()))
    }

    pub(crate) fn from_json(s: &str) -> Result<Self, anyhow::Error> {
        Ok(serde_json::from_str(s)?)
    }
}
