use std::collections::BTreeSet;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};
use weightlock_asset::InMemoryAsset;
use weightlock_db::LedgerInMemory;
use weightlock_ledger::{AccountState, Ledger, LedgerOp};
use weightlock_params::prelude::LedgerParams;
use weightlock_primitives::{AccountId, Amount, Timestamp};

use crate::{
    cli::ReplayArgs,
    journal::{Journal, JournalEntry},
    params::load_params,
};

type SimLedger = Ledger<LedgerInMemory, InMemoryAsset>;

/// What a replay ended with.
#[derive(Debug, Serialize)]
pub(crate) struct Summary {
    applied: usize,
    failures: Vec<Failure>,
    derived_supply: Amount,
    total_locked: Amount,
    custody: Amount,
    accounts: Vec<AccountSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<LedgerInMemory>,
}

#[derive(Debug, Serialize)]
struct Failure {
    index: usize,
    caller: AccountId,
    op: LedgerOp,
    error: String,
}

#[derive(Debug, Serialize)]
struct AccountSummary {
    account: AccountId,
    underlying: Amount,
    locked: Amount,
    derived_balance: Amount,
    amount_delegated: Amount,
    amount_received: Amount,
    delegatees: Vec<AccountId>,
    #[serde(flatten)]
    state: AccountState,
}

pub(crate) fn handle_replay(args: ReplayArgs) -> Result<()> {
    let ReplayArgs {
        journal,
        params,
        custodian,
        keep_going,
        dump_state,
    } = args;

    let params = load_params(params)?;
    let journal = Journal::from_path(journal)?;

    let summary = replay(params, custodian, &journal, keep_going, dump_state)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

/// Funds the genesis accounts and applies every journal entry in order.
pub(crate) fn replay(
    params: LedgerParams,
    custodian: AccountId,
    journal: &Journal,
    keep_going: bool,
    dump_state: bool,
) -> Result<Summary> {
    let mut ledger = Ledger::new(
        params,
        LedgerInMemory::new(),
        InMemoryAsset::new(custodian),
    )?;
    for genesis in &journal.genesis {
        let asset = ledger.asset_mut();
        asset
            .mint(genesis.account, genesis.balance)
            .with_context(|| format!("failed to fund {}", genesis.account))?;
        asset.approve_custodian(
            genesis.account,
            genesis.allowance.unwrap_or(genesis.balance),
        );
    }

    info!(
        genesis = journal.genesis.len(),
        entries = journal.entries.len(),
        "replaying journal"
    );

    let mut applied = 0;
    let mut failures = Vec::new();
    let mut now: Timestamp = 0;
    for (index, entry) in journal.entries.iter().enumerate() {
        let JournalEntry { caller, op, .. } = *entry;
        if entry.now < now {
            bail!("entry {index} goes back in time from {now} to {}", entry.now);
        }
        now = entry.now;

        match ledger.apply(caller, now, op) {
            Ok(event) => {
                applied += 1;
                info!(%index, %caller, ?event, "applied");
            }
            Err(err) if keep_going => {
                warn!(%index, %caller, ?op, %err, "operation failed");
                failures.push(Failure {
                    index,
                    caller,
                    op,
                    error: err.to_string(),
                });
            }
            Err(err) => {
                return Err(err).with_context(|| format!("entry {index} by {caller} failed"));
            }
        }
    }

    Ok(summarize(ledger, journal, now, applied, failures, dump_state))
}

fn summarize(
    ledger: SimLedger,
    journal: &Journal,
    now: Timestamp,
    applied: usize,
    failures: Vec<Failure>,
    dump_state: bool,
) -> Summary {
    let mut seen = BTreeSet::new();
    seen.extend(journal.genesis.iter().map(|genesis| genesis.account));
    for entry in &journal.entries {
        seen.insert(entry.caller);
        if let LedgerOp::Delegate { delegatee, .. } | LedgerOp::Undelegate { delegatee, .. } =
            entry.op
        {
            seen.insert(delegatee);
        }
    }
    seen.retain(|account| !account.is_reserved());

    let accounts = seen
        .into_iter()
        .map(|account| AccountSummary {
            account,
            underlying: ledger.asset().balance_of(&account),
            locked: ledger
                .stake_of(&account)
                .map_or(0, |stake| stake.locked_amount),
            derived_balance: ledger.derived_balance(&account),
            amount_delegated: ledger.amount_delegated(&account),
            amount_received: ledger.amount_received(&account),
            delegatees: ledger.delegatees_of(&account),
            state: ledger.account_state(&account, now),
        })
        .collect();

    let custody = ledger.asset().balance_of(&ledger.asset().custodian());
    let derived_supply = ledger.derived_supply();
    let total_locked = ledger.total_locked();
    let state = dump_state.then(|| ledger.into_parts().0);

    Summary {
        applied,
        failures,
        derived_supply,
        total_locked,
        custody,
        accounts,
        state,
    }
}
