// Reconciliation merge of freshly classified events into stored wallet state.
//
// Identity is the operation group hash. A fresh record always supersedes a
// stored one with the same hash: a transaction observed first as pending may
// later resolve to applied or failed, and the chain's answer wins. The merge
// promises no output ordering beyond stability - display sorting belongs to
// the caller.

use std::collections::HashMap;

use crate::types::TokenTransaction;

/// Merge `new` into `existing`, de-duplicated by operation group hash.
///
/// Superseded entries are replaced in place, so relative order among
/// non-conflicting entries is preserved; genuinely new entries are appended
/// in batch order. Duplicate hashes inside `new` itself resolve last-wins.
pub fn sync_with_state(
    new: Vec<TokenTransaction>,
    existing: Vec<TokenTransaction>,
) -> Vec<TokenTransaction> {
    let mut merged: Vec<TokenTransaction> = Vec::with_capacity(existing.len() + new.len());
    let mut position: HashMap<String, usize> = HashMap::with_capacity(existing.len() + new.len());

    for tx in existing {
        match position.get(&tx.operation_group_hash) {
            // Stored state should already be hash-unique; if it is not,
            // collapse it here the same way fresh duplicates collapse.
            Some(&at) => merged[at] = tx,
            None => {
                position.insert(tx.operation_group_hash.clone(), merged.len());
                merged.push(tx);
            }
        }
    }

    for tx in new {
        match position.get(&tx.operation_group_hash) {
            Some(&at) => merged[at] = tx,
            None => {
                position.insert(tx.operation_group_hash.clone(), merged.len());
                merged.push(tx);
            }
        }
    }

    merged
}
