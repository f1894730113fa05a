use rayon::prelude::*;
use tracing::debug;

use crate::itemsets::index::CountIndex;
use crate::itemsets::search::generate_candidates;
use crate::transactions::TransactionStore;
use crate::types::{FrequentItemsets, ItemId, Itemset, ItemsetCounts, Transaction};

/// Number of transactions of which `candidate` is a subset. Full scan,
/// exact count.
pub fn count_support(candidate: &[ItemId], transactions: &[Transaction]) -> u32 {
    transactions
        .iter()
        .filter(|transaction| is_subset(candidate, transaction))
        .count() as u32
}

/// Subset test over two sorted id vectors.
pub(crate) fn is_subset(candidate: &[ItemId], transaction: &[ItemId]) -> bool {
    let mut items = transaction.iter();
    candidate.iter().all(|item| items.any(|other| other == item))
}

/// Count a whole level of candidates. Counting distinct candidates shares no
/// mutable state, so the level is counted in parallel; the collect is the
/// barrier the pruning step waits on.
fn count_level(candidates: Vec<Itemset>, transactions: &[Transaction]) -> Vec<(Itemset, u32)> {
    candidates
        .into_par_iter()
        .map(|candidate| {
            let count = count_support(&candidate, transactions);
            (candidate, count)
        })
        .collect()
}

/// Record a counted level into the index and keep the frequent part.
///
/// Every candidate's count goes into the index, sub-threshold ones included,
/// so rule extraction can reuse them without rescanning.
fn prune_level(
    counted: Vec<(Itemset, u32)>,
    n: usize,
    min_support: f32,
    index: &mut CountIndex,
) -> ItemsetCounts {
    let n = n as f32;
    let mut frequent = ItemsetCounts::new();

    for (candidate, count) in counted {
        if count as f32 / n >= min_support {
            frequent.insert(candidate.clone(), count);
        }
        index.record(candidate, count);
    }

    frequent
}

/// Level-wise Apriori mining over a transaction store.
///
/// Starts from the frequent single items, then repeatedly joins the previous
/// level's survivors into candidates, counts them, and prunes, until a level
/// comes up empty (or `max_len` caps the itemset size). The final empty
/// level is recorded in the returned table. All counts accumulate into
/// `index`.
pub fn generate_frequent_itemsets(
    store: &TransactionStore,
    min_support: f32,
    max_len: Option<usize>,
    index: &mut CountIndex,
) -> FrequentItemsets {
    let n = store.len();
    let transactions = store.transactions();
    let mut table = FrequentItemsets::new();

    // Level 1: every distinct item is a candidate.
    let singles: Vec<Itemset> = (0..store.num_items()).map(|item| vec![item]).collect();
    debug!(candidates = singles.len(), "counting level 1");
    let counted = count_level(singles, transactions);
    let frequent = prune_level(counted, n, min_support, index);
    debug!(frequent = frequent.len(), "pruned level 1");
    table.insert(1, frequent);

    let mut size = 2;
    loop {
        if table[&(size - 1)].is_empty() {
            break;
        }
        if matches!(max_len, Some(max) if size > max) {
            break;
        }

        let prev: Vec<Itemset> = table[&(size - 1)].keys().cloned().collect();
        let candidates = generate_candidates(&prev, size);
        debug!(level = size, candidates = candidates.len(), "counting level");

        let counted = count_level(candidates, transactions);
        let frequent = prune_level(counted, n, min_support, index);
        debug!(level = size, frequent = frequent.len(), "pruned level");

        table.insert(size, frequent);
        size += 1;
    }

    table
}
