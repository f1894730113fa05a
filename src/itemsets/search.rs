use std::collections::HashSet;

use itertools::Itertools;

use crate::types::{ItemId, Itemset};

/// Generate the candidate itemsets of size `target_size` as the distinct
/// pairwise unions of the previous level's frequent itemsets.
///
/// Joining only itemsets already verified frequent is what keeps the
/// candidate space small: an itemset with an infrequent subset can never be
/// produced here, so it is never counted. Unions of the wrong size (pairs
/// overlapping in fewer or more items than `target_size` requires) are
/// discarded; duplicate unions collapse by content.
pub fn generate_candidates(frequent: &[Itemset], target_size: usize) -> Vec<Itemset> {
    let mut seen: HashSet<Itemset> = HashSet::new();
    let mut candidates = Vec::new();

    for (left, right) in frequent.iter().tuple_combinations() {
        let union = merged_union(left, right);
        if union.len() == target_size && seen.insert(union.clone()) {
            candidates.push(union);
        }
    }

    candidates
}

/// Union of two sorted id vectors, itself sorted.
fn merged_union(left: &[ItemId], right: &[ItemId]) -> Itemset {
    let mut union = Itemset::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Less => {
                union.push(left[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                union.push(right[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                union.push(left[i]);
                i += 1;
                j += 1;
            }
        }
    }
    union.extend_from_slice(&left[i..]);
    union.extend_from_slice(&right[j..]);

    union
}
