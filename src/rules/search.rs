use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::itemsets::count::{count_support, is_subset};
use crate::itemsets::index::CountIndex;
use crate::rules::rule::Rule;
use crate::types::{FrequentItemsets, ItemId, Itemset, Transaction};

/// Enumerate every rule meeting `min_confidence` across all frequent
/// itemsets of size > 1.
pub fn generate_rules(
    min_confidence: f32,
    table: &FrequentItemsets,
    index: &CountIndex,
    n: usize,
) -> Vec<Rule> {
    let mut rules: Vec<Rule> = table
        .iter()
        .filter(|(&size, _)| size > 1)
        .flat_map(|(_, itemset_counts)| itemset_counts.keys())
        .flat_map(|pattern| bfs(pattern, min_confidence, index, n))
        .collect();

    rules.sort_by(|left, right| right.confidence.total_cmp(&left.confidence));
    debug!(rules = rules.len(), "generated rules");
    rules
}

/// Breadth-first search over one pattern's rules, growing the consequent one
/// item at a time.
///
/// Confidence only drops as items move from antecedent to consequent, so
/// once a rule fails the threshold every rule with a superset of its
/// consequent fails too; failed consequents go on a blacklist that prunes
/// the rest of the search.
fn bfs(pattern: &[ItemId], min_confidence: f32, index: &CountIndex, n: usize) -> Vec<Rule> {
    let mut queue: VecDeque<Rule> = Rule::seed_rules(pattern).into();
    let mut enqueued: HashSet<Itemset> = queue.iter().map(|rule| rule.consequent.clone()).collect();
    let mut blacklist: Vec<Itemset> = Vec::new();
    let mut kept = Vec::new();

    while let Some(mut rule) = queue.pop_front() {
        if blacklist
            .iter()
            .any(|failed| is_subset(failed, &rule.consequent))
        {
            continue;
        }

        if !rule.compute_confidence(index, n) {
            continue;
        }

        if rule.confidence >= min_confidence {
            for child in rule.derive_children() {
                if enqueued.insert(child.consequent.clone()) {
                    queue.push_back(child);
                }
            }
            kept.push(rule);
        } else {
            blacklist.push(rule.consequent);
        }
    }

    kept
}

/// All rules with the given single-item consequent, mapped
/// antecedent -> confidence.
///
/// Scans every recorded itemset of size > 1 containing the consequent.
/// Confidence is raw; filtering against a confidence threshold is the
/// caller's business. An antecedent whose count was never recorded is
/// recounted against the transactions; a zero-support antecedent makes the
/// rule undefined and it is skipped.
pub fn rules_for(
    consequent: ItemId,
    index: &CountIndex,
    transactions: &[Transaction],
) -> HashMap<Itemset, f32> {
    let mut rules = HashMap::new();

    for (itemset, count) in index.iter() {
        if itemset.len() < 2 {
            continue;
        }
        let pos = match itemset.binary_search(&consequent) {
            Ok(pos) => pos,
            Err(_) => continue,
        };

        let mut antecedent = itemset.clone();
        antecedent.remove(pos);

        let antecedent_count = index
            .count(&antecedent)
            .unwrap_or_else(|| count_support(&antecedent, transactions));
        if antecedent_count == 0 {
            continue;
        }

        rules.insert(antecedent, count as f32 / antecedent_count as f32);
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;

    /// Counts for [{a,b,c}, {a,b}, {a,c}, {b,c}, {a}] with a=0, b=1, c=2.
    fn scenario_index() -> CountIndex {
        let mut index = CountIndex::new();
        index.record(vec![0], 4);
        index.record(vec![1], 3);
        index.record(vec![2], 3);
        index.record(vec![0, 1], 2);
        index.record(vec![0, 2], 2);
        index.record(vec![1, 2], 2);
        index.record(vec![0, 1, 2], 1);
        index
    }

    fn scenario_table() -> FrequentItemsets {
        hashmap! {
            1 => hashmap! { vec![0] => 4, vec![1] => 3, vec![2] => 3 },
            2 => hashmap! { vec![0, 1] => 2, vec![0, 2] => 2, vec![1, 2] => 2 },
            3 => hashmap! {},
        }
    }

    #[test]
    fn rules_for_maps_antecedents_to_raw_confidence() {
        let index = scenario_index();
        let rules = rules_for(2, &index, &[]);

        assert_eq!(rules.len(), 3);
        assert!((rules[&vec![0]] - 0.5).abs() < f32::EPSILON);
        assert!((rules[&vec![1]] - 2.0 / 3.0).abs() < f32::EPSILON);
        assert!((rules[&vec![0, 1]] - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn rules_for_recounts_missing_antecedents() {
        let mut index = CountIndex::new();
        // {a,b} was counted but {a} never was.
        index.record(vec![0, 1], 2);
        let transactions: Vec<Transaction> = vec![vec![0, 1], vec![0, 1], vec![0], vec![0]];

        let rules = rules_for(1, &index, &transactions);

        assert_eq!(rules.len(), 1);
        assert!((rules[&vec![0]] - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn rules_for_skips_zero_support_antecedents() {
        let mut index = CountIndex::new();
        index.record(vec![0], 0);
        index.record(vec![0, 1], 0);

        let rules = rules_for(1, &index, &[]);

        assert!(rules.is_empty());
    }

    #[test]
    fn rules_for_an_item_absent_from_every_counted_itemset() {
        let index = scenario_index();
        let rules = rules_for(9, &index, &[]);
        assert!(rules.is_empty());
    }

    #[test]
    fn generate_rules_filters_by_confidence() {
        let index = scenario_index();
        let table = scenario_table();

        let rules = generate_rules(0.6, &table, &index, 5);

        // the four pair rules with confidence 2/3; the two a => x rules sit
        // at 0.5 and fail the threshold
        assert_eq!(rules.len(), 4);
        assert!(rules
            .iter()
            .all(|rule| (rule.confidence - 2.0 / 3.0).abs() < f32::EPSILON));
        assert!(rules
            .iter()
            .any(|rule| rule.antecedent == vec![1] && rule.consequent == vec![0]));
        assert!(!rules
            .iter()
            .any(|rule| rule.antecedent == vec![0] && rule.consequent == vec![1]));
    }

    #[test]
    fn generate_rules_orders_by_descending_confidence() {
        let index = scenario_index();
        let table = scenario_table();

        let rules = generate_rules(0.0, &table, &index, 5);

        assert!(rules
            .windows(2)
            .all(|pair| pair[0].confidence >= pair[1].confidence));
    }

    #[test]
    fn blacklisted_consequents_prune_their_specializations() {
        // b alone fails min_confidence from {a,b,c}, so {b,c} and {a,b} as
        // consequents must never be reported either.
        let mut index = CountIndex::new();
        index.record(vec![0], 10);
        index.record(vec![1], 10);
        index.record(vec![2], 10);
        index.record(vec![0, 1], 8);
        index.record(vec![0, 2], 8);
        index.record(vec![1, 2], 8);
        index.record(vec![0, 1, 2], 2);

        let table = hashmap! {
            1 => hashmap! { vec![0] => 10, vec![1] => 10, vec![2] => 10 },
            2 => hashmap! { vec![0, 1] => 8, vec![0, 2] => 8, vec![1, 2] => 8 },
            3 => hashmap! { vec![0, 1, 2] => 2 },
        };

        let rules = generate_rules(0.5, &table, &index, 10);

        // pair rules: 8/10 each; triple seeds: 2/8 each, all blacklisted,
        // so nothing with a multi-item consequent survives
        assert_eq!(rules.len(), 6);
        assert!(rules.iter().all(|rule| rule.consequent.len() == 1));
    }
}
