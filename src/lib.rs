//! Frequent itemset and association rule mining with the level-wise
//! Apriori algorithm.
//!
//! ```no_run
//! use freqmine::{Apriori, TransactionStore};
//!
//! # fn main() -> freqmine::Result<()> {
//! let store = TransactionStore::from_path("baskets.csv", ',')?;
//! let mined = Apriori::new(0.1, 0.4)?.mine(store);
//!
//! for rule in mined.generate_rules() {
//!     println!("{}", rule);
//! }
//! let rules_for_milk = mined.rules_for("milk")?;
//! # let _ = rules_for_milk;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod itemsets;
pub mod rules;
pub mod transactions;
pub mod types;

use std::collections::HashMap;

use tracing::info;

pub use crate::error::{Error, Result};
pub use crate::itemsets::{count_support, generate_candidates, CountIndex};
pub use crate::rules::Rule;
pub use crate::transactions::TransactionStore;
pub use crate::types::{FrequentItemsets, ItemId, Itemset};

/// Mining parameters. Thresholds are fractions in [0, 1].
#[derive(Debug, Clone)]
pub struct Apriori {
    min_support: f32,
    min_confidence: f32,
    max_len: Option<usize>,
}

impl Apriori {
    pub fn new(min_support: f32, min_confidence: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&min_support) {
            return Err(Error::invalid_parameter(
                "min_support",
                format!("{} is outside [0, 1]", min_support),
            ));
        }
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(Error::invalid_parameter(
                "min_confidence",
                format!("{} is outside [0, 1]", min_confidence),
            ));
        }

        Ok(Self {
            min_support,
            min_confidence,
            max_len: None,
        })
    }

    /// Cap the size of mined itemsets. By default mining runs until a level
    /// comes up empty.
    pub fn with_max_len(mut self, max_len: usize) -> Result<Self> {
        if max_len < 1 {
            return Err(Error::invalid_parameter("max_len", "must be at least 1"));
        }
        self.max_len = Some(max_len);
        Ok(self)
    }

    /// Run the level-wise miner over a transaction store.
    pub fn mine(&self, store: TransactionStore) -> Mined {
        let mut index = CountIndex::new();
        let frequent =
            itemsets::generate_frequent_itemsets(&store, self.min_support, self.max_len, &mut index);

        info!(
            transactions = store.len(),
            levels = frequent.len(),
            counted_itemsets = index.len(),
            "mining finished"
        );

        Mined {
            store,
            frequent,
            index,
            min_confidence: self.min_confidence,
        }
    }
}

/// The finished result of a mining run: the frequent set table, the count
/// index accumulated while building it, and the store itself. Read-only.
#[derive(Debug)]
pub struct Mined {
    store: TransactionStore,
    frequent: FrequentItemsets,
    index: CountIndex,
    min_confidence: f32,
}

impl Mined {
    /// Level -> frequent itemsets of that size, with their support counts.
    pub fn frequent_itemsets(&self) -> &FrequentItemsets {
        &self.frequent
    }

    pub fn count_index(&self) -> &CountIndex {
        &self.index
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    /// Support fraction of an itemset, if it was ever counted.
    pub fn support(&self, itemset: &[ItemId]) -> Option<f32> {
        self.index.support(itemset, self.store.len())
    }

    /// All rules with `consequent` on the right-hand side, mapped
    /// antecedent -> raw confidence. Filtering by a confidence threshold is
    /// left to the caller.
    pub fn rules_for(&self, consequent: &str) -> Result<HashMap<Itemset, f32>> {
        let id = self
            .store
            .item_id(consequent)
            .ok_or_else(|| Error::UnknownItem(consequent.to_owned()))?;

        Ok(rules::rules_for(id, &self.index, self.store.transactions()))
    }

    /// Every rule meeting the configured minimum confidence, strongest
    /// first.
    pub fn generate_rules(&self) -> Vec<Rule> {
        rules::generate_rules(
            self.min_confidence,
            &self.frequent,
            &self.index,
            self.store.len(),
        )
    }

    /// Render a rule with the original item tokens.
    pub fn display_rule(&self, rule: &Rule) -> String {
        let names = |itemset: &[ItemId]| {
            let mut names: Vec<&str> = itemset
                .iter()
                .filter_map(|&id| self.store.item_name(id))
                .collect();
            names.sort_unstable();
            names.join(", ")
        };
        format!(
            "{{{}}} => {{{}}} (confidence {:.3}, lift {:.3})",
            names(&rule.antecedent),
            names(&rule.consequent),
            rule.confidence,
            rule.lift,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_support_outside_unit_interval_is_rejected() {
        assert!(matches!(
            Apriori::new(1.5, 0.4),
            Err(Error::InvalidParameter { name: "min_support", .. })
        ));
        assert!(matches!(
            Apriori::new(-0.1, 0.4),
            Err(Error::InvalidParameter { name: "min_support", .. })
        ));
    }

    #[test]
    fn min_confidence_outside_unit_interval_is_rejected() {
        assert!(matches!(
            Apriori::new(0.4, 7.0),
            Err(Error::InvalidParameter { name: "min_confidence", .. })
        ));
    }

    #[test]
    fn zero_max_len_is_rejected() {
        assert!(Apriori::new(0.4, 0.4).unwrap().with_max_len(0).is_err());
        assert!(Apriori::new(0.4, 0.4).unwrap().with_max_len(1).is_ok());
    }

    #[test]
    fn boundary_thresholds_are_accepted() {
        assert!(Apriori::new(0.0, 0.0).is_ok());
        assert!(Apriori::new(1.0, 1.0).is_ok());
    }

    #[test]
    fn rules_for_an_unknown_item_fails() {
        let store = TransactionStore::from_rows(vec![vec!["a", "b"]]);
        let mined = Apriori::new(0.1, 0.1).unwrap().mine(store);

        assert!(matches!(
            mined.rules_for("zzz"),
            Err(Error::UnknownItem(name)) if name == "zzz"
        ));
    }

    #[test]
    fn display_rule_uses_item_names() {
        let store = TransactionStore::from_rows(vec![
            vec!["bread", "milk"],
            vec!["bread", "milk"],
            vec!["bread"],
        ]);
        let mined = Apriori::new(0.5, 0.5).unwrap().mine(store);
        let rules = mined.generate_rules();

        let rendered: Vec<String> = rules.iter().map(|rule| mined.display_rule(rule)).collect();
        assert!(rendered
            .iter()
            .any(|line| line.starts_with("{milk} => {bread}")));
    }
}
