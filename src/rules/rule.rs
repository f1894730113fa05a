use std::fmt::{Display, Formatter};

use crate::itemsets::index::CountIndex;
use crate::types::{ItemId, Itemset};

/// An association rule `antecedent => consequent` over a frequent itemset.
///
/// Antecedent and consequent are disjoint sorted id vectors; their union is
/// the pattern the rule was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    pub confidence: f32,
    pub lift: f32,
}

impl Rule {
    fn new(antecedent: Itemset, consequent: Itemset) -> Self {
        Self {
            antecedent,
            consequent,
            confidence: 0.0,
            lift: 0.0,
        }
    }

    /// The rules a pattern seeds the search with: one per item, that item
    /// alone as the consequent.
    pub fn seed_rules(pattern: &[ItemId]) -> Vec<Rule> {
        pattern
            .iter()
            .map(|&item| {
                let antecedent = pattern
                    .iter()
                    .copied()
                    .filter(|&other| other != item)
                    .collect();
                Rule::new(antecedent, vec![item])
            })
            .collect()
    }

    /// Rules one step more specialized: each antecedent item moved over to
    /// the consequent. An antecedent never shrinks to empty.
    pub fn derive_children(&self) -> Vec<Rule> {
        if self.antecedent.len() <= 1 {
            return Vec::new();
        }

        self.antecedent
            .iter()
            .map(|&moved| {
                let antecedent: Itemset = self
                    .antecedent
                    .iter()
                    .copied()
                    .filter(|&item| item != moved)
                    .collect();
                let mut consequent = self.consequent.clone();
                let pos = match consequent.binary_search(&moved) {
                    Ok(pos) | Err(pos) => pos,
                };
                consequent.insert(pos, moved);
                Rule::new(antecedent, consequent)
            })
            .collect()
    }

    /// The frequent itemset this rule splits.
    pub fn pattern(&self) -> Itemset {
        let mut pattern: Itemset = self
            .antecedent
            .iter()
            .chain(self.consequent.iter())
            .copied()
            .collect();
        pattern.sort_unstable();
        pattern
    }

    /// Fill in confidence and lift from recorded counts. Returns false when
    /// a needed count is missing or the antecedent count is zero; such a
    /// rule is undefined and gets skipped by the search.
    pub fn compute_confidence(&mut self, index: &CountIndex, n: usize) -> bool {
        let (Some(union_count), Some(antecedent_count), Some(consequent_count)) = (
            index.count(&self.pattern()),
            index.count(&self.antecedent),
            index.count(&self.consequent),
        ) else {
            return false;
        };
        if antecedent_count == 0 || consequent_count == 0 {
            return false;
        }

        self.confidence = union_count as f32 / antecedent_count as f32;
        self.lift =
            union_count as f32 * n as f32 / (antecedent_count as f32 * consequent_count as f32);
        true
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} => {:?} (confidence {:.3})",
            self.antecedent, self.consequent, self.confidence
        )
    }
}
