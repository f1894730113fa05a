use std::collections::HashMap;

pub type ItemId = usize;
pub type Itemset = Vec<ItemId>;

pub type ReverseLookup = HashMap<String, ItemId>;
pub type Inventory = HashMap<ItemId, String>;

/// One input row, interned and sorted.
pub type Transaction = Vec<ItemId>;

pub type ItemsetCounts = HashMap<Itemset, u32>;

pub type ItemsetLength = usize;
pub type FrequentItemsets = HashMap<ItemsetLength, ItemsetCounts>;
