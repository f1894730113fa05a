use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Inventory, ItemId, ReverseLookup, Transaction};

const APPROX_NUM_UNIQUE_ITEMS: usize = 1024; // arbitrary

/// The transaction collection a mining run operates on.
///
/// Item tokens are interned to dense `ItemId`s on load; each transaction is
/// kept as a sorted, duplicate-free id vector. The store is immutable once
/// built.
#[derive(Debug, Default)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    inventory: Inventory,
    reverse_lookup: ReverseLookup,
}

impl TransactionStore {
    /// Load from a delimited text file, one transaction per row.
    pub fn from_path(path: impl AsRef<Path>, delimiter: char) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), delimiter)
    }

    /// Load from any buffered reader, one transaction per row, fields split
    /// on `delimiter`. Blank rows are skipped; duplicate tokens within a row
    /// collapse. Rows that are not valid UTF-8 fail with a format error.
    pub fn from_reader(mut reader: impl BufRead, delimiter: char) -> Result<Self> {
        let mut store = Self::default();
        let mut buf = String::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            line_no += 1;
            match reader.read_line(&mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    return Err(Error::format(line_no, "row is not valid UTF-8"));
                }
                Err(e) => return Err(e.into()),
            }

            let row = buf.trim_end_matches(&['\n', '\r'][..]);
            if row.is_empty() {
                continue;
            }

            let tokens = row.split(delimiter).map(str::trim);
            store.push_row(tokens);
        }

        debug!(
            transactions = store.transactions.len(),
            unique_items = store.inventory.len(),
            "loaded transaction store"
        );

        Ok(store)
    }

    /// Build a store from already-tokenized rows. Mostly useful to library
    /// callers that do their own input handling.
    pub fn from_rows<R, T>(rows: R) -> Self
    where
        R: IntoIterator<Item = T>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let mut store = Self::default();
        for row in rows {
            store.push_row(row);
        }
        store
    }

    fn push_row<T>(&mut self, tokens: T)
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let mut transaction: Transaction = tokens
            .into_iter()
            .filter(|token| !token.as_ref().is_empty())
            .map(|token| self.intern(token.as_ref()))
            .collect();
        transaction.sort_unstable();
        transaction.dedup();
        self.transactions.push(transaction);
    }

    fn intern(&mut self, token: &str) -> ItemId {
        if let Some(&id) = self.reverse_lookup.get(token) {
            return id;
        }
        let id = self.inventory.len();
        if self.reverse_lookup.is_empty() {
            self.reverse_lookup.reserve(APPROX_NUM_UNIQUE_ITEMS);
        }
        self.reverse_lookup.insert(token.to_owned(), id);
        self.inventory.insert(id, token.to_owned());
        id
    }

    /// Number of transactions, the `N` of every support fraction.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Number of distinct items across all transactions. Ids are dense, so
    /// the item universe is `0..num_items()`.
    pub fn num_items(&self) -> usize {
        self.inventory.len()
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.reverse_lookup.get(name).copied()
    }

    pub fn item_name(&self, id: ItemId) -> Option<&str> {
        self.inventory.get(&id).map(String::as_str)
    }
}
