pub mod count;
pub mod index;
pub mod search;

pub use count::{count_support, generate_frequent_itemsets};
pub use index::CountIndex;
pub use search::generate_candidates;
