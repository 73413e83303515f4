//! Per-owner Pokedex: an unbalanced binary search tree keyed by record id.
//!
//! - `tree`: the tree engine (insert, exhaustive find, removal, merge)
//! - `order`: traversal orders and the name sort used for alphabetical display
pub mod order;
pub mod tree;

pub use order::{DisplayOrder, TraversalOrder};
pub use tree::{MergeReport, PokedexTree};
