//! Traversal orders and the stable name sort shared by display and merge.

use std::fmt::{Display, Formatter};

/// Initial capacity of the buffer used to collect a whole tree.
pub const COLLECT_INITIAL_CAPACITY: usize = 5;
/// Additive growth step of that buffer once full.
pub const COLLECT_GROWTH: usize = 5;

/// Order in which a traversal visits the nodes of a tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Breadth first, siblings left before right.
    LevelOrder,
    /// Node, left, right.
    PreOrder,
    /// Left, node, right.
    InOrder,
    /// Left, right, node.
    PostOrder,
}

/// What the Pokedex pane shows: one of the traversals, or the name sort.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DisplayOrder {
    Traversal(TraversalOrder),
    Alphabetical,
}

impl DisplayOrder {
    pub const ALL: [DisplayOrder; 5] = [
        DisplayOrder::Traversal(TraversalOrder::LevelOrder),
        DisplayOrder::Traversal(TraversalOrder::PreOrder),
        DisplayOrder::Traversal(TraversalOrder::InOrder),
        DisplayOrder::Traversal(TraversalOrder::PostOrder),
        DisplayOrder::Alphabetical,
    ];

    /// Next order in menu sequence, wrapping around.
    pub fn cycle(self) -> Self {
        let idx = Self::ALL.iter().position(|o| *o == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayOrder::Traversal(TraversalOrder::LevelOrder) => "BFS (Level-Order)",
            DisplayOrder::Traversal(TraversalOrder::PreOrder) => "Pre-Order",
            DisplayOrder::Traversal(TraversalOrder::InOrder) => "In-Order",
            DisplayOrder::Traversal(TraversalOrder::PostOrder) => "Post-Order",
            DisplayOrder::Alphabetical => "Alphabetical (by name)",
        }
    }
}

impl Default for DisplayOrder {
    fn default() -> Self {
        DisplayOrder::Traversal(TraversalOrder::LevelOrder)
    }
}

impl Display for DisplayOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Push onto a collection buffer, growing it by a fixed step when full.
pub(crate) fn push_additive<T>(buf: &mut Vec<T>, item: T) {
    if buf.len() == buf.capacity() {
        buf.reserve_exact(COLLECT_GROWTH);
    }
    buf.push(item);
}

/// Bubble sort: swaps adjacent items only while `out_of_order(a, b)` holds,
/// so equal items keep their relative order.
pub fn bubble_sort_by<T, F>(items: &mut [T], mut out_of_order: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let mut swapped = true;
    while swapped {
        swapped = false;
        for i in 1..items.len() {
            if out_of_order(&items[i - 1], &items[i]) {
                items.swap(i - 1, i);
                swapped = true;
            }
        }
    }
}
