//! The Pokedex tree engine.
//!
//! Nodes own their children through `Option<Box<Node>>`; there is no parent
//! pointer. Removal finds the matching slot by threading the parent's link
//! through the recursion, and the owner of the tree holds the root slot.

use std::collections::VecDeque;

use tracing::debug;

use crate::catalog::Record;
use crate::error::PokedexError;
use crate::pokedex::order::{
    COLLECT_INITIAL_CAPACITY, TraversalOrder, bubble_sort_by, push_additive,
};

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    record: Record,
    left: Link,
    right: Link,
}

impl Node {
    fn new(record: Record) -> Box<Self> {
        Box::new(Self { record, left: None, right: None })
    }
}

/// Result of absorbing one tree into another.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Ids moved into the target, in the order they were inserted.
    pub moved: Vec<u32>,
    /// Ids the target already held; the source copies were dropped.
    pub discarded: Vec<u32>,
}

/// One owner's collection of records, ordered by id.
#[derive(Debug, Default)]
pub struct PokedexTree {
    root: Link,
    len: usize,
}

impl PokedexTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree holding a single record, as created with a starter.
    pub fn with_record(record: Record) -> Self {
        Self { root: Some(Node::new(record)), len: 1 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root_id(&self) -> Option<u32> {
        self.root.as_ref().map(|n| n.record.id)
    }

    /// Insert a record after checking the id is not already present.
    pub fn insert(&mut self, record: Record) -> Result<(), PokedexError> {
        let id = record.id;
        if self.contains(id) {
            return Err(PokedexError::DuplicateKey(id));
        }
        self.root = insert_node(self.root.take(), Node::new(record));
        self.len += 1;
        debug!(id, len = self.len, "inserted record");
        Ok(())
    }

    /// Look up a record by id, visiting every node breadth first.
    ///
    /// The search does not prune by key, so it still finds a record if the
    /// ordering invariant is ever locally broken.
    pub fn find(&self, id: u32) -> Option<&Record> {
        let mut queue: VecDeque<&Node> = self.root.as_deref().into_iter().collect();
        while let Some(node) = queue.pop_front() {
            if node.record.id == id {
                return Some(&node.record);
            }
            queue.extend(node.left.as_deref());
            queue.extend(node.right.as_deref());
        }
        None
    }

    pub fn contains(&self, id: u32) -> bool {
        self.find(id).is_some()
    }

    /// Remove the record with `id` and hand it back.
    ///
    /// A node with two children is replaced by its right subtree, and the
    /// left subtree is re-inserted into that promoted subtree.
    pub fn remove(&mut self, id: u32) -> Result<Record, PokedexError> {
        if self.is_empty() {
            return Err(PokedexError::NotFound(id));
        }
        let node = detach(&mut self.root, id).ok_or(PokedexError::NotFound(id))?;
        self.len -= 1;
        debug!(id, len = self.len, "removed record");
        Ok(node.record)
    }

    /// Call `visit` on every record exactly once, in `order`.
    pub fn traverse<F>(&self, order: TraversalOrder, mut visit: F)
    where
        F: FnMut(&Record),
    {
        match order {
            TraversalOrder::LevelOrder => {
                let mut queue: VecDeque<&Node> = self.root.as_deref().into_iter().collect();
                while let Some(node) = queue.pop_front() {
                    visit(&node.record);
                    queue.extend(node.left.as_deref());
                    queue.extend(node.right.as_deref());
                }
            }
            TraversalOrder::PreOrder => pre_order(&self.root, &mut visit),
            TraversalOrder::InOrder => in_order(&self.root, &mut visit),
            TraversalOrder::PostOrder => post_order(&self.root, &mut visit),
        }
    }

    /// Records in traversal order.
    pub fn records(&self, order: TraversalOrder) -> Vec<&Record> {
        let mut out = Vec::with_capacity(self.len);
        collect(&self.root, order, &mut out);
        out
    }

    /// Every record, sorted by name. Ties keep post-order collection order.
    pub fn collect_sorted_by_name(&self) -> Vec<&Record> {
        let mut out = Vec::with_capacity(COLLECT_INITIAL_CAPACITY);
        collect(&self.root, TraversalOrder::PostOrder, &mut out);
        bubble_sort_by(&mut out, |a, b| a.name > b.name);
        out
    }

    /// Absorb `source` node by node. Ids already held here are dropped from
    /// the source; the source tree is consumed either way.
    pub fn merge_from(&mut self, source: PokedexTree) -> MergeReport {
        let mut nodes = Vec::with_capacity(COLLECT_INITIAL_CAPACITY);
        drain_post_order(source.root, &mut nodes);

        let mut report = MergeReport::default();
        for node in nodes {
            let id = node.record.id;
            if self.contains(id) {
                report.discarded.push(id);
                continue;
            }
            self.root = insert_node(self.root.take(), node);
            self.len += 1;
            report.moved.push(id);
        }
        debug!(
            moved = report.moved.len(),
            discarded = report.discarded.len(),
            len = self.len,
            "merged trees"
        );
        report
    }

    /// Drop every node, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let dropped = self.len;
        self.root = None;
        self.len = 0;
        dropped
    }
}

/// Plain BST insert by id; `node` may carry a whole subtree with it.
fn insert_node(link: Link, node: Box<Node>) -> Link {
    match link {
        None => Some(node),
        Some(mut root) => {
            if node.record.id < root.record.id {
                root.left = insert_node(root.left.take(), node);
            } else {
                root.right = insert_node(root.right.take(), node);
            }
            Some(root)
        }
    }
}

/// Find the slot holding `id`, unhook its node and splice the children back.
fn detach(slot: &mut Link, id: u32) -> Option<Box<Node>> {
    let node = slot.as_mut()?;
    if node.record.id != id {
        if let Some(found) = detach(&mut node.left, id) {
            return Some(found);
        }
        return detach(&mut node.right, id);
    }
    let mut node = slot.take()?;
    *slot = splice(node.left.take(), node.right.take());
    Some(node)
}

fn splice(left: Link, right: Link) -> Link {
    match (left, right) {
        (None, None) => None,
        (Some(l), None) => Some(l),
        (None, Some(r)) => Some(r),
        (Some(l), Some(r)) => insert_node(Some(r), l),
    }
}

fn pre_order<F: FnMut(&Record)>(link: &Link, visit: &mut F) {
    if let Some(node) = link {
        visit(&node.record);
        pre_order(&node.left, visit);
        pre_order(&node.right, visit);
    }
}

fn in_order<F: FnMut(&Record)>(link: &Link, visit: &mut F) {
    if let Some(node) = link {
        in_order(&node.left, visit);
        visit(&node.record);
        in_order(&node.right, visit);
    }
}

fn post_order<F: FnMut(&Record)>(link: &Link, visit: &mut F) {
    if let Some(node) = link {
        post_order(&node.left, visit);
        post_order(&node.right, visit);
        visit(&node.record);
    }
}

fn collect<'a>(link: &'a Link, order: TraversalOrder, out: &mut Vec<&'a Record>) {
    match order {
        TraversalOrder::LevelOrder => {
            let mut queue: VecDeque<&'a Node> = link.as_deref().into_iter().collect();
            while let Some(node) = queue.pop_front() {
                push_additive(out, &node.record);
                queue.extend(node.left.as_deref());
                queue.extend(node.right.as_deref());
            }
        }
        TraversalOrder::PreOrder => {
            if let Some(node) = link {
                push_additive(out, &node.record);
                collect(&node.left, order, out);
                collect(&node.right, order, out);
            }
        }
        TraversalOrder::InOrder => {
            if let Some(node) = link {
                collect(&node.left, order, out);
                push_additive(out, &node.record);
                collect(&node.right, order, out);
            }
        }
        TraversalOrder::PostOrder => {
            if let Some(node) = link {
                collect(&node.left, order, out);
                collect(&node.right, order, out);
                push_additive(out, &node.record);
            }
        }
    }
}

/// Take every node out of `link`, children cleared, in post-order.
fn drain_post_order(link: Link, out: &mut Vec<Box<Node>>) {
    if let Some(mut node) = link {
        drain_post_order(node.left.take(), out);
        drain_post_order(node.right.take(), out);
        push_additive(out, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::template;

    fn tree_of(ids: &[u32]) -> PokedexTree {
        let mut t = PokedexTree::new();
        for &id in ids {
            t.insert(template(id).unwrap()).unwrap();
        }
        t
    }

    fn ids(t: &PokedexTree, order: TraversalOrder) -> Vec<u32> {
        t.records(order).iter().map(|r| r.id).collect()
    }

    /// Check the strict BST property over the whole tree.
    fn assert_ordered(link: &Link, lo: Option<u32>, hi: Option<u32>) {
        if let Some(n) = link {
            let id = n.record.id;
            assert!(lo.is_none_or(|lo| id > lo), "{id} not above {lo:?}");
            assert!(hi.is_none_or(|hi| id < hi), "{id} not below {hi:?}");
            assert_ordered(&n.left, lo, Some(id));
            assert_ordered(&n.right, Some(id), hi);
        }
    }

    #[test]
    fn level_order_visits_by_depth() {
        let t = tree_of(&[5, 3, 8, 1, 4]);
        assert_eq!(ids(&t, TraversalOrder::LevelOrder), vec![5, 3, 8, 1, 4]);
        assert_eq!(ids(&t, TraversalOrder::PreOrder), vec![5, 3, 1, 4, 8]);
        assert_eq!(ids(&t, TraversalOrder::InOrder), vec![1, 3, 4, 5, 8]);
        assert_eq!(ids(&t, TraversalOrder::PostOrder), vec![1, 4, 3, 8, 5]);
    }

    #[test]
    fn traverse_matches_records() {
        let t = tree_of(&[10, 4, 20, 2, 6, 15]);
        for order in [
            TraversalOrder::LevelOrder,
            TraversalOrder::PreOrder,
            TraversalOrder::InOrder,
            TraversalOrder::PostOrder,
        ] {
            let mut seen = Vec::new();
            t.traverse(order, |r| seen.push(r.id));
            assert_eq!(seen, ids(&t, order));
        }
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut t = tree_of(&[5]);
        assert_eq!(t.insert(template(5).unwrap()), Err(PokedexError::DuplicateKey(5)));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn remove_leaf_and_single_child() {
        let mut t = tree_of(&[5, 3, 8, 1]);
        assert_eq!(t.remove(1).unwrap().id, 1);
        assert_eq!(ids(&t, TraversalOrder::LevelOrder), vec![5, 3, 8]);

        let mut t = tree_of(&[5, 3, 8, 1]);
        t.remove(3).unwrap();
        assert_eq!(ids(&t, TraversalOrder::LevelOrder), vec![5, 1, 8]);
    }

    #[test]
    fn remove_two_children_promotes_right_subtree() {
        let mut t = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        let removed = t.remove(5).unwrap();
        assert_eq!(removed.id, 5);
        assert_eq!(t.root_id(), Some(8));
        // The old left subtree hangs off the leftmost node of the right one.
        assert_eq!(ids(&t, TraversalOrder::LevelOrder), vec![8, 7, 9, 3, 1, 4]);
        assert_ordered(&t.root, None, None);
        assert_eq!(t.len(), 6);
    }

    #[test]
    fn remove_inner_two_children_node() {
        let mut t = tree_of(&[50, 30, 70, 20, 40, 35, 45]);
        t.remove(30).unwrap();
        assert_eq!(ids(&t, TraversalOrder::LevelOrder), vec![50, 40, 70, 35, 45, 20]);
        assert_ordered(&t.root, None, None);
    }

    #[test]
    fn remove_from_empty_reports_not_found() {
        let mut t = PokedexTree::new();
        assert_eq!(t.remove(7), Err(PokedexError::NotFound(7)));
        assert!(t.is_empty());
        let mut t = tree_of(&[1]);
        assert_eq!(t.remove(2), Err(PokedexError::NotFound(2)));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn find_is_exhaustive() {
        let mut t = tree_of(&[10, 5, 15]);
        // Break ordering on purpose: hang 99 on the left of 5.
        if let Some(root) = t.root.as_mut() {
            if let Some(left) = root.left.as_mut() {
                left.left = Some(Node::new(template(99).unwrap()));
            }
        }
        assert!(t.find(99).is_some());
    }

    #[test]
    fn sorted_by_name() {
        // Charmander(4), Bulbasaur(1), Squirtle(7), Abra(63)
        let t = tree_of(&[4, 1, 7, 63]);
        let names: Vec<&str> = t.collect_sorted_by_name().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Abra", "Bulbasaur", "Charmander", "Squirtle"]);
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn merge_moves_new_and_discards_duplicates() {
        let mut a = tree_of(&[1, 3]);
        let b = tree_of(&[3, 5]);
        let report = a.merge_from(b);
        assert_eq!(report.moved, vec![5]);
        assert_eq!(report.discarded, vec![3]);
        assert_eq!(ids(&a, TraversalOrder::InOrder), vec![1, 3, 5]);
        assert_eq!(a.len(), 3);
        assert_ordered(&a.root, None, None);
    }

    #[test]
    fn merge_into_empty_target() {
        let mut a = PokedexTree::new();
        let report = a.merge_from(tree_of(&[4, 2, 6]));
        assert_eq!(report.moved, vec![2, 6, 4]);
        assert_eq!(ids(&a, TraversalOrder::InOrder), vec![2, 4, 6]);
    }

    #[test]
    fn clear_counts_nodes() {
        let mut t = tree_of(&[2, 1, 3]);
        assert_eq!(t.clear(), 3);
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
    }
}
