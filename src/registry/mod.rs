//! Owner registry: a circular doubly-linked ring of named owners.
//!
//! Owners live in an index arena; `next`/`prev` are slot indices, so an
//! [`OwnerId`] stays valid while the ring is re-linked or re-sorted. Once
//! its owner is removed the handle is dead: freed slots are reused under a
//! new generation, and stale handles resolve to nothing. The registry is
//! plain state passed by reference; nothing here is global.

use tracing::{debug, info};

use crate::error::PokedexError;
use crate::pokedex::PokedexTree;

/// Handle to an owner slot, tagged with the slot's generation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OwnerId {
    index: usize,
    generation: u32,
}

/// A named holder of one Pokedex.
#[derive(Debug)]
pub struct Owner {
    pub name: String,
    pub pokedex: PokedexTree,
}

impl Owner {
    pub fn new(name: impl Into<String>, pokedex: PokedexTree) -> Self {
        Self { name: name.into(), pokedex }
    }
}

#[derive(Debug)]
struct Slot {
    owner: Owner,
    generation: u32,
    next: usize,
    prev: usize,
    linked: bool,
}

/// Direction of a walk around the ring.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Circular registry of owners anchored at `head`.
#[derive(Debug, Default)]
pub struct OwnerRegistry {
    slots: Vec<Option<Slot>>,
    // Generation of the next owner stored in each slot.
    generations: Vec<u32>,
    free: Vec<usize>,
    head: Option<usize>,
    len: usize,
}

impl OwnerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of owners currently linked into the ring.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn head(&self) -> Option<OwnerId> {
        self.head.and_then(|idx| self.id_at(idx))
    }

    pub fn get(&self, id: OwnerId) -> Option<&Owner> {
        self.live(id).map(|s| &s.owner)
    }

    pub fn get_mut(&mut self, id: OwnerId) -> Option<&mut Owner> {
        self.live(id)?;
        self.slot_mut(id.index).map(|s| &mut s.owner)
    }

    pub fn next(&self, id: OwnerId) -> Option<OwnerId> {
        let next = self.live(id).filter(|s| s.linked)?.next;
        self.id_at(next)
    }

    pub fn prev(&self, id: OwnerId) -> Option<OwnerId> {
        let prev = self.live(id).filter(|s| s.linked)?.prev;
        self.id_at(prev)
    }

    /// Store `owner` and link it at the tail of the ring.
    pub fn insert(&mut self, owner: Owner) -> OwnerId {
        let name = owner.name.clone();
        let id = self.alloc(owner);
        self.link_slot(id.index);
        info!(owner = %name, len = self.len, "owner registered");
        id
    }

    /// Link a stored owner immediately before head. An empty ring makes it
    /// the head, pointing at itself. The head never moves on link.
    pub fn link(&mut self, id: OwnerId) -> Result<(), PokedexError> {
        match self.live(id) {
            Some(s) if !s.linked => {}
            _ => return Err(PokedexError::OwnerNotFound(format!("unlinked handle {}", id.index))),
        }
        self.link_slot(id.index);
        Ok(())
    }

    /// Unhook an owner from the ring without destroying it. Removing the
    /// head moves head to its successor; removing the last owner empties
    /// the ring.
    pub fn unlink(&mut self, id: OwnerId) -> Result<(), PokedexError> {
        let idx = id.index;
        let (next, prev) = match self.live(id) {
            Some(s) if s.linked => (s.next, s.prev),
            _ => return Err(PokedexError::OwnerNotFound(format!("linked handle {idx}"))),
        };
        if next == idx {
            self.head = None;
        } else {
            if let Some(s) = self.slot_mut(prev) {
                s.next = next;
            }
            if let Some(s) = self.slot_mut(next) {
                s.prev = prev;
            }
            if self.head == Some(idx) {
                self.head = Some(next);
            }
        }
        if let Some(s) = self.slot_mut(idx) {
            s.next = idx;
            s.prev = idx;
            s.linked = false;
        }
        self.len -= 1;
        debug!(slot = idx, len = self.len, "unlinked owner");
        Ok(())
    }

    /// Unlink (if needed) and take the owner out of the arena. The handle
    /// and every copy of it stop resolving.
    pub fn remove(&mut self, id: OwnerId) -> Result<Owner, PokedexError> {
        let linked = match self.live(id) {
            Some(s) => s.linked,
            None => return Err(PokedexError::OwnerNotFound(format!("handle {}", id.index))),
        };
        if linked {
            self.unlink(id)?;
        }
        let slot = self
            .slots
            .get_mut(id.index)
            .and_then(Option::take)
            .ok_or_else(|| PokedexError::OwnerNotFound(format!("handle {}", id.index)))?;
        if let Some(g) = self.generations.get_mut(id.index) {
            *g = g.wrapping_add(1);
        }
        self.free.push(id.index);
        Ok(slot.owner)
    }

    /// Owners in ring order, starting at head.
    pub fn iter(&self) -> RingIter<'_> {
        RingIter { registry: self, cursor: self.head, remaining: self.len }
    }

    pub fn ids(&self) -> Vec<OwnerId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|(_, o)| o.name.as_str()).collect()
    }

    /// Exact-match lookup, one revolution from head.
    pub fn find_by_name(&self, name: &str) -> Option<OwnerId> {
        self.iter().find(|(_, o)| o.name == name).map(|(id, _)| id)
    }

    /// 1-based position from head. Out-of-range positions yield `None`.
    pub fn find_by_position(&self, position: usize) -> Option<OwnerId> {
        if position == 0 || position > self.len {
            return None;
        }
        self.iter().nth(position - 1).map(|(id, _)| id)
    }

    /// 1-based position of `id` in ring order.
    pub fn position_of(&self, id: OwnerId) -> Option<usize> {
        self.iter().position(|(i, _)| i == id).map(|p| p + 1)
    }

    /// Owner with the smallest name; the first seen wins ties.
    pub fn find_min_by_name(&self) -> Option<OwnerId> {
        let mut min: Option<(OwnerId, &Owner)> = None;
        for (id, owner) in self.iter() {
            match min {
                Some((_, m)) if owner.name >= m.name => {}
                _ => min = Some((id, owner)),
            }
        }
        min.map(|(id, _)| id)
    }

    /// Re-order the ring by name with a selection sort: repeatedly unlink
    /// the minimum and append it to a new ring. Owners keep their handles
    /// and their Pokedexes; only ring positions change.
    pub fn sort_by_name(&mut self) -> Result<(), PokedexError> {
        if self.len < 2 {
            return Err(PokedexError::InsufficientMembers);
        }
        let mut sorted = Vec::with_capacity(self.len);
        while let Some(min) = self.find_min_by_name() {
            self.unlink(min)?;
            sorted.push(min);
        }
        for id in sorted {
            self.link(id)?;
        }
        info!(len = self.len, "owners sorted by name");
        Ok(())
    }

    /// `count` owners visited from head, stepping in `direction`, wrapping
    /// around the ring as many times as needed.
    pub fn walk(&self, direction: Direction, count: usize) -> Vec<OwnerId> {
        self.walk_iter(direction).take(count).collect()
    }

    /// Endless walk from head; empty when the ring is.
    pub fn walk_iter(&self, direction: Direction) -> WalkIter<'_> {
        WalkIter { registry: self, cursor: self.head, direction }
    }

    /// Destroy every owner and tree. Returns (owners, records) dropped.
    pub fn teardown(&mut self) -> (usize, usize) {
        let mut owners = 0;
        let mut records = 0;
        while let Some(head) = self.head() {
            match self.remove(head) {
                Ok(mut owner) => {
                    owners += 1;
                    records += owner.pokedex.clear();
                }
                Err(_) => break,
            }
        }
        self.slots.clear();
        self.generations.clear();
        self.free.clear();
        info!(owners, records, "registry torn down");
        (owners, records)
    }

    /// Link the slot at `idx` before head. Callers check it is stored and
    /// not yet linked.
    fn link_slot(&mut self, idx: usize) {
        let (next, prev) = match self.head {
            None => {
                self.head = Some(idx);
                (idx, idx)
            }
            Some(head) => {
                let tail = self.slot(head).map_or(head, |s| s.prev);
                if let Some(s) = self.slot_mut(tail) {
                    s.next = idx;
                }
                if let Some(s) = self.slot_mut(head) {
                    s.prev = idx;
                }
                (head, tail)
            }
        };
        if let Some(s) = self.slot_mut(idx) {
            s.next = next;
            s.prev = prev;
            s.linked = true;
        }
        self.len += 1;
        debug!(slot = idx, len = self.len, "linked owner");
    }

    fn alloc(&mut self, owner: Owner) -> OwnerId {
        let idx = match self.free.pop() {
            Some(idx) => idx,
            None => {
                self.slots.push(None);
                self.generations.push(0);
                self.slots.len() - 1
            }
        };
        let generation = self.generations.get(idx).copied().unwrap_or(0);
        if let Some(entry) = self.slots.get_mut(idx) {
            *entry = Some(Slot { owner, generation, next: idx, prev: idx, linked: false });
        }
        OwnerId { index: idx, generation }
    }

    fn slot(&self, idx: usize) -> Option<&Slot> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, idx: usize) -> Option<&mut Slot> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    /// The slot `id` names, if that owner is still stored.
    fn live(&self, id: OwnerId) -> Option<&Slot> {
        self.slot(id.index).filter(|s| s.generation == id.generation)
    }

    fn id_at(&self, idx: usize) -> Option<OwnerId> {
        self.slot(idx).map(|s| OwnerId { index: idx, generation: s.generation })
    }
}

/// Iterator stepping around the ring without end.
pub struct WalkIter<'a> {
    registry: &'a OwnerRegistry,
    cursor: Option<usize>,
    direction: Direction,
}

impl Iterator for WalkIter<'_> {
    type Item = OwnerId;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let slot = self.registry.slot(idx)?;
        self.cursor = Some(match self.direction {
            Direction::Forward => slot.next,
            Direction::Backward => slot.prev,
        });
        Some(OwnerId { index: idx, generation: slot.generation })
    }
}

/// Iterator over one revolution of the ring.
pub struct RingIter<'a> {
    registry: &'a OwnerRegistry,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for RingIter<'a> {
    type Item = (OwnerId, &'a Owner);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.cursor?;
        let slot = self.registry.slot(idx)?;
        self.remaining -= 1;
        self.cursor = Some(slot.next);
        Some((OwnerId { index: idx, generation: slot.generation }, &slot.owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_of(names: &[&str]) -> (OwnerRegistry, Vec<OwnerId>) {
        let mut reg = OwnerRegistry::new();
        let ids = names
            .iter()
            .map(|n| reg.insert(Owner::new(*n, PokedexTree::new())))
            .collect();
        (reg, ids)
    }

    /// Walk both directions and check they are exact reverses of each other.
    fn assert_ring_valid(reg: &OwnerRegistry) {
        let fwd = reg.walk(Direction::Forward, reg.len() + 1);
        let back = reg.walk(Direction::Backward, reg.len() + 1);
        if reg.is_empty() {
            assert!(fwd.is_empty() && back.is_empty());
            return;
        }
        assert_eq!(fwd.first(), fwd.last(), "forward walk does not close");
        assert_eq!(back.first(), back.last(), "backward walk does not close");
        let mut rev: Vec<_> = back[1..].to_vec();
        rev.reverse();
        assert_eq!(fwd[..reg.len()], rev[..]);
        for id in reg.ids() {
            let next = reg.next(id).unwrap();
            assert_eq!(reg.prev(next), Some(id));
        }
    }

    #[test]
    fn link_appends_before_head() {
        let (reg, ids) = registry_of(&["Ash", "Misty", "Brock"]);
        assert_eq!(reg.head(), Some(ids[0]));
        assert_eq!(reg.names(), vec!["Ash", "Misty", "Brock"]);
        assert_eq!(reg.prev(ids[0]), Some(ids[2]));
        assert_ring_valid(&reg);
    }

    #[test]
    fn single_owner_points_at_itself() {
        let (reg, ids) = registry_of(&["Solo"]);
        assert_eq!(reg.next(ids[0]), Some(ids[0]));
        assert_eq!(reg.prev(ids[0]), Some(ids[0]));
        assert_eq!(reg.find_by_position(1), Some(ids[0]));
        assert_eq!(reg.find_by_name("Solo"), Some(ids[0]));
    }

    #[test]
    fn unlink_head_moves_to_successor() {
        let (mut reg, ids) = registry_of(&["A", "B", "C"]);
        reg.unlink(ids[0]).unwrap();
        assert_eq!(reg.head(), Some(ids[1]));
        assert_eq!(reg.names(), vec!["B", "C"]);
        assert_ring_valid(&reg);
        // Still stored, just detached.
        assert_eq!(reg.get(ids[0]).map(|o| o.name.as_str()), Some("A"));
        assert!(reg.unlink(ids[0]).is_err());
    }

    #[test]
    fn unlink_last_empties_ring() {
        let (mut reg, ids) = registry_of(&["A"]);
        reg.unlink(ids[0]).unwrap();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
        assert_ring_valid(&reg);
    }

    #[test]
    fn link_then_unlink_restores_ring() {
        let (mut reg, _) = registry_of(&["A", "B"]);
        let before = reg.names().iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let id = reg.insert(Owner::new("Z", PokedexTree::new()));
        reg.unlink(id).unwrap();
        assert_eq!(reg.names(), before);
        assert_eq!(reg.len(), 2);
        assert_ring_valid(&reg);
    }

    #[test]
    fn position_lookup_is_one_based() {
        let (reg, ids) = registry_of(&["A", "B", "C"]);
        assert_eq!(reg.find_by_position(0), None);
        assert_eq!(reg.find_by_position(3), Some(ids[2]));
        assert_eq!(reg.find_by_position(4), None);
        assert_eq!(reg.position_of(ids[1]), Some(2));
    }

    #[test]
    fn sort_by_name_keeps_handles() {
        let (mut reg, ids) = registry_of(&["Bob", "Amy", "Zed"]);
        reg.sort_by_name().unwrap();
        assert_eq!(reg.names(), vec!["Amy", "Bob", "Zed"]);
        assert_eq!(reg.head(), Some(ids[1]));
        assert_eq!(reg.next(ids[2]), Some(ids[1]));
        assert_eq!(reg.get(ids[0]).unwrap().name, "Bob");
        assert_ring_valid(&reg);
    }

    #[test]
    fn sort_needs_two_owners() {
        let (mut reg, _) = registry_of(&["Only"]);
        assert_eq!(reg.sort_by_name(), Err(PokedexError::InsufficientMembers));
        let mut empty = OwnerRegistry::new();
        assert_eq!(empty.sort_by_name(), Err(PokedexError::InsufficientMembers));
    }

    #[test]
    fn walk_wraps_both_ways() {
        let (reg, ids) = registry_of(&["A", "B", "C"]);
        assert_eq!(reg.walk(Direction::Forward, 4), vec![ids[0], ids[1], ids[2], ids[0]]);
        assert_eq!(reg.walk(Direction::Backward, 3), vec![ids[0], ids[2], ids[1]]);
        assert!(OwnerRegistry::new().walk(Direction::Forward, 3).is_empty());
    }

    #[test]
    fn stale_handle_does_not_resolve_after_slot_reuse() {
        let (mut reg, ids) = registry_of(&["A", "B"]);
        let owner = reg.remove(ids[0]).unwrap();
        assert_eq!(owner.name, "A");
        assert!(reg.get(ids[0]).is_none());
        let c = reg.insert(Owner::new("C", PokedexTree::new()));
        assert_ne!(c, ids[0]);
        assert_eq!(reg.get(c).map(|o| o.name.as_str()), Some("C"));
        assert!(reg.get(ids[0]).is_none());
        assert!(reg.get_mut(ids[0]).is_none());
        assert_eq!(reg.next(ids[0]), None);
        assert!(reg.remove(ids[0]).is_err());
        assert!(reg.unlink(ids[0]).is_err());
        assert_eq!(reg.position_of(ids[0]), None);
        assert_eq!(reg.names(), vec!["B", "C"]);
        assert_ring_valid(&reg);
    }

    #[test]
    fn link_rejects_linked_and_relinks_detached() {
        let (mut reg, ids) = registry_of(&["A", "B"]);
        assert!(reg.link(ids[0]).is_err());
        reg.unlink(ids[0]).unwrap();
        reg.link(ids[0]).unwrap();
        assert_eq!(reg.names(), vec!["B", "A"]);
        assert_ring_valid(&reg);
    }

    #[test]
    fn walk_with_huge_count_is_lazy() {
        let (reg, ids) = registry_of(&["A", "B"]);
        let first: Vec<_> = reg.walk_iter(Direction::Forward).take(5).collect();
        assert_eq!(first, vec![ids[0], ids[1], ids[0], ids[1], ids[0]]);
        assert_eq!(OwnerRegistry::new().walk(Direction::Backward, usize::MAX), vec![]);
    }

    #[test]
    fn teardown_drops_everything() {
        let (mut reg, _) = registry_of(&["A", "B", "C"]);
        assert_eq!(reg.teardown(), (3, 0));
        assert!(reg.is_empty());
        assert!(reg.iter().next().is_none());
    }
}
