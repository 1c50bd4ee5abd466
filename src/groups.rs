//! Incremental stone-group and liberty tracking.
//!
//! This module maintains the partition of stones into maximal connected
//! groups and each group's liberty set, updated as stones are placed or
//! removed. Nothing here ever walks the whole board: every operation
//! touches only the groups adjacent to the affected points, which is
//! what makes move execution cheap compared to re-deriving connectivity
//! by flood-fill after each move.
//!
//! The two mutating primitives are [`GroupTracker::place`] and
//! [`GroupTracker::remove_group`]. The tracker never decides legality;
//! it reports which enemy groups ran out of liberties and leaves
//! capture and suicide policy to the caller.

use std::collections::HashSet;
use std::sync::Arc;

use crate::board::{Board, Color, Point};
use crate::topology::Topology;

/// Stable handle for a group; a slot index into the tracker's storage.
pub type GroupId = usize;

#[derive(Clone, Debug)]
pub struct Group {
    pub color: Color,
    /// Member stones. Each stone appears in exactly one live group.
    pub stones: Vec<Point>,
    /// Empty points adjacent to at least one member stone.
    pub liberties: HashSet<Point>,
}

#[derive(Clone)]
pub struct GroupTracker {
    topology: Arc<Topology>,
    /// Group membership per point; `None` for empty points.
    membership: Vec<Option<GroupId>>,
    /// Slot storage; freed slots are reused via `free`.
    groups: Vec<Option<Group>>,
    free: Vec<GroupId>,
}

impl GroupTracker {
    pub fn new(topology: Arc<Topology>) -> Self {
        let area = topology.area();
        Self {
            topology,
            membership: vec![None; area],
            groups: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Register a stone just written to `board` at `pt`.
    ///
    /// Creates a singleton group whose liberties are the empty neighbors
    /// of `pt`, merges every same-color neighbor group into it (stone
    /// union; liberty union minus `pt`), and deletes `pt` from the
    /// liberty set of every opposite-color neighbor group.
    ///
    /// Returns the id of the resulting group and the ids of
    /// opposite-color groups whose liberty sets became empty.
    pub fn place(&mut self, board: &Board, color: Color, pt: Point) -> (GroupId, Vec<GroupId>) {
        debug_assert_eq!(board.get(pt), Some(color));
        debug_assert!(self.membership[pt].is_none());

        let mut liberties = HashSet::new();
        let mut friends: Vec<GroupId> = Vec::with_capacity(4);
        let mut enemies: Vec<GroupId> = Vec::with_capacity(4);
        for &n in self.topology.neighbors(pt) {
            match board.get(n) {
                None => {
                    liberties.insert(n);
                }
                Some(c) => {
                    let id = self.membership[n].expect("stone without a group");
                    let side = if c == color { &mut friends } else { &mut enemies };
                    if !side.contains(&id) {
                        side.push(id);
                    }
                }
            }
        }

        let mut id = self.alloc(Group {
            color,
            stones: vec![pt],
            liberties,
        });
        self.membership[pt] = Some(id);

        for friend in friends {
            id = self.merge(id, friend, pt);
        }
        let mut starved = Vec::new();
        for enemy in enemies {
            let group = self.groups[enemy].as_mut().expect("live group id");
            group.liberties.remove(&pt);
            if group.liberties.is_empty() {
                starved.push(enemy);
            }
        }
        (id, starved)
    }

    /// Delete group `id`: clear its cells on `board` and credit every
    /// freed point back to the liberty sets of remaining groups
    /// adjacent to it, of either color.
    ///
    /// Returns the removed stones. All cells are cleared before any
    /// liberties are credited, so a group never gains liberties from
    /// stones of its own dying group.
    pub fn remove_group(&mut self, board: &mut Board, id: GroupId) -> Vec<Point> {
        let group = self.groups[id].take().expect("live group id");
        self.free.push(id);
        for &stone in &group.stones {
            board.clear(stone);
            self.membership[stone] = None;
        }
        for &stone in &group.stones {
            for &n in self.topology.neighbors(stone) {
                if let Some(nid) = self.membership[n] {
                    if let Some(neighbor) = self.groups[nid].as_mut() {
                        neighbor.liberties.insert(stone);
                    }
                }
            }
        }
        group.stones
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id).and_then(|slot| slot.as_ref())
    }

    pub fn group_at(&self, pt: Point) -> Option<GroupId> {
        self.membership.get(pt).copied().flatten()
    }

    pub fn liberty_count(&self, id: GroupId) -> usize {
        self.group(id).map_or(0, |g| g.liberties.len())
    }

    /// Full consistency audit, for tests: the live groups partition the
    /// stones on `board`, membership agrees both ways, and every
    /// liberty set is exactly the empty neighborhood of its group.
    pub fn is_consistent(&self, board: &Board) -> bool {
        let mut tracked = 0;
        for (id, slot) in self.groups.iter().enumerate() {
            let Some(group) = slot else { continue };
            if group.stones.is_empty() {
                return false;
            }
            tracked += group.stones.len();
            let mut expected_liberties = HashSet::new();
            for &stone in &group.stones {
                if board.get(stone) != Some(group.color) || self.membership[stone] != Some(id) {
                    return false;
                }
                for &n in self.topology.neighbors(stone) {
                    if board.get(n).is_none() {
                        expected_liberties.insert(n);
                    }
                }
            }
            if group.liberties != expected_liberties {
                return false;
            }
        }
        // Every stone accounted for, every empty point unclaimed.
        for pt in 0..board.area() {
            match (board.get(pt), self.membership[pt]) {
                (Some(_), Some(_)) | (None, None) => {}
                _ => return false,
            }
        }
        tracked == board.stone_count()
    }

    fn alloc(&mut self, group: Group) -> GroupId {
        if let Some(id) = self.free.pop() {
            self.groups[id] = Some(group);
            id
        } else {
            self.groups.push(Some(group));
            self.groups.len() - 1
        }
    }

    /// Merge two same-color groups; the smaller stone set moves into
    /// the larger. `placed` is the joining stone and is never a liberty
    /// of the merged group.
    fn merge(&mut self, a: GroupId, b: GroupId, placed: Point) -> GroupId {
        if a == b {
            return a;
        }
        let a_len = self.groups[a].as_ref().map_or(0, |g| g.stones.len());
        let b_len = self.groups[b].as_ref().map_or(0, |g| g.stones.len());
        let (winner, loser) = if a_len >= b_len { (a, b) } else { (b, a) };

        let mut absorbed = self.groups[loser].take().expect("live group id");
        self.free.push(loser);
        for &stone in &absorbed.stones {
            self.membership[stone] = Some(winner);
        }
        let group = self.groups[winner].as_mut().expect("live group id");
        group.stones.append(&mut absorbed.stones);
        group.liberties.extend(absorbed.liberties);
        group.liberties.remove(&placed);
        winner
    }
}
