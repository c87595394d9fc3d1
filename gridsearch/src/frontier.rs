//! Best-first frontier ordered by (f-score, insertion sequence).

use std::{cmp::Ordering, collections::BinaryHeap, marker::PhantomData};

use crate::space::{NodeReference, NodeStorage};

/// The objects that we store in the priority queue
#[derive(Debug)]
struct Entry<R> {
    f: f64,
    sequence: u64,
    node: R,
}

impl<R> Ord for Entry<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed for BinaryHeap to be a min-heap: lowest f first, then first inserted
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<R> PartialOrd for Entry<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R> PartialEq for Entry<R> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<R> Eq for Entry<R> {}

/// Discovered but not yet expanded nodes.
///
/// `members` holds, per node, the sequence number of its one live heap entry. Pushing a
/// node that is already queued gives it a new entry and leaves the old one in the heap;
/// such stale entries no longer match `members` and are dropped when they surface.
#[derive(Debug)]
pub struct Frontier<R, S> {
    heap: BinaryHeap<Entry<R>>,
    members: S,
    live: usize,
    next_sequence: u64,
    high_water: usize,
    _reference: PhantomData<R>,
}

impl<R: NodeReference, S: NodeStorage<Option<u64>, Reference = R>> Frontier<R, S> {
    /// `members` must be freshly created (every entry `None`)
    pub fn new(members: S) -> Self {
        Self {
            heap: BinaryHeap::new(),
            members,
            live: 0,
            next_sequence: 0,
            high_water: 0,
            _reference: PhantomData,
        }
    }

    /// Queue `node` with priority `f` under a fresh sequence number, replacing the
    /// priority it had if it was queued already.
    ///
    /// Returns `true` if the node was not queued before.
    pub fn push(&mut self, node: R, f: f64) -> bool {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let newly_queued = self.members.get_mut(node).replace(sequence).is_none();
        if newly_queued {
            self.live += 1;
            self.high_water = self.high_water.max(self.live);
        }

        self.heap.push(Entry { f, sequence, node });
        newly_queued
    }

    /// Remove and return the node with the lowest f, the earliest inserted among equals
    pub fn pop(&mut self) -> Option<R> {
        while let Some(entry) = self.heap.pop() {
            let member = self.members.get_mut(entry.node);
            if *member != Some(entry.sequence) {
                // superseded by a later push, or already popped
                continue;
            }

            *member = None;
            self.live -= 1;
            return Some(entry.node);
        }

        None
    }

    pub fn contains(&self, node: R) -> bool {
        self.members.get(node).is_some()
    }

    /// Number of queued nodes, each counted once
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Largest number of queued nodes seen so far
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}
