//! Exact unit-step distances by breadth-first search.

use std::collections::VecDeque;

use crate::space::{NodeStorage, SearchSpace};

/// Number of steps from `from` to every node, `None` where it cannot be reached.
///
/// An impassable or out-of-range `from` reaches nothing.
pub fn distance_map<M: SearchSpace>(space: &M, from: M::Reference) -> M::Storage<Option<usize>> {
    let mut distances = space.create_storage::<Option<usize>>();
    if !space.contains(from) || !space.is_passable(from) {
        return distances;
    }

    let mut queue = VecDeque::from([from]);
    *distances.get_mut(from) = Some(0);

    while let Some(node) = queue.pop_front() {
        let Some(d) = distances.get(node) else {
            continue;
        };
        for neighbor in space.neighbors_of(node) {
            let slot = distances.get_mut(neighbor);
            if slot.is_none() {
                *slot = Some(d + 1);
                queue.push_back(neighbor);
            }
        }
    }

    distances
}

/// Shortest number of steps between `from` and `to`, `None` if they are not connected
pub fn shortest_distance<M: SearchSpace>(
    space: &M,
    from: M::Reference,
    to: M::Reference,
) -> Option<usize> {
    if !space.contains(to) {
        return None;
    }
    distance_map(space, from).get(to)
}
