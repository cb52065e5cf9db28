use crate::board::State;
use crate::moves::MoveSet;

use std::cmp::Ordering;
use std::collections::HashMap;

/// Sequence of states from start to goal, both inclusive.
pub type Path = Vec<State>;

/// Child to parent links recorded during a search.
pub(crate) type Trace = HashMap<State, State>;

pub(crate) fn construct_path(trace: &Trace, mut current: State) -> Path {
    let mut path = vec![current.clone()];
    while let Some(parent) = trace.get(&current) {
        path.push(parent.clone());
        current = parent.clone();
    }
    path.reverse();
    path
}

// Priority queue entry. `BinaryHeap` is a max-heap, so the ordering is
// reversed: lowest priority first, then earliest insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenNode {
    pub(crate) state: State,
    pub(crate) priority: usize,
    pub(crate) g_cost: usize,
    pub(crate) order: usize,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Checks that `path` runs from `start` to `goal` and that every step is one
/// move of `moves`.
pub fn verify_path(path: &[State], start: &State, goal: &State, moves: MoveSet) -> bool {
    match (path.first(), path.last()) {
        (Some(first), Some(last)) if first == start && last == goal => path
            .windows(2)
            .all(|step| moves.is_move(&step[0], &step[1])),
        _ => false,
    }
}
