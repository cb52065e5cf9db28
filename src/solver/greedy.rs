use super::{settle, Solver};
use crate::board::State;
use crate::common::{construct_path, OpenNode, Path, Trace};
use crate::heuristic::Manhattan;
use crate::moves::MoveSet;
use crate::stat::Stats;

use std::collections::{BinaryHeap, HashSet};
use std::time::Instant;
use tracing::{instrument, trace};

/// Greedy best-first search ordered by the Manhattan estimate alone.
///
/// An expanded state is never expanded again and the parent of a frontier
/// state is whichever expansion reached it last, so paths are not optimal.
pub struct Greedy {
    moves: MoveSet,
    stats: Stats,
}

impl Greedy {
    pub fn new(moves: MoveSet) -> Self {
        Greedy {
            moves,
            stats: Stats::default(),
        }
    }

    fn search(&mut self, start: &State, goal: &State) -> Option<Path> {
        let heuristic = Manhattan::new(goal);
        let mut open = BinaryHeap::new();
        let mut closed = HashSet::new();
        let mut trace = Trace::new();
        let mut order = 0;

        // Depth plays no part here, so every node carries g_cost 0.
        open.push(OpenNode {
            state: start.clone(),
            priority: heuristic.estimate(start)?,
            g_cost: 0,
            order,
        });

        while let Some(current) = open.pop() {
            if current.state == *goal {
                return Some(construct_path(&trace, current.state));
            }
            if !closed.insert(current.state.clone()) {
                continue;
            }
            self.stats.expanded_nodes += 1;
            trace!("expand {} h={}", current.state, current.priority);

            for neighbor in self.moves.neighbors(&current.state) {
                if closed.contains(&neighbor) {
                    continue;
                }
                let Some(h_cost) = heuristic.estimate(&neighbor) else {
                    continue;
                };
                trace.insert(neighbor.clone(), current.state.clone());
                order += 1;
                open.push(OpenNode {
                    state: neighbor,
                    priority: h_cost,
                    g_cost: 0,
                    order,
                });
            }
        }

        None
    }
}

impl Solver for Greedy {
    fn name(&self) -> &'static str {
        match self.moves {
            MoveSet::Single => "greedy",
            MoveSet::Double => "greedy_double",
        }
    }

    #[instrument(skip_all, name = "greedy", fields(moves = ?self.moves), level = "debug")]
    fn solve(&mut self, start: &State, goal: &State) -> Option<Path> {
        let started = Instant::now();
        self.stats = Stats::default();

        let path = match settle(start, goal) {
            Some(outcome) => outcome,
            None => self.search(start, goal),
        };

        self.stats.finish(started, &path);
        self.stats.print(self.name());
        path
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::verify_path;
    use crate::solver::test_util::*;
    use crate::solver::AStar;

    #[test]
    fn test_greedy_valid_path() {
        init_tracing();
        for moves in [MoveSet::Single, MoveSet::Double] {
            let mut solver = Greedy::new(moves);
            let path = solver.solve(&scenario_start(), &goal()).unwrap();
            assert!(verify_path(&path, &scenario_start(), &goal(), moves));
        }
    }

    #[test]
    fn test_greedy_not_optimal() {
        init_tracing();
        // Optimal distance 8.
        let start = State::from([1, 2, 3, 7, 9, 4, 8, 6, 5]);
        let greedy = Greedy::new(MoveSet::Single).solve(&start, &goal()).unwrap();
        let astar = AStar::new(MoveSet::Single).solve(&start, &goal()).unwrap();
        assert_eq!(astar.len(), 9);
        assert!(greedy.len() > astar.len());
        assert!(verify_path(&greedy, &start, &goal(), MoveSet::Single));
    }

    #[test]
    fn test_greedy_unsolvable() {
        init_tracing();
        let mut solver = Greedy::new(MoveSet::Single);
        assert_eq!(solver.solve(&unsolvable(), &goal()), None);
    }
}
