use super::{settle, Solver};
use crate::board::State;
use crate::common::Path;
use crate::moves::MoveSet;
use crate::stat::Stats;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IddfsParams {
    pub max_depth: usize,
}

impl IddfsParams {
    pub fn default_for(moves: MoveSet) -> Self {
        match moves {
            MoveSet::Single => IddfsParams { max_depth: 20 },
            MoveSet::Double => IddfsParams { max_depth: 30 },
        }
    }
}

/// Iterative deepening DFS over depth limits `0..=max_depth`.
pub struct Iddfs {
    moves: MoveSet,
    params: IddfsParams,
    stats: Stats,
}

impl Iddfs {
    pub fn new(moves: MoveSet, params: IddfsParams) -> Self {
        Iddfs {
            moves,
            params,
            stats: Stats::default(),
        }
    }

    // A state is pushed again only when reached at a strictly smaller depth,
    // so every state within the limit is eventually seen at its true depth.
    fn depth_limited(&mut self, start: &State, goal: &State, limit: usize) -> Option<Path> {
        let mut stack = vec![(start.clone(), vec![start.clone()])];
        let mut visited_at_depth = HashMap::from([(start.clone(), 0)]);

        while let Some((current, path)) = stack.pop() {
            if current == *goal {
                return Some(path);
            }
            let depth = path.len() - 1;
            if depth >= limit {
                continue;
            }
            self.stats.expanded_nodes += 1;

            let next_depth = depth + 1;
            for neighbor in self.moves.neighbors(&current).into_iter().rev() {
                let shallower = visited_at_depth
                    .get(&neighbor)
                    .map_or(true, |&seen| next_depth < seen);
                if shallower {
                    visited_at_depth.insert(neighbor.clone(), next_depth);
                    let mut next_path = path.clone();
                    next_path.push(neighbor.clone());
                    stack.push((neighbor, next_path));
                }
            }
        }

        None
    }

    fn search(&mut self, start: &State, goal: &State) -> Option<Path> {
        for limit in 0..=self.params.max_depth {
            self.stats.iterations += 1;
            if let Some(path) = self.depth_limited(start, goal, limit) {
                return Some(path);
            }
            debug!("depth limit {limit} exhausted");
        }
        None
    }
}

impl Solver for Iddfs {
    fn name(&self) -> &'static str {
        match self.moves {
            MoveSet::Single => "iddfs",
            MoveSet::Double => "iddfs_double",
        }
    }

    #[instrument(skip_all, name = "iddfs", fields(moves = ?self.moves, max_depth = self.params.max_depth), level = "debug")]
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

    #[test]
    fn test_iddfs_depth_bound() {
        init_tracing();
        let mut solver = Iddfs::new(MoveSet::Single, IddfsParams { max_depth: 9 });
        let path = solver.solve(&scenario_start(), &goal()).unwrap();
        assert_eq!(path.len(), 10);
        assert_eq!(solver.stats().iterations, 10);

        let mut solver = Iddfs::new(MoveSet::Single, IddfsParams { max_depth: 8 });
        assert_eq!(solver.solve(&scenario_start(), &goal()), None);
        assert_eq!(solver.stats().iterations, 9);
    }

    #[test]
    fn test_iddfs_shortest_on_easy_instances() {
        init_tracing();
        let mut solver = Iddfs::new(MoveSet::Single, IddfsParams::default_for(MoveSet::Single));
        for (start, distance) in easy_instances() {
            let path = solver.solve(&start, &goal()).unwrap();
            assert_eq!(path.len(), distance + 1);
        }
    }

    #[test]
    fn test_iddfs_double() {
        init_tracing();
        let mut solver = Iddfs::new(MoveSet::Double, IddfsParams::default_for(MoveSet::Double));
        let path = solver.solve(&scenario_start(), &goal()).unwrap();
        assert_eq!(path.len(), 6);
        assert!(verify_path(&path, &scenario_start(), &goal(), MoveSet::Double));
    }
}
