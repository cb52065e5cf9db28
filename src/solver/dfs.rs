use super::{settle, Solver};
use crate::board::State;
use crate::common::{construct_path, Path, Trace};
use crate::moves::MoveSet;
use crate::stat::Stats;

use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, instrument};

/// Depth-first search without a depth bound. Paths are valid but usually far
/// from shortest.
pub struct Dfs {
    moves: MoveSet,
    stats: Stats,
}

impl Dfs {
    pub fn new(moves: MoveSet) -> Self {
        Dfs {
            moves,
            stats: Stats::default(),
        }
    }

    fn search(&mut self, start: &State, goal: &State) -> Option<Path> {
        let mut stack = vec![start.clone()];
        let mut visited = HashSet::from([start.clone()]);
        let mut trace = Trace::new();

        while let Some(current) = stack.pop() {
            if current == *goal {
                return Some(construct_path(&trace, current));
            }
            self.stats.expanded_nodes += 1;

            for neighbor in self.moves.neighbors(&current) {
                if visited.insert(neighbor.clone()) {
                    trace.insert(neighbor.clone(), current.clone());
                    stack.push(neighbor);
                }
            }
        }

        debug!("stack exhausted after {} states", visited.len());
        None
    }
}

impl Solver for Dfs {
    fn name(&self) -> &'static str {
        match self.moves {
            MoveSet::Single => "dfs",
            MoveSet::Double => "dfs_double",
        }
    }

    #[instrument(skip_all, name = "dfs", fields(moves = ?self.moves), level = "debug")]
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
