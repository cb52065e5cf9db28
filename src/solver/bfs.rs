use super::{settle, Solver};
use crate::board::State;
use crate::common::{construct_path, Path, Trace};
use crate::moves::MoveSet;
use crate::stat::Stats;

use std::collections::{HashSet, VecDeque};
use std::time::Instant;
use tracing::{debug, instrument};

pub struct Bfs {
    moves: MoveSet,
    stats: Stats,
}

impl Bfs {
    pub fn new(moves: MoveSet) -> Self {
        Bfs {
            moves,
            stats: Stats::default(),
        }
    }

    fn search(&mut self, start: &State, goal: &State) -> Option<Path> {
        let mut frontier = VecDeque::from([start.clone()]);
        let mut visited = HashSet::from([start.clone()]);
        let mut trace = Trace::new();

        while let Some(current) = frontier.pop_front() {
            self.stats.expanded_nodes += 1;

            for neighbor in self.moves.neighbors(&current) {
                if !visited.insert(neighbor.clone()) {
                    continue;
                }
                trace.insert(neighbor.clone(), current.clone());

                // Stop on discovery, not on pop.
                if neighbor == *goal {
                    return Some(construct_path(&trace, neighbor));
                }
                frontier.push_back(neighbor);
            }
        }

        debug!("frontier exhausted after {} states", visited.len());
        None
    }
}

impl Solver for Bfs {
    fn name(&self) -> &'static str {
        match self.moves {
            MoveSet::Single => "bfs",
            MoveSet::Double => "bfs_double",
        }
    }

    #[instrument(skip_all, name = "bfs", fields(moves = ?self.moves), level = "debug")]
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
