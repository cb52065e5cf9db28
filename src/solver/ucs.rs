use super::{settle, Solver};
use crate::board::State;
use crate::common::{construct_path, OpenNode, Path, Trace};
use crate::moves::MoveSet;
use crate::stat::Stats;

use std::collections::{BinaryHeap, HashMap};
use std::time::Instant;
use tracing::{instrument, trace};

/// Uniform-cost search. Single moves cost 1, double moves cost 2.
pub struct Ucs {
    moves: MoveSet,
    stats: Stats,
}

impl Ucs {
    pub fn new(moves: MoveSet) -> Self {
        Ucs {
            moves,
            stats: Stats::default(),
        }
    }

    fn search(&mut self, start: &State, goal: &State) -> Option<Path> {
        let mut open = BinaryHeap::new();
        let mut costs = HashMap::from([(start.clone(), 0)]);
        let mut trace = Trace::new();
        let mut order = 0;

        open.push(OpenNode {
            state: start.clone(),
            priority: 0,
            g_cost: 0,
            order,
        });

        while let Some(current) = open.pop() {
            // Skip stale entries.
            if current.g_cost > costs[&current.state] {
                continue;
            }
            if current.state == *goal {
                return Some(construct_path(&trace, current.state));
            }
            self.stats.expanded_nodes += 1;
            trace!("expand {} at cost {}", current.state, current.g_cost);

            for (neighbor, step_cost) in self.moves.weighted(&current.state) {
                let tentative_g_cost = current.g_cost + step_cost;
                if tentative_g_cost < *costs.get(&neighbor).unwrap_or(&usize::MAX) {
                    costs.insert(neighbor.clone(), tentative_g_cost);
                    trace.insert(neighbor.clone(), current.state.clone());
                    order += 1;
                    open.push(OpenNode {
                        state: neighbor,
                        priority: tentative_g_cost,
                        g_cost: tentative_g_cost,
                        order,
                    });
                }
            }
        }

        None
    }
}

impl Solver for Ucs {
    fn name(&self) -> &'static str {
        match self.moves {
            MoveSet::Single => "ucs",
            MoveSet::Double => "ucs_double",
        }
    }

    #[instrument(skip_all, name = "ucs", fields(moves = ?self.moves), level = "debug")]
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
