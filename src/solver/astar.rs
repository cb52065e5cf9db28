use super::{settle, Solver};
use crate::board::State;
use crate::common::{construct_path, OpenNode, Path, Trace};
use crate::heuristic::Manhattan;
use crate::moves::MoveSet;
use crate::stat::Stats;

use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, instrument, trace};

/// A* with f = g + Manhattan, ties broken by insertion order.
///
/// The double variant weighs double moves 2 and reopens a closed state when
/// a strictly cheaper route to it turns up.
pub struct AStar {
    moves: MoveSet,
    stats: Stats,
}

impl AStar {
    pub fn new(moves: MoveSet) -> Self {
        AStar {
            moves,
            stats: Stats::default(),
        }
    }

    fn search(&mut self, start: &State, goal: &State) -> Option<Path> {
        let heuristic = Manhattan::new(goal);
        let reopen = self.moves == MoveSet::Double;

        let mut open = BinaryHeap::new();
        let mut closed = HashSet::new();
        let mut g_cost_map = HashMap::from([(start.clone(), 0)]);
        let mut trace = Trace::new();
        let mut order = 0;

        open.push(OpenNode {
            state: start.clone(),
            priority: heuristic.estimate(start)?,
            g_cost: 0,
            order,
        });

        while let Some(current) = open.pop() {
            if current.g_cost > g_cost_map[&current.state] || closed.contains(&current.state) {
                continue;
            }
            if current.state == *goal {
                debug!("goal reached at cost {}", current.g_cost);
                return Some(construct_path(&trace, current.state));
            }

            closed.insert(current.state.clone());
            self.stats.expanded_nodes += 1;
            trace!("expand {} f={}", current.state, current.priority);

            for (neighbor, step_cost) in self.moves.weighted(&current.state) {
                if !reopen && closed.contains(&neighbor) {
                    continue;
                }

                let tentative_g_cost = current.g_cost + step_cost;
                if tentative_g_cost >= *g_cost_map.get(&neighbor).unwrap_or(&usize::MAX) {
                    continue;
                }
                let Some(h_cost) = heuristic.estimate(&neighbor) else {
                    continue;
                };

                if closed.remove(&neighbor) {
                    trace!("reopen {neighbor} at cost {tentative_g_cost}");
                }
                g_cost_map.insert(neighbor.clone(), tentative_g_cost);
                trace.insert(neighbor.clone(), current.state.clone());
                order += 1;
                open.push(OpenNode {
                    state: neighbor,
                    priority: tentative_g_cost + h_cost,
                    g_cost: tentative_g_cost,
                    order,
                });
            }
        }

        None
    }
}

impl Solver for AStar {
    fn name(&self) -> &'static str {
        match self.moves {
            MoveSet::Single => "a_star",
            MoveSet::Double => "a_star_double",
        }
    }

    #[instrument(skip_all, name = "a_star", fields(moves = ?self.moves), level = "debug")]
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
