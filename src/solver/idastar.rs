use super::{settle, Solver};
use crate::board::State;
use crate::common::Path;
use crate::heuristic::Manhattan;
use crate::moves::MoveSet;
use crate::stat::Stats;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdaStarParams {
    /// Cap on threshold escalations.
    pub max_iterations: usize,
}

impl Default for IdaStarParams {
    fn default() -> Self {
        IdaStarParams {
            max_iterations: 100,
        }
    }
}

enum Probe {
    Found(Path),
    // Smallest f seen above the threshold.
    Exceeded(usize),
    Exhausted,
}

struct Frame {
    g_cost: usize,
    neighbors: Vec<State>,
    next: usize,
}

/// Iterative deepening A*. Each action costs 1, including double moves.
pub struct IdaStar {
    moves: MoveSet,
    params: IdaStarParams,
    stats: Stats,
}

impl IdaStar {
    pub fn new(moves: MoveSet, params: IdaStarParams) -> Self {
        IdaStar {
            moves,
            params,
            stats: Stats::default(),
        }
    }

    // The double variant tries the most promising neighbors first.
    fn ordered_neighbors(&self, state: &State, heuristic: &Manhattan) -> Vec<State> {
        let mut neighbors = self.moves.neighbors(state);
        if self.moves == MoveSet::Double {
            neighbors.sort_by_cached_key(|neighbor| heuristic.estimate(neighbor).unwrap_or(usize::MAX));
        }
        neighbors
    }

    // Depth-first probe bounded by `threshold`. Cycles are only checked
    // against the current path.
    fn probe(&mut self, start: &State, goal: &State, heuristic: &Manhattan, threshold: usize) -> Probe {
        let mut path = vec![start.clone()];
        let mut on_path = HashSet::from([start.clone()]);
        let mut frames = vec![Frame {
            g_cost: 0,
            neighbors: self.ordered_neighbors(start, heuristic),
            next: 0,
        }];
        let mut min_exceeded: Option<usize> = None;
        self.stats.expanded_nodes += 1;

        while let Some(frame) = frames.last_mut() {
            if frame.next == frame.neighbors.len() {
                frames.pop();
                if let Some(state) = path.pop() {
                    on_path.remove(&state);
                }
                continue;
            }

            let neighbor = frame.neighbors[frame.next].clone();
            frame.next += 1;
            let g_cost = frame.g_cost + 1;

            if on_path.contains(&neighbor) {
                continue;
            }
            let Some(h_cost) = heuristic.estimate(&neighbor) else {
                continue;
            };
            let f_cost = g_cost + h_cost;
            if f_cost > threshold {
                min_exceeded = Some(min_exceeded.map_or(f_cost, |min| min.min(f_cost)));
                continue;
            }
            if neighbor == *goal {
                path.push(neighbor);
                return Probe::Found(path);
            }

            self.stats.expanded_nodes += 1;
            let neighbors = self.ordered_neighbors(&neighbor, heuristic);
            path.push(neighbor.clone());
            on_path.insert(neighbor);
            frames.push(Frame {
                g_cost,
                neighbors,
                next: 0,
            });
        }

        match min_exceeded {
            Some(next_threshold) => Probe::Exceeded(next_threshold),
            None => Probe::Exhausted,
        }
    }

    fn search(&mut self, start: &State, goal: &State) -> Option<Path> {
        if !start.is_solvable(goal) {
            debug!("unsolvable instance");
            return None;
        }

        let heuristic = Manhattan::new(goal);
        let mut threshold = heuristic.estimate(start)?;

        for _ in 0..self.params.max_iterations {
            self.stats.iterations += 1;
            match self.probe(start, goal, &heuristic, threshold) {
                Probe::Found(path) => return Some(path),
                Probe::Exceeded(next_threshold) => {
                    debug!("threshold {threshold} -> {next_threshold}");
                    threshold = next_threshold;
                }
                Probe::Exhausted => return None,
            }
        }

        debug!("gave up after {} thresholds", self.params.max_iterations);
        None
    }
}

impl Solver for IdaStar {
    fn name(&self) -> &'static str {
        match self.moves {
            MoveSet::Single => "ida_star",
            MoveSet::Double => "ida_star_double",
        }
    }

    #[instrument(skip_all, name = "ida_star", fields(moves = ?self.moves), level = "debug")]
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
    fn test_ida_star_optimal() {
        init_tracing();
        let mut solver = IdaStar::new(MoveSet::Single, IdaStarParams::default());
        let path = solver.solve(&scenario_start(), &goal()).unwrap();
        assert_eq!(path.len(), 10);
        // Manhattan is exact here, so the first threshold succeeds.
        assert_eq!(solver.stats().iterations, 1);

        for (start, distance) in easy_instances() {
            let path = solver.solve(&start, &goal()).unwrap();
            assert_eq!(path.len(), distance + 1);
        }
    }

    #[test]
    fn test_ida_star_needs_escalation() {
        init_tracing();
        // Manhattan 4, true distance 6.
        let start = State::from([1, 2, 3, 5, 7, 6, 4, 8, 9]);
        let mut solver = IdaStar::new(MoveSet::Single, IdaStarParams::default());
        let path = solver.solve(&start, &goal()).unwrap();
        assert_eq!(path.len(), 7);
        assert_eq!(solver.stats().iterations, 2);

        let mut capped = IdaStar::new(MoveSet::Single, IdaStarParams { max_iterations: 1 });
        assert_eq!(capped.solve(&start, &goal()), None);
    }

    #[test]
    fn test_ida_star_double() {
        init_tracing();
        let mut solver = IdaStar::new(MoveSet::Double, IdaStarParams::default());
        let path = solver.solve(&scenario_start(), &goal()).unwrap();
        assert!(verify_path(&path, &scenario_start(), &goal(), MoveSet::Double));
    }

    #[test]
    fn test_ida_star_rejects_unsolvable() {
        init_tracing();
        let mut solver = IdaStar::new(MoveSet::Single, IdaStarParams::default());
        assert_eq!(solver.solve(&unsolvable(), &goal()), None);
        assert_eq!(solver.stats().expanded_nodes, 0);
    }
}
