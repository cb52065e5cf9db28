use super::{settle, Solver};
use crate::board::State;
use crate::common::Path;
use crate::heuristic::Manhattan;
use crate::moves::MoveSet;
use crate::stat::Stats;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamParams {
    pub beam_width: usize,
    pub max_depth: usize,
}

impl BeamParams {
    pub fn default_for(moves: MoveSet) -> Self {
        match moves {
            MoveSet::Single => BeamParams {
                beam_width: 5,
                max_depth: 100,
            },
            MoveSet::Double => BeamParams {
                beam_width: 10,
                max_depth: 100,
            },
        }
    }
}

/// Beam search keeping the `beam_width` best partial paths per depth. A
/// state is admitted to at most one beam over the whole search.
pub struct Beam {
    moves: MoveSet,
    params: BeamParams,
    rng: StdRng,
    stats: Stats,
}

impl Beam {
    pub fn new(moves: MoveSet, params: BeamParams, seed: u64) -> Self {
        Beam {
            moves,
            params,
            rng: StdRng::seed_from_u64(seed),
            stats: Stats::default(),
        }
    }

    fn search(&mut self, start: &State, goal: &State) -> Option<Path> {
        let heuristic = Manhattan::new(goal);
        let mut beam = vec![vec![start.clone()]];
        let mut visited = HashSet::from([start.clone()]);

        for depth in 0..=self.params.max_depth {
            if beam.is_empty() {
                break;
            }
            self.stats.iterations += 1;

            let mut successors = Vec::new();
            for path in beam {
                let Some(state) = path.last() else {
                    continue;
                };
                if state == goal {
                    return Some(path);
                }
                self.stats.expanded_nodes += 1;

                for neighbor in self.moves.neighbors(state) {
                    if !visited.insert(neighbor.clone()) {
                        continue;
                    }
                    let Some(h_cost) = heuristic.estimate(&neighbor) else {
                        continue;
                    };
                    let mut next_path = path.clone();
                    next_path.push(neighbor);
                    successors.push((h_cost, next_path));
                }
            }

            // Equal estimates are ordered at random.
            successors.shuffle(&mut self.rng);
            successors.sort_by_key(|(h_cost, _)| *h_cost);
            successors.truncate(self.params.beam_width);
            trace!(
                "depth {depth}: beam estimates {:?}",
                successors.iter().map(|(h_cost, _)| *h_cost).collect::<Vec<_>>()
            );
            beam = successors.into_iter().map(|(_, path)| path).collect();
        }

        debug!("beam emptied or depth cap reached");
        None
    }
}

impl Solver for Beam {
    fn name(&self) -> &'static str {
        match self.moves {
            MoveSet::Single => "beam_search",
            MoveSet::Double => "beam_search_double",
        }
    }

    #[instrument(skip_all, name = "beam_search", fields(moves = ?self.moves, width = self.params.beam_width), level = "debug")]
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
    fn test_beam_easy_instances() {
        init_tracing();
        for moves in [MoveSet::Single, MoveSet::Double] {
            let mut solver = Beam::new(moves, BeamParams::default_for(moves), 0);
            for (start, _) in easy_instances() {
                let path = solver.solve(&start, &goal()).unwrap();
                assert!(verify_path(&path, &start, &goal(), moves));
            }
        }
    }

    #[test]
    fn test_beam_scenario() {
        init_tracing();
        let mut solver = Beam::new(MoveSet::Single, BeamParams::default_for(MoveSet::Single), 0);
        let path = solver.solve(&scenario_start(), &goal()).unwrap();
        assert!(verify_path(&path, &scenario_start(), &goal(), MoveSet::Single));
    }

    #[test]
    fn test_beam_depth_cap() {
        init_tracing();
        let params = BeamParams {
            beam_width: 5,
            max_depth: 3,
        };
        let mut solver = Beam::new(MoveSet::Single, params, 0);
        assert_eq!(solver.solve(&scenario_start(), &goal()), None);
        assert_eq!(solver.stats().iterations, 4);
    }
}
