use super::local::{climb_with_restarts, improving, Candidates, RestartParams};
use super::{settle, Solver};
use crate::board::State;
use crate::common::Path;
use crate::moves::MoveSet;
use crate::stat::Stats;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::Instant;
use tracing::instrument;

/// Random-restart hill climbing. Moves to one of the best improving
/// neighbors, chosen at random among equals.
pub struct HillClimbing {
    moves: MoveSet,
    params: RestartParams,
    rng: StdRng,
    stats: Stats,
}

impl HillClimbing {
    pub fn new(moves: MoveSet, params: RestartParams, seed: u64) -> Self {
        HillClimbing {
            moves,
            params,
            rng: StdRng::seed_from_u64(seed),
            stats: Stats::default(),
        }
    }
}

// Lowest-scoring improver; equal scores are broken at random.
fn best_improver(candidates: &Candidates, score: usize, rng: &mut StdRng) -> Option<usize> {
    let improvers = improving(candidates, score);
    let best = improvers.iter().map(|&idx| candidates[idx].1).min()?;
    let ties: Vec<usize> = improvers
        .into_iter()
        .filter(|&idx| candidates[idx].1 == best)
        .collect();
    ties.choose(rng).copied()
}

impl Solver for HillClimbing {
    fn name(&self) -> &'static str {
        match self.moves {
            MoveSet::Single => "hill_climbing",
            MoveSet::Double => "hill_climbing_double",
        }
    }

    #[instrument(skip_all, name = "hill_climbing", fields(moves = ?self.moves), level = "debug")]
    fn solve(&mut self, start: &State, goal: &State) -> Option<Path> {
        let started = Instant::now();
        self.stats = Stats::default();

        let path = match settle(start, goal) {
            Some(outcome) => outcome,
            None => climb_with_restarts(
                start,
                goal,
                self.moves,
                &self.params,
                &mut self.rng,
                &mut self.stats,
                best_improver,
            ),
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
    use std::collections::HashSet;

    #[test]
    fn test_best_improver_takes_lowest_score() {
        let a = State::from([1, 2, 3, 4, 5, 6, 7, 9, 8]);
        let b = State::from([1, 2, 3, 4, 5, 6, 9, 7, 8]);
        let c = State::from([1, 2, 3, 4, 9, 5, 7, 8, 6]);
        let candidates = vec![(a.clone(), 3), (b, 1), (c, 2)];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(best_improver(&candidates, 4, &mut rng), Some(1));
        }

        // Ties at the lowest score are both taken over a few seeds.
        let tied = vec![(a.clone(), 1), (goal(), 2), (a, 1)];
        let picked: HashSet<usize> = (0..20)
            .filter_map(|seed| best_improver(&tied, 4, &mut StdRng::seed_from_u64(seed)))
            .collect();
        assert_eq!(picked, HashSet::from([0, 2]));

        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(best_improver(&candidates, 1, &mut rng), None);
    }

    #[test]
    fn test_hill_climbing_easy_instances() {
        init_tracing();
        for moves in [MoveSet::Single, MoveSet::Double] {
            let mut solver = HillClimbing::new(moves, RestartParams::hill_climbing(), 0);
            for (start, _) in easy_instances() {
                let path = solver.solve(&start, &goal()).unwrap();
                assert!(verify_path(&path, &start, &goal(), moves));
            }
        }
    }

    #[test]
    fn test_hill_climbing_single_follows_manhattan() {
        init_tracing();
        // Manhattan is exact on these, so every step improves by one.
        let mut solver = HillClimbing::new(MoveSet::Single, RestartParams::hill_climbing(), 1);
        for (start, distance) in easy_instances() {
            let path = solver.solve(&start, &goal()).unwrap();
            assert_eq!(path.len(), distance + 1);
            assert_eq!(solver.stats().iterations, 1);
        }
    }

    #[test]
    fn test_hill_climbing_rejects_unsolvable() {
        init_tracing();
        let mut solver = HillClimbing::new(MoveSet::Double, RestartParams::hill_climbing(), 0);
        assert_eq!(solver.solve(&unsolvable(), &goal()), None);
        assert_eq!(solver.stats().expanded_nodes, 0);
    }
}
