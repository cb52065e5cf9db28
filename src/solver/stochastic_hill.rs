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

/// Stochastic hill climbing: any improving neighbor, uniformly at random.
pub struct StochasticHill {
    moves: MoveSet,
    params: RestartParams,
    rng: StdRng,
    stats: Stats,
}

impl StochasticHill {
    pub fn new(moves: MoveSet, params: RestartParams, seed: u64) -> Self {
        StochasticHill {
            moves,
            params,
            rng: StdRng::seed_from_u64(seed),
            stats: Stats::default(),
        }
    }
}

fn any_improver(candidates: &Candidates, score: usize, rng: &mut StdRng) -> Option<usize> {
    improving(candidates, score).choose(rng).copied()
}

impl Solver for StochasticHill {
    fn name(&self) -> &'static str {
        match self.moves {
            MoveSet::Single => "stochastic_hill",
            MoveSet::Double => "stochastic_hill_double",
        }
    }

    #[instrument(skip_all, name = "stochastic_hill", fields(moves = ?self.moves), level = "debug")]
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
                any_improver,
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
