use super::local::{climb_with_restarts, RestartParams};
use super::{settle, Solver};
use crate::board::State;
use crate::common::Path;
use crate::moves::MoveSet;
use crate::stat::Stats;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::instrument;

/// Steepest-ascent hill climbing: always the lowest estimate, first in
/// generation order on ties.
pub struct SteepestHill {
    moves: MoveSet,
    params: RestartParams,
    rng: StdRng,
    stats: Stats,
}

impl SteepestHill {
    pub fn new(moves: MoveSet, params: RestartParams, seed: u64) -> Self {
        SteepestHill {
            moves,
            params,
            rng: StdRng::seed_from_u64(seed),
            stats: Stats::default(),
        }
    }
}

impl Solver for SteepestHill {
    fn name(&self) -> &'static str {
        match self.moves {
            MoveSet::Single => "steepest_hill",
            MoveSet::Double => "steepest_hill_double",
        }
    }

    #[instrument(skip_all, name = "steepest_hill", fields(moves = ?self.moves), level = "debug")]
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
                |candidates, score, _| {
                    let (idx, (_, best)) = candidates
                        .iter()
                        .enumerate()
                        .min_by_key(|(_, (_, h))| *h)?;
                    (*best < score).then_some(idx)
                },
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

    #[test]
    fn test_steepest_hill_easy_instances() {
        init_tracing();
        for moves in [MoveSet::Single, MoveSet::Double] {
            let mut solver = SteepestHill::new(moves, RestartParams::steepest_hill(), 0);
            for (start, _) in easy_instances() {
                let path = solver.solve(&start, &goal()).unwrap();
                assert!(verify_path(&path, &start, &goal(), moves));
            }
        }
    }

    #[test]
    fn test_steepest_hill_is_deterministic_when_improving() {
        init_tracing();
        let start = State::from([9, 1, 3, 4, 2, 5, 7, 8, 6]);
        let first = SteepestHill::new(MoveSet::Double, RestartParams::steepest_hill(), 1)
            .solve(&start, &goal());
        let second = SteepestHill::new(MoveSet::Double, RestartParams::steepest_hill(), 2)
            .solve(&start, &goal());
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_steepest_hill_rejects_unsolvable() {
        init_tracing();
        let mut solver = SteepestHill::new(MoveSet::Single, RestartParams::steepest_hill(), 0);
        assert_eq!(solver.solve(&unsolvable(), &goal()), None);
    }
}
