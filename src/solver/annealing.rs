use super::{settle, Solver};
use crate::board::State;
use crate::common::Path;
use crate::heuristic::Manhattan;
use crate::moves::MoveSet;
use crate::stat::Stats;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealingParams {
    pub initial_temperature: f64,
    /// Fraction of the temperature lost per step.
    pub cooling_rate: f64,
    pub min_temperature: f64,
    pub max_iterations: usize,
}

impl AnnealingParams {
    pub fn default_for(moves: MoveSet) -> Self {
        match moves {
            MoveSet::Single => AnnealingParams {
                initial_temperature: 100.0,
                cooling_rate: 0.003,
                min_temperature: 0.0001,
                max_iterations: 50000,
            },
            MoveSet::Double => AnnealingParams {
                initial_temperature: 100.0,
                cooling_rate: 0.005,
                min_temperature: 0.1,
                max_iterations: 50000,
            },
        }
    }
}

/// Simulated annealing over random neighbors with the Metropolis acceptance
/// rule. The returned path lists the accepted states and may revisit some.
pub struct SimulatedAnnealing {
    moves: MoveSet,
    params: AnnealingParams,
    rng: StdRng,
    stats: Stats,
}

impl SimulatedAnnealing {
    pub fn new(moves: MoveSet, params: AnnealingParams, seed: u64) -> Self {
        SimulatedAnnealing {
            moves,
            params,
            rng: StdRng::seed_from_u64(seed),
            stats: Stats::default(),
        }
    }

    fn search(&mut self, start: &State, goal: &State) -> Option<Path> {
        let heuristic = Manhattan::new(goal);
        let mut current = start.clone();
        let mut current_h = heuristic.estimate(start)?;
        let mut path = vec![start.clone()];
        let mut temperature = self.params.initial_temperature;

        while temperature > self.params.min_temperature
            && self.stats.iterations < self.params.max_iterations
        {
            self.stats.iterations += 1;

            let neighbors = self.moves.neighbors(&current);
            let Some(next) = neighbors.choose(&mut self.rng) else {
                break;
            };
            let Some(next_h) = heuristic.estimate(next) else {
                continue;
            };

            let delta = next_h as f64 - current_h as f64;
            if accepts(delta, temperature, &mut self.rng) {
                current = next.clone();
                current_h = next_h;
                path.push(current.clone());
                self.stats.expanded_nodes += 1;

                if current == *goal {
                    return Some(path);
                }
            }
            temperature *= 1.0 - self.params.cooling_rate;
        }

        debug!("frozen at h={current_h}, temperature {temperature:.4}");
        None
    }
}

/// Metropolis rule: improvements always pass, a worsening by `delta` passes
/// with probability `exp(-delta / temperature)`.
fn accepts(delta: f64, temperature: f64, rng: &mut StdRng) -> bool {
    delta < 0.0 || rng.gen::<f64>() < (-delta / temperature).exp()
}

impl Solver for SimulatedAnnealing {
    fn name(&self) -> &'static str {
        match self.moves {
            MoveSet::Single => "simulated_annealing",
            MoveSet::Double => "simulated_annealing_double",
        }
    }

    #[instrument(skip_all, name = "simulated_annealing", fields(moves = ?self.moves), level = "debug")]
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
