mod annealing;
mod astar;
mod beam;
mod bfs;
mod dfs;
mod greedy;
mod hill_climbing;
mod idastar;
mod iddfs;
mod local;
mod qlearning;
pub mod sensorless;
mod steepest_hill;
mod stochastic_hill;
mod ucs;

pub use annealing::{AnnealingParams, SimulatedAnnealing};
pub use astar::AStar;
pub use beam::{Beam, BeamParams};
pub use bfs::Bfs;
pub use dfs::Dfs;
pub use greedy::Greedy;
pub use hill_climbing::HillClimbing;
pub use idastar::{IdaStar, IdaStarParams};
pub use iddfs::{Iddfs, IddfsParams};
pub use local::RestartParams;
pub use qlearning::{QLearning, QLearningAgent, QLearningParams};
pub use steepest_hill::SteepestHill;
pub use stochastic_hill::StochasticHill;
pub use ucs::Ucs;

use crate::board::{is_valid_pair, State};
use crate::common::Path;
use crate::config::Config;
use crate::stat::Stats;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub trait Solver {
    fn name(&self) -> &'static str;

    /// Path from `start` to `goal`, or `None` if the input is malformed, the
    /// goal is unreachable or the search ran into one of its caps.
    fn solve(&mut self, start: &State, goal: &State) -> Option<Path>;

    /// Statistics of the last `solve` call.
    fn stats(&self) -> &Stats;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Algorithm {
    Bfs,
    Dfs,
    Ucs,
    Iddfs,
    Greedy,
    #[default]
    AStar,
    IdaStar,
    HillClimbing,
    SteepestHill,
    StochasticHill,
    SimulatedAnnealing,
    BeamSearch,
    QLearning,
}

pub fn build(config: &Config) -> Box<dyn Solver> {
    let moves = config.moves;
    let seed = config.seed;
    match config.algorithm {
        Algorithm::Bfs => Box::new(Bfs::new(moves)),
        Algorithm::Dfs => Box::new(Dfs::new(moves)),
        Algorithm::Ucs => Box::new(Ucs::new(moves)),
        Algorithm::Iddfs => Box::new(Iddfs::new(moves, config.iddfs_params())),
        Algorithm::Greedy => Box::new(Greedy::new(moves)),
        Algorithm::AStar => Box::new(AStar::new(moves)),
        Algorithm::IdaStar => Box::new(IdaStar::new(moves, config.ida_star_params())),
        Algorithm::HillClimbing => {
            Box::new(HillClimbing::new(moves, config.hill_climbing_params(), seed))
        }
        Algorithm::SteepestHill => {
            Box::new(SteepestHill::new(moves, config.steepest_hill_params(), seed))
        }
        Algorithm::StochasticHill => Box::new(StochasticHill::new(
            moves,
            config.stochastic_hill_params(),
            seed,
        )),
        Algorithm::SimulatedAnnealing => Box::new(SimulatedAnnealing::new(
            moves,
            config.simulated_annealing_params(),
            seed,
        )),
        Algorithm::BeamSearch => Box::new(Beam::new(moves, config.beam_search_params(), seed)),
        Algorithm::QLearning => Box::new(QLearning::new(moves, config.q_learning_params(), seed)),
    }
}

/// Outcome that needs no search: `Some(None)` for malformed or mismatched
/// boards, `Some(Some([start]))` when the start already is the goal.
pub(crate) fn settle(start: &State, goal: &State) -> Option<Option<Path>> {
    if !is_valid_pair(start, goal) {
        return Some(None);
    }
    if start == goal {
        return Some(Some(vec![start.clone()]));
    }
    None
}
