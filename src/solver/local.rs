use crate::board::State;
use crate::common::Path;
use crate::heuristic::Manhattan;
use crate::moves::MoveSet;
use crate::stat::Stats;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Tunables shared by the hill-climbing family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestartParams {
    /// Steps per restart.
    pub max_iterations: usize,
    pub max_restarts: usize,
    /// Probability that a restart resumes from the best state found so far
    /// instead of the start.
    pub restart_from_best: f64,
    /// Consecutive non-improving steps tolerated before restarting.
    pub stuck_limit: usize,
}

impl RestartParams {
    pub fn hill_climbing() -> Self {
        RestartParams {
            max_iterations: 1000,
            max_restarts: 50,
            restart_from_best: 0.7,
            stuck_limit: 5,
        }
    }

    pub fn steepest_hill() -> Self {
        RestartParams {
            stuck_limit: 3,
            ..Self::hill_climbing()
        }
    }

    pub fn stochastic_hill() -> Self {
        RestartParams {
            max_iterations: 10000,
            max_restarts: 20,
            restart_from_best: 0.6,
            stuck_limit: 10,
        }
    }
}

/// Unvisited neighbors with their estimates, in generation order.
pub(super) type Candidates = [(State, usize)];

/// Hill climbing with random restarts.
///
/// `select` picks the index of the improving candidate to move to, or `None`
/// when no candidate beats the current score. Without an improvement the
/// climber steps to a random unvisited neighbor and gives up on the restart
/// after `stuck_limit` such steps in a row. A restart resumes either from the
/// start or from the path prefix that led to the best state so far, so every
/// returned path begins at `start`.
pub(super) fn climb_with_restarts(
    start: &State,
    goal: &State,
    moves: MoveSet,
    params: &RestartParams,
    rng: &mut StdRng,
    stats: &mut Stats,
    mut select: impl FnMut(&Candidates, usize, &mut StdRng) -> Option<usize>,
) -> Option<Path> {
    if !start.is_solvable(goal) {
        debug!("unsolvable instance");
        return None;
    }

    let heuristic = Manhattan::new(goal);
    let mut best_score = heuristic.estimate(start)?;
    let mut best_path = vec![start.clone()];

    for restart in 0..params.max_restarts {
        stats.iterations += 1;

        let resume_from_best =
            restart > 0 && best_path.len() > 1 && rng.gen::<f64>() < params.restart_from_best;
        let mut path = if resume_from_best {
            best_path.clone()
        } else {
            vec![start.clone()]
        };
        let mut visited: HashSet<State> = path.iter().cloned().collect();
        let mut current = path.last()?.clone();
        let mut current_score = heuristic.estimate(&current)?;
        let mut stuck = 0;

        for _ in 0..params.max_iterations {
            stats.expanded_nodes += 1;

            let candidates: Vec<(State, usize)> = moves
                .neighbors(&current)
                .into_iter()
                .filter(|neighbor| !visited.contains(neighbor))
                .filter_map(|neighbor| heuristic.estimate(&neighbor).map(|h| (neighbor, h)))
                .collect();

            let chosen = match select(&candidates, current_score, rng) {
                Some(idx) => {
                    stuck = 0;
                    idx
                }
                None => {
                    stuck += 1;
                    if stuck >= params.stuck_limit {
                        break;
                    }
                    let indices: Vec<usize> = (0..candidates.len()).collect();
                    match indices.choose(rng) {
                        Some(&idx) => idx,
                        None => break,
                    }
                }
            };

            let (next, next_score) = candidates[chosen].clone();
            trace!("step to {next} h={next_score}");
            visited.insert(next.clone());
            path.push(next.clone());
            current = next;
            current_score = next_score;

            if current == *goal {
                return Some(path);
            }
            if current_score < best_score {
                best_score = current_score;
                best_path = path.clone();
            }
        }

        debug!("restart {restart} ended at h={current_score}, best h={best_score}");
    }

    None
}

/// Indices of the candidates scoring strictly below `score`.
pub(super) fn improving(candidates: &Candidates, score: usize) -> Vec<usize> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, (_, h))| *h < score)
        .map(|(idx, _)| idx)
        .collect()
}
