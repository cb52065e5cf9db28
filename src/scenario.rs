use crate::board::State;
use crate::moves::single_move_neighbors;

use anyhow::Context;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub start: State,
    pub goal: State,
}

/// A batch of puzzle instances, stored as YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub instances: Vec<Instance>,
}

impl Scenario {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let yaml = fs::read_to_string(path).with_context(|| format!("reading scenario {path}"))?;
        Self::from_yaml_str(&yaml).with_context(|| format!("parsing scenario {path}"))
    }

    pub fn write_to_file(&self, path: &str) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml).with_context(|| format!("writing scenario {path}"))
    }

    /// Up to `count` distinct instances, each scrambled from `goal` by a
    /// random walk of between `depth / 2` and `depth` moves.
    pub fn generate<R: Rng + ?Sized>(count: usize, goal: &State, depth: usize, rng: &mut R) -> Self {
        let mut seen = HashSet::new();
        let mut instances = Vec::new();
        let low = (depth / 2).max(1).min(depth);
        let max_attempts = count * 200;

        for _ in 0..max_attempts {
            if instances.len() == count {
                break;
            }
            let start = scramble(goal, rng.gen_range(low..=depth), rng);
            if seen.insert(start.clone()) {
                instances.push(Instance {
                    start,
                    goal: goal.clone(),
                });
            }
        }

        if instances.len() < count {
            warn!(
                "only generated {} of {count} distinct instances",
                instances.len()
            );
        }
        info!("generated {} instances", instances.len());
        Scenario { instances }
    }
}

/// Random walk of `depth` single moves from `goal`. The result is always
/// solvable with respect to `goal`.
pub fn scramble<R: Rng + ?Sized>(goal: &State, depth: usize, rng: &mut R) -> State {
    let mut state = goal.clone();
    for _ in 0..depth {
        match single_move_neighbors(&state).choose(rng) {
            Some(next) => state = next.clone(),
            None => break,
        }
    }
    state
}

/// Uniformly shuffled board of the same size as `goal` that can reach it.
/// `None` if `goal` is malformed.
pub fn random_solvable_state<R: Rng + ?Sized>(goal: &State, rng: &mut R) -> Option<State> {
    if !goal.is_valid() {
        return None;
    }
    let mut tiles = goal.tiles().to_vec();
    loop {
        tiles.shuffle(rng);
        let state = State::new(tiles.clone());
        if state.is_solvable(goal) {
            return Some(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scramble_is_solvable() {
        let goal = State::solved(3).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        for depth in [0, 1, 5, 30] {
            let state = scramble(&goal, depth, &mut rng);
            assert!(state.is_valid());
            assert!(state.is_solvable(&goal));
        }
        assert_eq!(scramble(&goal, 0, &mut rng), goal);
    }

    #[test]
    fn test_random_solvable_state() {
        let mut rng = StdRng::seed_from_u64(1);
        for side in [2, 3, 4] {
            let goal = State::solved(side).unwrap();
            let state = random_solvable_state(&goal, &mut rng).unwrap();
            assert_eq!(state.len(), goal.len());
            assert!(state.is_solvable(&goal));
        }
        assert_eq!(random_solvable_state(&State::from([1, 2, 3]), &mut rng), None);
    }

    #[test]
    fn test_generate_distinct() {
        let goal = State::solved(3).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let scenario = Scenario::generate(10, &goal, 12, &mut rng);
        assert_eq!(scenario.instances.len(), 10);
        let starts: HashSet<_> = scenario.instances.iter().map(|i| i.start.clone()).collect();
        assert_eq!(starts.len(), 10);
        assert!(scenario.instances.iter().all(|i| i.goal == goal));

        // Only two boards are one move from the goal.
        let scenario = Scenario::generate(5, &goal, 1, &mut rng);
        assert_eq!(scenario.instances.len(), 2);
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = "instances:\n  - start: [1, 8, 2, 9, 4, 3, 7, 6, 5]\n    goal: [1, 2, 3, 4, 5, 6, 7, 8, 9]\n";
        let scenario = Scenario::from_yaml_str(yaml).unwrap();
        assert_eq!(scenario.instances.len(), 1);
        assert_eq!(scenario.instances[0].start, State::from([1, 8, 2, 9, 4, 3, 7, 6, 5]));

        let written = serde_yaml::to_string(&scenario).unwrap();
        assert_eq!(Scenario::from_yaml_str(&written).unwrap(), scenario);
        assert!(Scenario::from_yaml_str("instances: 3").is_err());
    }
}
