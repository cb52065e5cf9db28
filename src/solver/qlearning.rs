use super::{settle, Solver};
use crate::board::State;
use crate::common::Path;
use crate::moves::MoveSet;
use crate::stat::Stats;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, info, instrument};

const GOAL_REWARD: f64 = 100.0;
const STEP_REWARD: f64 = -1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QLearningParams {
    /// Learning rate.
    pub alpha: f64,
    /// Discount factor.
    pub gamma: f64,
    /// Exploration probability.
    pub epsilon: f64,
    pub episodes: usize,
    pub max_steps: usize,
    pub max_path_len: usize,
}

impl Default for QLearningParams {
    fn default() -> Self {
        QLearningParams {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.1,
            episodes: 1000,
            max_steps: 200,
            max_path_len: 50,
        }
    }
}

/// Tabular Q-learning agent for one goal. Actions are the neighboring
/// states themselves.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    goal: State,
    moves: MoveSet,
    params: QLearningParams,
    q_table: HashMap<State, HashMap<State, f64>>,
    training_episodes: usize,
    nodes_expanded: usize,
}

impl QLearningAgent {
    pub fn new(goal: State, moves: MoveSet, params: QLearningParams) -> Self {
        QLearningAgent {
            goal,
            moves,
            params,
            q_table: HashMap::new(),
            training_episodes: 0,
            nodes_expanded: 0,
        }
    }

    pub fn goal(&self) -> &State {
        &self.goal
    }

    pub fn training_episodes(&self) -> usize {
        self.training_episodes
    }

    /// Number of Q-value updates made so far.
    pub fn nodes_expanded(&self) -> usize {
        self.nodes_expanded
    }

    pub fn knows(&self, state: &State) -> bool {
        self.q_table.contains_key(state)
    }

    pub fn q_value(&self, state: &State, action: &State) -> f64 {
        self.q_table
            .get(state)
            .and_then(|actions| actions.get(action))
            .copied()
            .unwrap_or(0.0)
    }

    fn reward(&self, state: &State) -> f64 {
        if *state == self.goal {
            GOAL_REWARD
        } else {
            STEP_REWARD
        }
    }

    // All actions reaching the highest Q-value, in generation order.
    fn best_actions(&self, state: &State, actions: Vec<State>) -> Vec<State> {
        let best = actions
            .iter()
            .map(|action| self.q_value(state, action))
            .fold(f64::NEG_INFINITY, f64::max);
        actions
            .into_iter()
            .filter(|action| self.q_value(state, action) == best)
            .collect()
    }

    /// Epsilon-greedy choice; ties between maximizers are broken at random.
    pub fn choose_action(&self, state: &State, rng: &mut StdRng) -> Option<State> {
        let actions = self.moves.neighbors(state);
        if actions.is_empty() {
            return None;
        }
        if rng.gen::<f64>() < self.params.epsilon {
            return actions.choose(rng).cloned();
        }
        self.best_actions(state, actions).choose(rng).cloned()
    }

    /// One Bellman update of `Q(state, action)` towards
    /// `reward + gamma * max Q(next, .)`.
    pub fn learn(&mut self, state: &State, action: &State, reward: f64, next: &State) {
        self.nodes_expanded += 1;

        let old_value = self.q_value(state, action);
        let max_future = self
            .moves
            .neighbors(next)
            .iter()
            .map(|future| self.q_value(next, future))
            .fold(None, |max: Option<f64>, value| Some(max.map_or(value, |max| max.max(value))))
            .unwrap_or(0.0);
        let new_value = old_value
            + self.params.alpha * (reward + self.params.gamma * max_future - old_value);

        self.q_table
            .entry(state.clone())
            .or_default()
            .insert(action.clone(), new_value);
    }

    /// Runs the configured number of episodes from `start`. An episode ends
    /// at the goal or after `max_steps` actions.
    pub fn train(&mut self, start: &State, rng: &mut StdRng) {
        let report_every = (self.params.episodes / 10).max(1);

        for episode in 0..self.params.episodes {
            let mut current = start.clone();
            for _ in 0..self.params.max_steps {
                let Some(action) = self.choose_action(&current, rng) else {
                    break;
                };
                let reward = self.reward(&action);
                self.learn(&current, &action, reward, &action);
                current = action;
                if current == self.goal {
                    break;
                }
            }
            self.training_episodes += 1;

            if episode > 0 && episode % report_every == 0 {
                debug!("episode {episode}, Q-table size {}", self.q_table.len());
            }
        }

        info!(
            "Q-learning trained {} episodes, {} updates",
            self.training_episodes, self.nodes_expanded
        );
    }

    /// Follows the highest Q-values from `start`, never revisiting a state on
    /// the path. `None` if the walk runs out of fresh actions or of length.
    pub fn policy_path(&self, start: &State, rng: &mut StdRng) -> Option<Path> {
        let mut path = vec![start.clone()];
        let mut on_path = HashSet::from([start.clone()]);
        let mut current = start.clone();

        for _ in 0..self.params.max_path_len {
            if current == self.goal {
                break;
            }
            let fresh: Vec<State> = self
                .moves
                .neighbors(&current)
                .into_iter()
                .filter(|action| !on_path.contains(action))
                .collect();
            let next = self.best_actions(&current, fresh).choose(rng).cloned()?;

            on_path.insert(next.clone());
            path.push(next.clone());
            current = next;
        }

        (current == self.goal).then_some(path)
    }
}

/// Solver owning a Q-learning agent. The agent and its table are kept across
/// calls while the goal stays the same; a new goal discards them.
pub struct QLearning {
    moves: MoveSet,
    params: QLearningParams,
    rng: StdRng,
    agent: Option<QLearningAgent>,
    stats: Stats,
}

impl QLearning {
    pub fn new(moves: MoveSet, params: QLearningParams, seed: u64) -> Self {
        QLearning {
            moves,
            params,
            rng: StdRng::seed_from_u64(seed),
            agent: None,
            stats: Stats::default(),
        }
    }

    pub fn agent(&self) -> Option<&QLearningAgent> {
        self.agent.as_ref()
    }

    /// Like [`Solver::solve`], also returning the agent's update count.
    pub fn solve_with_count(&mut self, start: &State, goal: &State) -> (Option<Path>, usize) {
        let path = self.solve(start, goal);
        (path, self.stats.expanded_nodes)
    }

    fn search(&mut self, start: &State, goal: &State) -> Option<Path> {
        if self.agent.as_ref().map_or(true, |agent| agent.goal() != goal) {
            debug!("new goal, starting from an empty Q-table");
            self.agent = Some(QLearningAgent::new(
                goal.clone(),
                self.moves,
                self.params.clone(),
            ));
        }
        let agent = self.agent.as_mut()?;

        // Training is the expensive part; reuse the table unless it has never
        // seen this start.
        if agent.training_episodes() == 0 || !agent.knows(start) {
            agent.train(start, &mut self.rng);
            self.stats.iterations = self.params.episodes;
        }
        self.stats.expanded_nodes = agent.nodes_expanded();

        agent.policy_path(start, &mut self.rng)
    }
}

impl Solver for QLearning {
    fn name(&self) -> &'static str {
        match self.moves {
            MoveSet::Single => "q_learning",
            MoveSet::Double => "q_learning_double",
        }
    }

    #[instrument(skip_all, name = "q_learning", fields(moves = ?self.moves), level = "debug")]
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
