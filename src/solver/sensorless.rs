//! Sensorless (conformant) planning: the exact board is unknown, only a set
//! of candidates. A plan is one direction sequence that drives every
//! candidate into the target set.

use crate::board::State;
use crate::moves::{slide, Direction};
use crate::stat::Stats;

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Sorted multiset of candidate boards.
pub type Belief = Vec<State>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorlessParams {
    /// Cap on dequeued beliefs.
    pub max_iterations: usize,
}

impl Default for SensorlessParams {
    fn default() -> Self {
        SensorlessParams {
            max_iterations: 200_000,
        }
    }
}

/// Applies `dir` to every board. A board whose blank cannot move that way
/// stays as it is.
pub fn apply_to_belief(belief: &[State], dir: Direction) -> Belief {
    let mut next: Belief = belief
        .iter()
        .map(|state| slide(state, dir).unwrap_or_else(|| state.clone()))
        .collect();
    next.sort();
    next
}

/// Breadth-first search over beliefs.
pub struct SensorlessSearch {
    params: SensorlessParams,
    stats: Stats,
}

impl SensorlessSearch {
    pub fn new(params: SensorlessParams) -> Self {
        SensorlessSearch {
            params,
            stats: Stats::default(),
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Shortest plan for `belief`, `Some(vec![])` if every board already is a
    /// target, `None` for an empty belief, exhaustion or the iteration cap.
    #[instrument(skip_all, name = "sensorless", fields(boards = belief.len()), level = "debug")]
    pub fn solve(&mut self, belief: &[State], targets: &HashSet<State>) -> Option<Vec<Direction>> {
        let started = Instant::now();
        self.stats = Stats::default();

        let plan = self.search(belief, targets);

        self.stats.time_us = started.elapsed().as_micros() as usize;
        self.stats.path_len = plan.as_ref().map(|plan| plan.len());
        self.stats.print("sensorless");
        if let Some(plan) = &plan {
            info!(
                "plan: {}",
                plan.iter().map(|dir| dir.to_char()).collect::<String>()
            );
        }
        plan
    }

    fn search(&mut self, belief: &[State], targets: &HashSet<State>) -> Option<Vec<Direction>> {
        if belief.is_empty() {
            return None;
        }
        let all_targets = |belief: &[State]| belief.iter().all(|state| targets.contains(state));

        let mut initial = belief.to_vec();
        initial.sort();
        if all_targets(initial.as_slice()) {
            return Some(Vec::new());
        }

        let mut queue = VecDeque::from([(initial.clone(), Vec::new())]);
        let mut visited = HashSet::from([initial]);

        while let Some((current, plan)) = queue.pop_front() {
            self.stats.iterations += 1;
            if self.stats.iterations > self.params.max_iterations {
                debug!("iteration cap {} reached", self.params.max_iterations);
                return None;
            }
            self.stats.expanded_nodes += 1;

            for dir in Direction::ALL {
                let next = apply_to_belief(&current, dir);
                if visited.contains(&next) {
                    continue;
                }
                let mut next_plan: Vec<Direction> = plan.clone();
                next_plan.push(dir);
                if all_targets(next.as_slice()) {
                    return Some(next_plan);
                }
                visited.insert(next.clone());
                queue.push_back((next, next_plan));
            }
        }

        None
    }
}
