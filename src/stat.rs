use crate::common::Path;

use serde::Serialize;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub expanded_nodes: usize,
    // Outer loop count: depth limits, thresholds, restarts, episodes or
    // annealing steps, depending on the algorithm.
    pub iterations: usize,
    pub path_len: Option<usize>,
    pub time_us: usize,
}

impl Stats {
    pub(crate) fn finish(&mut self, started: Instant, path: &Option<Path>) {
        self.time_us = started.elapsed().as_micros() as usize;
        self.path_len = path.as_ref().map(|path| path.len());
    }

    pub fn print(&self, solver: &str) {
        info!(
            "{solver}: Path length {:?} Time(microseconds) {:?} Expanded nodes {:?} Iterations {:?}",
            self.path_len, self.time_us, self.expanded_nodes, self.iterations
        );
    }
}
