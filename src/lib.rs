pub mod board;
pub mod common;
pub mod config;
pub mod heuristic;
pub mod moves;
pub mod scenario;
pub mod solver;
pub mod stat;
