use crate::board::State;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Direction the blank slides in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Generation order. DFS and every tie-break depend on it.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

/// Target cell of the blank at `blank_index` moved in `dir`, if in bounds.
fn target_index(blank_index: usize, side: usize, dir: Direction) -> Option<usize> {
    let (dr, dc) = dir.delta();
    let row = (blank_index / side) as isize + dr;
    let col = (blank_index % side) as isize + dc;
    if row < 0 || col < 0 || row >= side as isize || col >= side as isize {
        return None;
    }
    Some(row as usize * side + col as usize)
}

/// Applies one blank slide. `None` if the move leaves the board or the state
/// has no blank.
pub fn slide(state: &State, dir: Direction) -> Option<State> {
    let side = state.side()?;
    let blank_index = state.blank_index()?;
    let target = target_index(blank_index, side, dir)?;
    Some(state.swapped(blank_index, target))
}

// Single moves paired with the blank's new index.
fn single_moves_with_blank(state: &State) -> Vec<(State, usize)> {
    let (Some(side), Some(blank_index)) = (state.side(), state.blank_index()) else {
        return Vec::new();
    };

    Direction::ALL
        .iter()
        .filter_map(|&dir| target_index(blank_index, side, dir))
        .map(|target| (state.swapped(blank_index, target), target))
        .collect()
}

// Second slides from every single move, skipping the one that undoes it.
fn double_moves(state: &State) -> Vec<State> {
    let (Some(side), Some(blank_index)) = (state.side(), state.blank_index()) else {
        return Vec::new();
    };

    let mut result = Vec::new();
    for (intermediate, intermediate_blank) in single_moves_with_blank(state) {
        for dir in Direction::ALL {
            match target_index(intermediate_blank, side, dir) {
                Some(target) if target != blank_index => {
                    result.push(intermediate.swapped(intermediate_blank, target));
                }
                _ => {}
            }
        }
    }
    result
}

/// States one blank slide away, in up, down, left, right order. Empty for a
/// malformed state.
pub fn single_move_neighbors(state: &State) -> Vec<State> {
    single_moves_with_blank(state)
        .into_iter()
        .map(|(neighbor, _)| neighbor)
        .collect()
}

/// Single moves followed by double moves, deduplicated in first-seen order.
/// Never contains `state` itself.
pub fn double_move_neighbors(state: &State) -> Vec<State> {
    let mut seen = HashSet::new();
    single_move_neighbors(state)
        .into_iter()
        .chain(double_moves(state))
        .filter(|neighbor| seen.insert(neighbor.clone()))
        .collect()
}

/// Single moves at cost 1 followed by double moves at cost 2. Not
/// deduplicated: a state reachable both ways appears with each cost.
pub fn weighted_neighbors(state: &State) -> Vec<(State, usize)> {
    single_move_neighbors(state)
        .into_iter()
        .map(|neighbor| (neighbor, 1))
        .chain(double_moves(state).into_iter().map(|neighbor| (neighbor, 2)))
        .collect()
}

/// Which neighbor pool an algorithm variant draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MoveSet {
    #[default]
    Single,
    Double,
}

impl MoveSet {
    pub fn neighbors(self, state: &State) -> Vec<State> {
        match self {
            MoveSet::Single => single_move_neighbors(state),
            MoveSet::Double => double_move_neighbors(state),
        }
    }

    pub fn weighted(self, state: &State) -> Vec<(State, usize)> {
        match self {
            MoveSet::Single => single_move_neighbors(state)
                .into_iter()
                .map(|neighbor| (neighbor, 1))
                .collect(),
            MoveSet::Double => weighted_neighbors(state),
        }
    }

    /// Whether `to` is one admissible move away from `from`.
    pub fn is_move(self, from: &State, to: &State) -> bool {
        self.neighbors(from).contains(to)
    }
}
