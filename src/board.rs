use serde::{Deserialize, Serialize};
use std::fmt;

/// A square sliding-tile board in row-major order.
///
/// A well-formed state of side `n` is a permutation of `1..=n*n`; the largest
/// value `n*n` is the blank. Nothing is checked on construction: malformed
/// states are representable so that the solvers can reject them gracefully.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(Vec<u8>);

impl State {
    pub fn new(tiles: Vec<u8>) -> Self {
        State(tiles)
    }

    /// The standard goal of side `side`: `1, 2, ..., side*side`. `None` for
    /// side 0 or boards whose blank value does not fit a tile (side > 15).
    pub fn solved(side: usize) -> Option<Self> {
        if side == 0 {
            return None;
        }
        let blank = u8::try_from(side.checked_mul(side)?).ok()?;
        Some(State((1..=blank).collect()))
    }

    pub fn tiles(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Board side if the length is a non-zero perfect square.
    pub fn side(&self) -> Option<usize> {
        let len = self.0.len();
        if len == 0 {
            return None;
        }
        let side = (len as f64).sqrt().round() as usize;
        (side * side == len).then_some(side)
    }

    /// Value used as the blank tile, i.e. `side * side`.
    pub fn blank(&self) -> Option<u8> {
        let side = self.side()?;
        u8::try_from(side * side).ok()
    }

    pub fn blank_index(&self) -> Option<usize> {
        let blank = self.blank()?;
        self.0.iter().position(|&tile| tile == blank)
    }

    /// True iff the state is a permutation of `1..=n*n` on a square board.
    pub fn is_valid(&self) -> bool {
        let Some(blank) = self.blank() else {
            return false;
        };
        let mut seen = vec![false; blank as usize + 1];
        for &tile in &self.0 {
            if tile == 0 || tile > blank || seen[tile as usize] {
                return false;
            }
            seen[tile as usize] = true;
        }
        true
    }

    /// Goal-relative parity test, see [`is_solvable`].
    pub fn is_solvable(&self, goal: &State) -> bool {
        is_solvable(self, goal)
    }

    /// Number of pairs of non-blank tiles that appear out of order.
    pub fn inversions(&self) -> usize {
        let blank = self.blank();
        let tiles: Vec<u8> = self
            .0
            .iter()
            .copied()
            .filter(|&tile| Some(tile) != blank)
            .collect();

        let mut inversions = 0;
        for i in 0..tiles.len() {
            for j in (i + 1)..tiles.len() {
                if tiles[i] > tiles[j] {
                    inversions += 1;
                }
            }
        }
        inversions
    }

    pub(crate) fn swapped(&self, a: usize, b: usize) -> State {
        let mut tiles = self.0.clone();
        tiles.swap(a, b);
        State(tiles)
    }
}

impl From<Vec<u8>> for State {
    fn from(tiles: Vec<u8>) -> Self {
        State(tiles)
    }
}

impl<const N: usize> From<[u8; N]> for State {
    fn from(tiles: [u8; N]) -> Self {
        State(tiles.to_vec())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let side = self.side().unwrap_or(self.0.len().max(1));
        let blank = self.blank();
        write!(f, "[")?;
        for (idx, tile) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, "{}", if idx % side == 0 { " | " } else { " " })?;
            }
            if Some(*tile) == blank {
                write!(f, "_")?;
            } else {
                write!(f, "{tile}")?;
            }
        }
        write!(f, "]")
    }
}

pub fn is_valid_state(state: &State) -> bool {
    state.is_valid()
}

/// Both boards well formed and of the same size.
pub fn is_valid_pair(start: &State, goal: &State) -> bool {
    start.len() == goal.len() && start.is_valid() && goal.is_valid()
}

/// Whether `goal` is reachable from `state` by single moves.
///
/// Compares the inversion parity of the two boards. On even-width boards the
/// row of the blank changes the parity of every vertical move, so the blank
/// row is folded into the parity there. Malformed or mismatched input is
/// reported as unsolvable.
pub fn is_solvable(state: &State, goal: &State) -> bool {
    if !is_valid_pair(state, goal) {
        return false;
    }
    let Some(side) = state.side() else {
        return false;
    };

    let parity = |board: &State| -> usize {
        let inversions = board.inversions();
        if side % 2 == 1 {
            inversions % 2
        } else {
            let blank_row = board.blank_index().map_or(0, |idx| idx / side);
            (inversions + blank_row) % 2
        }
    };

    parity(state) == parity(goal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_and_blank() {
        let state = State::from([1, 8, 2, 9, 4, 3, 7, 6, 5]);
        assert_eq!(state.side(), Some(3));
        assert_eq!(state.blank(), Some(9));
        assert_eq!(state.blank_index(), Some(3));

        assert_eq!(State::from([1, 2, 3]).side(), None);
        assert_eq!(State::new(vec![]).side(), None);
        assert_eq!(State::solved(4).unwrap().blank_index(), Some(15));
    }

    #[test]
    fn test_solved_limits() {
        assert_eq!(State::solved(2), Some(State::from([1, 2, 3, 4])));
        assert_eq!(State::solved(15).map(|state| state.len()), Some(225));
        assert_eq!(State::solved(15).and_then(|state| state.blank()), Some(225));
        assert_eq!(State::solved(16), None);
        assert_eq!(State::solved(0), None);
    }

    #[test]
    fn test_validity() {
        assert!(State::solved(3).unwrap().is_valid());
        assert!(State::from([4, 3, 2, 1]).is_valid());
        // Duplicate tile.
        assert!(!State::from([1, 1, 3, 4, 5, 6, 7, 8, 9]).is_valid());
        // Zero is not a tile.
        assert!(!State::from([0, 1, 2, 3, 4, 5, 6, 7, 8]).is_valid());
        // Not a perfect square.
        assert!(!State::from([1, 2, 3, 4, 5, 6, 7, 8]).is_valid());

        assert!(!is_valid_pair(&State::solved(3).unwrap(), &State::solved(4).unwrap()));
    }

    #[test]
    fn test_inversions_ignore_blank() {
        let state = State::from([9, 2, 1, 3, 4, 5, 6, 7, 8]);
        assert_eq!(state.inversions(), 1);
        assert_eq!(State::solved(3).unwrap().inversions(), 0);
    }

    #[test]
    fn test_solvability_odd_board() {
        let goal = State::solved(3).unwrap();
        assert!(is_solvable(&State::from([1, 8, 2, 9, 4, 3, 7, 6, 5]), &goal));
        assert!(!is_solvable(&State::from([2, 1, 3, 4, 5, 6, 7, 8, 9]), &goal));

        // Relative to an odd-parity goal the answer flips.
        let odd_goal = State::from([2, 1, 3, 4, 5, 6, 7, 8, 9]);
        assert!(is_solvable(&State::from([1, 3, 2, 4, 5, 6, 7, 8, 9]), &odd_goal));
    }

    #[test]
    fn test_solvability_even_board() {
        let goal = State::solved(2).unwrap();
        // Blank moved up once: reachable.
        assert!(is_solvable(&State::from([1, 4, 3, 2]), &goal));
        // Two tiles swapped: unreachable.
        assert!(!is_solvable(&State::from([2, 1, 3, 4]), &goal));
    }

    #[test]
    fn test_malformed_is_unsolvable() {
        let goal = State::solved(3).unwrap();
        assert!(!is_solvable(&State::from([1, 2, 3]), &goal));
        assert!(!is_solvable(&State::from([1, 1, 3, 4, 5, 6, 7, 8, 9]), &goal));
    }

    #[test]
    fn test_display() {
        let state = State::from([1, 8, 2, 9, 4, 3, 7, 6, 5]);
        assert_eq!(state.to_string(), "[1 8 2 | _ 4 3 | 7 6 5]");
    }
}
