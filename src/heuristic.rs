use crate::board::State;

/// Manhattan distance to a fixed goal.
///
/// The goal's tile positions are indexed once, so a solver builds one
/// evaluator per solve and calls [`Manhattan::estimate`] per state.
#[derive(Debug, Clone)]
pub struct Manhattan {
    side: Option<usize>,
    blank: Option<u8>,
    // goal_index[tile] = position of `tile` in the goal.
    goal_index: Vec<Option<usize>>,
}

impl Manhattan {
    pub fn new(goal: &State) -> Self {
        let mut goal_index = vec![None; u8::MAX as usize + 1];
        for (idx, &tile) in goal.tiles().iter().enumerate() {
            goal_index[tile as usize] = Some(idx);
        }

        Manhattan {
            side: goal.side(),
            blank: goal.blank(),
            goal_index,
        }
    }

    /// Sum of row and column offsets of every non-blank tile.
    ///
    /// `None` stands for an infinite estimate: the boards differ in size, a
    /// board is not square, or a tile does not occur in the goal. Callers
    /// drop such states.
    pub fn estimate(&self, state: &State) -> Option<usize> {
        let side = self.side?;
        if state.side() != Some(side) {
            return None;
        }

        let mut total = 0;
        for (idx, &tile) in state.tiles().iter().enumerate() {
            if Some(tile) == self.blank {
                continue;
            }
            let goal_idx = self.goal_index[tile as usize]?;
            total += (idx / side).abs_diff(goal_idx / side) + (idx % side).abs_diff(goal_idx % side);
        }
        Some(total)
    }
}

pub fn manhattan_distance(state: &State, goal: &State) -> Option<usize> {
    Manhattan::new(goal).estimate(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_basic() {
        let goal = State::solved(3).unwrap();
        assert_eq!(manhattan_distance(&goal, &goal), Some(0));
        assert_eq!(
            manhattan_distance(&State::from([1, 2, 3, 4, 5, 6, 7, 9, 8]), &goal),
            Some(1)
        );
        assert_eq!(
            manhattan_distance(&State::from([1, 8, 2, 9, 4, 3, 7, 6, 5]), &goal),
            Some(9)
        );
    }

    #[test]
    fn test_manhattan_custom_goal() {
        let goal = State::from([1, 2, 3, 8, 9, 4, 7, 6, 5]);
        let heuristic = Manhattan::new(&goal);
        assert_eq!(heuristic.estimate(&goal), Some(0));
        // Tile 8 one step right of its goal cell.
        assert_eq!(
            heuristic.estimate(&State::from([1, 2, 3, 9, 8, 4, 7, 6, 5])),
            Some(1)
        );
    }

    #[test]
    fn test_manhattan_sentinels() {
        let goal = State::solved(3).unwrap();
        // Size mismatch.
        assert_eq!(manhattan_distance(&State::solved(2).unwrap(), &goal), None);
        // Not square.
        assert_eq!(manhattan_distance(&State::from([1, 2, 3]), &goal), None);
        assert_eq!(manhattan_distance(&goal, &State::from([1, 2, 3])), None);
        // Tile missing from the goal.
        assert_eq!(
            manhattan_distance(&State::from([1, 2, 3, 4, 5, 6, 7, 8, 10]), &goal),
            None
        );
    }
}
