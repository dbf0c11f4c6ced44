//! Monotonic cursors over level thresholds

use serde::{Deserialize, Serialize};

/// Ordered thresholds consumed front to back
///
/// A consumed threshold never refires; only `reset` rewinds the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdCursor {
    levels: Vec<u32>,
    index: usize,
}

impl ThresholdCursor {
    pub fn new(levels: Vec<u32>) -> Self {
        Self { levels, index: 0 }
    }

    /// Next unconsumed threshold
    pub fn current(&self) -> Option<u32> {
        self.levels.get(self.index).copied()
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.levels.len()
    }

    /// Thresholds not yet consumed
    pub fn remaining(&self) -> &[u32] {
        &self.levels[self.index.min(self.levels.len())..]
    }

    /// Next unconsumed threshold if `level` has reached it, with its position
    pub fn peek_next_reached(&self, level: u32) -> Option<(usize, u32)> {
        self.current()
            .filter(|threshold| *threshold <= level)
            .map(|threshold| (self.index, threshold))
    }

    /// Highest unconsumed threshold `<= level`, with its position in the list
    pub fn peek_highest_reached(&self, level: u32) -> Option<(usize, u32)> {
        self.levels
            .iter()
            .enumerate()
            .skip(self.index)
            .take_while(|(_, threshold)| **threshold <= level)
            .last()
            .map(|(i, threshold)| (i, *threshold))
    }

    /// Consume every threshold up to and including position `index`
    pub fn consume_through(&mut self, index: usize) {
        self.index = self.index.max((index + 1).min(self.levels.len()));
    }

    /// Consume every threshold `<= level` and resolve to the highest
    pub fn take_highest_reached(&mut self, level: u32) -> Option<(usize, u32)> {
        let reached = self.peek_highest_reached(level)?;
        self.consume_through(reached.0);
        Some(reached)
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_resolves_to_highest() {
        let mut cursor = ThresholdCursor::new(vec![5, 10, 15]);
        assert_eq!(cursor.take_highest_reached(4), None);
        assert_eq!(cursor.take_highest_reached(12), Some((1, 10)));
        assert_eq!(cursor.current(), Some(15));
        assert_eq!(cursor.remaining(), &[15]);
    }

    #[test]
    fn test_consumed_threshold_never_refires() {
        let mut cursor = ThresholdCursor::new(vec![5]);
        assert_eq!(cursor.take_highest_reached(5), Some((0, 5)));
        assert_eq!(cursor.take_highest_reached(5), None);
        assert_eq!(cursor.take_highest_reached(50), None);
        assert!(cursor.is_exhausted());

        cursor.reset();
        assert_eq!(cursor.current(), Some(5));
    }

    #[test]
    fn test_next_reached_steps_one_threshold() {
        let mut cursor = ThresholdCursor::new(vec![5, 10, 15]);
        assert_eq!(cursor.peek_next_reached(4), None);
        assert_eq!(cursor.peek_next_reached(12), Some((0, 5)));
        cursor.consume_through(0);
        assert_eq!(cursor.peek_next_reached(12), Some((1, 10)));
        cursor.consume_through(1);
        assert_eq!(cursor.peek_next_reached(12), None);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let cursor = ThresholdCursor::new(vec![7, 11]);
        assert_eq!(cursor.peek_highest_reached(11), Some((1, 11)));
        assert_eq!(cursor.current(), Some(7));
    }
}
