use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[serde(alias = "prev")]
    Previous,
    Next,
}

/// Moves `index` one step in `direction` within a list of `len` items.
/// Stops at either end instead of wrapping; an empty list always yields 0.
pub fn step(index: usize, len: usize, direction: Direction) -> usize {
    if len == 0 {
        return 0;
    }
    let last = len - 1;
    let index = index.min(last);
    match direction {
        Direction::Previous => index.saturating_sub(1),
        Direction::Next => (index + 1).min(last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_at_start_is_noop() {
        assert_eq!(step(0, 5, Direction::Previous), 0);
    }

    #[test]
    fn test_next_at_end_is_noop() {
        assert_eq!(step(4, 5, Direction::Next), 4);
    }

    #[test]
    fn test_moves_by_exactly_one_inside_bounds() {
        for i in 1..4 {
            assert_eq!(step(i, 5, Direction::Previous), i - 1);
            assert_eq!(step(i, 5, Direction::Next), i + 1);
        }
    }

    #[test]
    fn test_empty_list_stays_at_zero() {
        assert_eq!(step(0, 0, Direction::Next), 0);
        assert_eq!(step(3, 0, Direction::Previous), 0);
    }

    #[test]
    fn test_out_of_range_index_is_clamped_first() {
        assert_eq!(step(10, 3, Direction::Next), 2);
        assert_eq!(step(10, 3, Direction::Previous), 1);
    }

    #[test]
    fn test_direction_accepts_prev_alias() {
        let d: Direction = serde_json::from_str("\"prev\"").unwrap();
        assert_eq!(d, Direction::Previous);
        let d: Direction = serde_json::from_str("\"next\"").unwrap();
        assert_eq!(d, Direction::Next);
    }
}
