//! Ordered transpose offsets plus the selected index.

use std::sync::OnceLock;

use regex::Regex;
use transpose_types::{TRANSPOSE_MAX, TRANSPOSE_MIN};

/// Circular navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn offset(self) -> i64 {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

fn number_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| match Regex::new(r"-?\d+") {
            Ok(re) => Some(re),
            Err(e) => {
                log::error!("transpose pattern failed to compile: {}", e);
                None
            }
        })
        .as_ref()
}

/// Every signed-integer run in `text`, left to right.
///
/// A leading `+` is not part of a run, so `+1` reads as `1`. Runs too large
/// for `i32` saturate and are then caught by [`validate_range`].
pub fn parse(text: &str) -> Vec<i32> {
    let Some(pattern) = number_pattern() else {
        return Vec::new();
    };
    pattern
        .find_iter(text)
        .map(|m| {
            let run = m.as_str();
            run.parse::<i32>().unwrap_or(if run.starts_with('-') { i32::MIN } else { i32::MAX })
        })
        .collect()
}

/// True iff every offset lies in `[-50, 50]`.
pub fn validate_range(sequence: &[i32]) -> bool {
    sequence.iter().all(|t| (TRANSPOSE_MIN..=TRANSPOSE_MAX).contains(t))
}

/// `(index + direction + len) % len`. Callers special-case `len == 0`.
pub fn neighbor(index: usize, len: usize, direction: Direction) -> usize {
    if len == 0 {
        return 0;
    }
    (index as i64 + direction.offset()).rem_euclid(len as i64) as usize
}

/// One entry of the monitor view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorItem {
    pub index: usize,
    pub transpose: i32,
}

/// Previous / current / next items around an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorWindow {
    pub previous: Option<MonitorItem>,
    pub current: Option<MonitorItem>,
    pub next: Option<MonitorItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransposeSequence {
    values: Vec<i32>,
    selected_index: usize,
}

impl TransposeSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// May be out of range after a backend push.
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Replace the whole sequence and reset selection to 0.
    ///
    /// Out-of-range input leaves everything untouched and returns false.
    pub fn replace(&mut self, values: Vec<i32>) -> bool {
        if !validate_range(&values) {
            return false;
        }
        self.values = values;
        self.selected_index = 0;
        true
    }

    /// Selection from the UI. Ignored when out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.values.len() {
            return false;
        }
        self.selected_index = index;
        true
    }

    /// Selection pushed by the backend, applied as-is.
    pub fn set_selected(&mut self, index: usize) {
        self.selected_index = index;
    }

    pub fn neighbor_of_selected(&self, direction: Direction) -> Option<usize> {
        if self.values.is_empty() {
            return None;
        }
        Some(neighbor(self.selected_index, self.values.len(), direction))
    }

    /// Items around `index` for the monitor view.
    pub fn window_at(&self, index: usize) -> MonitorWindow {
        window_around(&self.values, index)
    }
}

/// Previous / current / next around `index`. Tolerates an out-of-range index.
pub fn window_around(values: &[i32], index: usize) -> MonitorWindow {
    let len = values.len();
    if len == 0 {
        return MonitorWindow::default();
    }
    let item = |i: usize| MonitorItem { index: i, transpose: values[i] };
    let current = values.get(index).map(|_| item(index));
    let side = |direction| {
        let i = neighbor(index, len, direction);
        if i == index { None } else { Some(item(i)) }
    };
    MonitorWindow {
        previous: side(Direction::Previous),
        current,
        next: side(Direction::Next),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extracts_signed_runs() {
        assert_eq!(parse("0 -1 +1 1"), vec![0, -1, 1, 1]);
        assert_eq!(parse("abc"), Vec::<i32>::new());
        assert_eq!(parse(""), Vec::<i32>::new());
        assert_eq!(parse("3,-12;x7"), vec![3, -12, 7]);
        assert_eq!(parse("--4"), vec![-4]);
    }

    #[test]
    fn parse_saturates_huge_runs() {
        let parsed = parse("99999999999 -99999999999");
        assert_eq!(parsed, vec![i32::MAX, i32::MIN]);
        assert!(!validate_range(&parsed));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(validate_range(&[-50, 0, 50]));
        assert!(!validate_range(&[51]));
        assert!(!validate_range(&[0, -51]));
        assert!(validate_range(&[]));
    }

    #[test]
    fn neighbor_wraps() {
        assert_eq!(neighbor(0, 3, Direction::Previous), 2);
        assert_eq!(neighbor(2, 3, Direction::Next), 0);
        assert_eq!(neighbor(1, 3, Direction::Next), 2);
        assert_eq!(neighbor(0, 1, Direction::Next), 0);
    }

    #[test]
    fn neighbor_tolerates_out_of_range_index() {
        assert_eq!(neighbor(7, 3, Direction::Next), 2);
    }

    #[test]
    fn replace_is_all_or_nothing() {
        let mut seq = TransposeSequence::new();
        assert!(seq.replace(vec![0, 2, -2]));
        seq.select(2);
        assert!(!seq.replace(vec![1, 51]));
        assert_eq!(seq.values(), &[0, 2, -2]);
        assert_eq!(seq.selected_index(), 2);

        assert!(seq.replace(vec![5, 6]));
        assert_eq!(seq.selected_index(), 0);
    }

    #[test]
    fn ui_select_ignores_out_of_range() {
        let mut seq = TransposeSequence::new();
        seq.replace(vec![0, 1]);
        assert!(!seq.select(2));
        assert_eq!(seq.selected_index(), 0);
    }

    #[test]
    fn backend_select_is_trusted() {
        let mut seq = TransposeSequence::new();
        seq.replace(vec![0, 1]);
        seq.set_selected(9);
        assert_eq!(seq.selected_index(), 9);
        assert_eq!(seq.window_at(seq.selected_index()).current, None);
    }

    #[test]
    fn window_around_selection() {
        let mut seq = TransposeSequence::new();
        assert_eq!(seq.window_at(0), MonitorWindow::default());
        assert_eq!(seq.neighbor_of_selected(Direction::Next), None);

        seq.replace(vec![-1, 0, 1]);
        let w = seq.window_at(0);
        assert_eq!(w.previous, Some(MonitorItem { index: 2, transpose: 1 }));
        assert_eq!(w.current, Some(MonitorItem { index: 0, transpose: -1 }));
        assert_eq!(w.next, Some(MonitorItem { index: 1, transpose: 0 }));

        seq.replace(vec![4]);
        let w = seq.window_at(0);
        assert_eq!(w.current, Some(MonitorItem { index: 0, transpose: 4 }));
        assert_eq!(w.previous, None);
        assert_eq!(w.next, None);

        let w = seq.window_at(5);
        assert_eq!(w.current, None);
    }
}
