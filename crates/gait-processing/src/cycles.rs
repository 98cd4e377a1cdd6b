//! Cycle categorization and mid-set selection

use crate::intervals::{CategoryId, IntervalMap};
use std::collections::BTreeMap;
use tracing::debug;

/// Category id -> ordered peak indices
pub type CategorizedCycles = BTreeMap<CategoryId, Vec<usize>>;

/// Assign each peak to the interval whose closed range contains it.
///
/// Every interval gets an entry, possibly empty. Peaks in rest gaps are
/// dropped.
pub fn categorize(peaks: &[usize], intervals: &IntervalMap) -> CategorizedCycles {
    intervals
        .iter()
        .map(|(&category, interval)| {
            let members = peaks.iter().copied().filter(|&p| interval.contains(p)).collect();
            (category, members)
        })
        .collect()
}

/// Keep a centered run of `n_cycles` peaks per category.
///
/// Categories with fewer than `n_cycles` peaks are omitted; the window is
/// shifted, never truncated, so kept categories always hold exactly
/// `n_cycles` peaks.
pub fn select_middle(categorized: &CategorizedCycles, n_cycles: usize) -> CategorizedCycles {
    let mut selected = CategorizedCycles::new();

    for (&category, cycles) in categorized {
        let len = cycles.len();
        if len < n_cycles {
            debug!(category, available = len, required = n_cycles, "category below selection size");
            continue;
        }

        let mid = len / 2;
        let mut start = mid.saturating_sub(n_cycles / 2);
        if start + n_cycles > len {
            start = len - n_cycles;
        }

        selected.insert(category, cycles[start..start + n_cycles].to_vec());
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intervals::Interval;

    fn intervals(bounds: &[(usize, usize)]) -> IntervalMap {
        (1..)
            .zip(bounds.iter())
            .map(|(id, &(start_idx, end_idx))| (id, Interval { start_idx, end_idx }))
            .collect()
    }

    #[test]
    fn test_closed_range_membership() {
        let map = intervals(&[(100, 200), (500, 900)]);
        let peaks = [50, 100, 150, 200, 300, 499, 500, 900, 950];

        let categorized = categorize(&peaks, &map);
        assert_eq!(categorized[&1], vec![100, 150, 200]);
        assert_eq!(categorized[&2], vec![500, 900]);
    }

    #[test]
    fn test_empty_interval_kept() {
        let map = intervals(&[(0, 10), (20, 30)]);
        let categorized = categorize(&[5], &map);
        assert_eq!(categorized[&1], vec![5]);
        assert!(categorized[&2].is_empty());
    }

    #[test]
    fn test_exact_count_unmodified() {
        let peaks: Vec<usize> = (0..10).map(|k| 40 * k + 7).collect();
        let categorized: CategorizedCycles = [(1, peaks.clone())].into_iter().collect();

        let selected = select_middle(&categorized, 10);
        assert_eq!(selected[&1], peaks);
    }

    #[test]
    fn test_centered_window() {
        let peaks: Vec<usize> = (0..25).map(|k| 30 * k).collect();
        let categorized: CategorizedCycles = [(1, peaks.clone())].into_iter().collect();

        let selected = select_middle(&categorized, 10);
        assert_eq!(selected[&1], peaks[7..17].to_vec());
    }

    #[test]
    fn test_small_categories_dropped() {
        let categorized: CategorizedCycles = [
            (1, (0..9).collect::<Vec<usize>>()),
            (2, (0..14).collect::<Vec<usize>>()),
            (3, Vec::new()),
        ]
        .into_iter()
        .collect();

        let selected = select_middle(&categorized, 10);
        assert_eq!(selected.keys().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_selection_sizes() {
        for len in 0..40usize {
            for n in 1..12usize {
                let categorized: CategorizedCycles =
                    [(1, (0..len).collect::<Vec<usize>>())].into_iter().collect();
                let selected = select_middle(&categorized, n);
                if len < n {
                    assert!(selected.is_empty());
                } else {
                    let run = &selected[&1];
                    assert_eq!(run.len(), n);
                    assert!(run.windows(2).all(|w| w[1] == w[0] + 1));
                }
            }
        }
    }
}
