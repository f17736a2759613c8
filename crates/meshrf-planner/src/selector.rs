//! Greedy maximum-coverage site selection.
//!
//! Each round picks the unselected candidate that covers the most targets not
//! yet covered. Greedy selection is within `1 - 1/e` of the optimum for
//! maximum coverage; it is not exact.

use crate::CoverageMatrix;
use rayon::prelude::*;
use tracing::{debug, trace};

/// Outcome of a greedy selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionResult {
    /// Candidate indices in selection order.
    pub selected: Vec<usize>,
    /// Newly covered targets contributed by each selected candidate.
    pub gains: Vec<usize>,
    /// Targets covered by the whole selection.
    pub covered_targets: usize,
}

impl SelectionResult {
    /// Number of selected candidates.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Greedy selector with an optional site budget.
#[derive(Debug, Clone, Default)]
pub struct GreedySiteSelector {
    max_sites: Option<usize>,
    parallel: bool,
}

impl GreedySiteSelector {
    /// Unbounded, sequential selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after at most `max_sites` selections (`None` for no budget).
    pub fn with_max_sites(mut self, max_sites: Option<usize>) -> Self {
        self.max_sites = max_sites;
        self
    }

    /// Scan marginal gains on the rayon pool. The result is identical to the
    /// sequential scan.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run the selection.
    ///
    /// Stops when every target is covered, when the best marginal gain is
    /// zero, or when the budget (at most `num_candidates`) is spent. Ties go
    /// to the lowest candidate index.
    pub fn select(&self, matrix: &CoverageMatrix) -> SelectionResult {
        let num_candidates = matrix.num_candidates();
        let num_targets = matrix.num_targets();
        let limit = self
            .max_sites
            .map_or(num_candidates, |max| max.min(num_candidates));

        let mut covered = vec![false; num_targets];
        let mut taken = vec![false; num_candidates];
        let mut result = SelectionResult::default();

        while result.selected.len() < limit && result.covered_targets < num_targets {
            let Some((best, gain)) = self.best_candidate(matrix, &covered, &taken) else {
                break;
            };
            if gain == 0 {
                break;
            }

            for (done, &sees) in covered.iter_mut().zip(matrix.row(best)) {
                *done |= sees;
            }
            taken[best] = true;
            result.selected.push(best);
            result.gains.push(gain);
            result.covered_targets += gain;

            trace!(
                round = result.selected.len(),
                candidate = best,
                gain,
                covered = result.covered_targets,
                "Selected site"
            );
        }

        debug!(
            candidates = num_candidates,
            targets = num_targets,
            selected = result.selected.len(),
            covered = result.covered_targets,
            "Greedy selection complete"
        );
        result
    }

    /// Unselected candidate with the greatest marginal gain, lowest index on ties.
    fn best_candidate(
        &self,
        matrix: &CoverageMatrix,
        covered: &[bool],
        taken: &[bool],
    ) -> Option<(usize, usize)> {
        let gain = |candidate: usize| -> usize {
            matrix
                .row(candidate)
                .iter()
                .zip(covered)
                .filter(|&(&sees, &done)| sees && !done)
                .count()
        };

        if self.parallel {
            (0..matrix.num_candidates())
                .into_par_iter()
                .filter(|&c| !taken[c])
                .map(|c| (c, gain(c)))
                .reduce_with(prefer)
        } else {
            let mut best: Option<(usize, usize)> = None;
            for c in (0..matrix.num_candidates()).filter(|&c| !taken[c]) {
                let g = gain(c);
                if best.map_or(true, |(_, best_gain)| g > best_gain) {
                    best = Some((c, g));
                }
            }
            best
        }
    }
}

/// Reduction step: higher gain wins, then lower index.
fn prefer(a: (usize, usize), b: (usize, usize)) -> (usize, usize) {
    if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[u8]]) -> CoverageMatrix {
        let num_targets = rows.first().map_or(0, |r| r.len());
        let values: Vec<f32> = rows.iter().flat_map(|r| r.iter().map(|&v| v as f32)).collect();
        CoverageMatrix::from_flat(&values, rows.len(), num_targets).unwrap()
    }

    #[test]
    fn test_basic_greedy() {
        let m = matrix(&[&[1, 1, 0, 0], &[0, 1, 1, 1], &[1, 0, 0, 0]]);
        let result = GreedySiteSelector::new().select(&m);
        assert_eq!(result.selected, vec![1, 0]);
        assert_eq!(result.gains, vec![3, 1]);
        assert_eq!(result.covered_targets, 4);
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let m = matrix(&[&[0, 1, 1], &[1, 1, 0], &[1, 0, 1]]);
        let result = GreedySiteSelector::new().select(&m);
        // All rows gain 2; candidate 0 first, then 1 and 2 both gain 1
        assert_eq!(result.selected, vec![0, 1]);
    }

    #[test]
    fn test_all_zero_selects_nothing() {
        let m = matrix(&[&[0, 0], &[0, 0]]);
        assert!(GreedySiteSelector::new().select(&m).is_empty());
    }

    #[test]
    fn test_zero_targets_selects_nothing() {
        let m = CoverageMatrix::from_flat(&[], 3, 0).unwrap();
        assert!(GreedySiteSelector::new().select(&m).is_empty());
    }

    #[test]
    fn test_stops_when_gain_exhausted() {
        // Candidate 1 is redundant after candidate 0
        let m = matrix(&[&[1, 1, 0], &[1, 0, 0], &[0, 0, 0]]);
        let result = GreedySiteSelector::new().select(&m);
        assert_eq!(result.selected, vec![0]);
        assert_eq!(result.covered_targets, 2);
    }

    #[test]
    fn test_budget_limits_selection() {
        let m = matrix(&[&[1, 0, 0], &[0, 1, 0], &[0, 0, 1]]);
        let result = GreedySiteSelector::new().with_max_sites(Some(2)).select(&m);
        assert_eq!(result.selected, vec![0, 1]);

        let none = GreedySiteSelector::new().with_max_sites(Some(0)).select(&m);
        assert!(none.is_empty());

        let generous = GreedySiteSelector::new().with_max_sites(Some(10)).select(&m);
        assert_eq!(generous.selected, vec![0, 1, 2]);
    }

    #[test]
    fn test_parallel_scan_matches_sequential() {
        let m = matrix(&[
            &[1, 1, 0, 0, 1, 0],
            &[0, 1, 1, 1, 0, 0],
            &[1, 0, 0, 0, 1, 1],
            &[0, 0, 1, 1, 0, 1],
            &[1, 1, 1, 0, 0, 0],
        ]);
        let sequential = GreedySiteSelector::new().select(&m);
        let parallel = GreedySiteSelector::new().with_parallel(true).select(&m);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_prefer_is_order_independent() {
        assert_eq!(prefer((3, 5), (1, 5)), (1, 5));
        assert_eq!(prefer((1, 5), (3, 5)), (1, 5));
        assert_eq!(prefer((1, 4), (3, 5)), (3, 5));
        assert_eq!(prefer((3, 5), (1, 4)), (3, 5));
    }
}
