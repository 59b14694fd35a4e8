use thiserror::Error;

/// Compressed sparse row cost matrix
pub mod sparse;

/// Shortest augmenting path solver for sparse square assignment problems
pub mod lap;

/// Partial source to target matching with opt-out costs
pub mod jaqaman;

pub use jaqaman::SparseJaqamanLinker;
pub use lap::{LapSolution, SparseLapSolver};
pub use sparse::SparseCostMatrix;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinkerError {
    #[error("The cost threshold must be positive and finite, got {0}.")]
    InvalidCostThreshold(f64),
    #[error("The alternative cost factor must be non-negative and finite, got {0}.")]
    InvalidAlternativeCostFactor(f64),
    #[error("The cutoff percentile must be within [0, 100], got {0}.")]
    InvalidPercentile(f64),
    #[error("The cost at ({row}, {col}) is not a number.")]
    NonNumericCost { row: usize, col: usize },
    #[error("The cost at ({row}, {col}) is negative: {cost}.")]
    NegativeCost { row: usize, col: usize, cost: f64 },
    #[error("The cost at ({row}, {col}) is not finite: {cost}.")]
    NonFiniteCost { row: usize, col: usize, cost: f64 },
    #[error("The entry ({row}, {col}) lies outside of the {n_rows}x{n_cols} matrix.")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        n_rows: usize,
        n_cols: usize,
    },
    #[error("The entry ({row}, {col}) is defined more than once.")]
    DuplicateEntry { row: usize, col: usize },
    #[error("The assignment problem must be square, got {n_rows}x{n_cols}.")]
    NotSquare { n_rows: usize, n_cols: usize },
    #[error("Column {col} has no entry, the assignment problem is infeasible.")]
    EmptyColumn { col: usize },
    #[error("No augmenting path starts at row {row}, the assignment problem is infeasible.")]
    Infeasible { row: usize },
}

/// Outcome of linking a source sequence to a target sequence
///
/// `links[i]` holds the target index and the realized linking cost of the source `i`,
/// or `None` when the source stays unlinked.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentResult {
    pub links: Vec<Option<(usize, f64)>>,
    pub alternative_cost: Option<f64>,
}

impl AssignmentResult {
    /// Result where none of the sources is linked
    ///
    pub fn unassigned(n_sources: usize) -> Self {
        Self {
            links: vec![None; n_sources],
            alternative_cost: None,
        }
    }

    /// Target index per source
    ///
    pub fn assignment(&self) -> Vec<Option<usize>> {
        self.links.iter().map(|l| l.map(|(t, _)| t)).collect()
    }

    /// Accepted links as `(source, target, cost)`
    ///
    pub fn linked(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.links
            .iter()
            .enumerate()
            .filter_map(|(s, l)| l.map(|(t, c)| (s, t, c)))
    }

    pub fn n_links(&self) -> usize {
        self.links.iter().filter(|l| l.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use crate::linker::AssignmentResult;

    #[test]
    fn assignment_accessors() {
        let res = AssignmentResult {
            links: vec![Some((1, 0.5)), None, Some((0, 2.0))],
            alternative_cost: Some(3.0),
        };
        assert_eq!(res.assignment(), vec![Some(1), None, Some(0)]);
        assert_eq!(res.n_links(), 2);
        assert_eq!(
            res.linked().collect::<Vec<_>>(),
            vec![(0, 1, 0.5), (2, 0, 2.0)]
        );

        let res = AssignmentResult::unassigned(3);
        assert_eq!(res.assignment(), vec![None, None, None]);
        assert_eq!(res.n_links(), 0);
    }
}
