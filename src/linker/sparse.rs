use crate::linker::LinkerError;
use itertools::Itertools;

/// Cost matrix in compressed sparse row layout
///
/// Missing entries are forbidden assignments. Within a row, entries are ordered by column.
///
#[derive(Debug, Clone)]
pub struct SparseCostMatrix {
    n_rows: usize,
    n_cols: usize,
    row_starts: Vec<usize>,
    cols: Vec<usize>,
    costs: Vec<f64>,
}

impl SparseCostMatrix {
    /// Builds the matrix from `(row, col, cost)` entries given in any order
    ///
    /// # Errors
    /// Fails when an entry lies outside of the matrix, is defined twice or its cost is not finite.
    ///
    pub fn from_entries(
        n_rows: usize,
        n_cols: usize,
        mut entries: Vec<(usize, usize, f64)>,
    ) -> Result<Self, LinkerError> {
        for &(row, col, cost) in &entries {
            if row >= n_rows || col >= n_cols {
                return Err(LinkerError::IndexOutOfBounds {
                    row,
                    col,
                    n_rows,
                    n_cols,
                });
            }
            if cost.is_nan() {
                return Err(LinkerError::NonNumericCost { row, col });
            }
            if !cost.is_finite() {
                return Err(LinkerError::NonFiniteCost { row, col, cost });
            }
        }

        entries.sort_unstable_by_key(|&(row, col, _)| (row, col));
        if let Some(((row, col, _), _)) = entries
            .iter()
            .tuple_windows()
            .find(|(a, b)| a.0 == b.0 && a.1 == b.1)
        {
            return Err(LinkerError::DuplicateEntry {
                row: *row,
                col: *col,
            });
        }

        let mut row_starts = vec![0; n_rows + 1];
        for &(row, _, _) in &entries {
            row_starts[row + 1] += 1;
        }
        for r in 0..n_rows {
            row_starts[r + 1] += row_starts[r];
        }

        let (cols, costs) = entries.into_iter().map(|(_, c, v)| (c, v)).unzip();

        Ok(Self {
            n_rows,
            n_cols,
            row_starts,
            cols,
            costs,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of defined entries
    ///
    pub fn nnz(&self) -> usize {
        self.cols.len()
    }

    /// Defined entries of the row as `(col, cost)`
    ///
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_starts[row]..self.row_starts[row + 1];
        self.cols[range.clone()]
            .iter()
            .copied()
            .zip(self.costs[range].iter().copied())
    }

    /// Cost at `(row, col)` if the entry is defined
    ///
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.n_rows {
            return None;
        }
        let range = self.row_starts[row]..self.row_starts[row + 1];
        self.cols[range.clone()]
            .binary_search(&col)
            .ok()
            .map(|i| self.costs[range.start + i])
    }
}

#[cfg(test)]
mod tests {
    use crate::linker::sparse::SparseCostMatrix;
    use crate::linker::LinkerError;

    #[test]
    fn build_and_lookup() {
        let m = SparseCostMatrix::from_entries(
            3,
            4,
            vec![(2, 0, 5.0), (0, 3, 1.0), (0, 1, 2.0), (2, 2, 0.5)],
        )
        .unwrap();
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.n_cols(), 4);
        assert_eq!(m.nnz(), 4);
        assert_eq!(m.row(0).collect::<Vec<_>>(), vec![(1, 2.0), (3, 1.0)]);
        assert_eq!(m.row(1).count(), 0);
        assert_eq!(m.row(2).collect::<Vec<_>>(), vec![(0, 5.0), (2, 0.5)]);
        assert_eq!(m.get(0, 3), Some(1.0));
        assert_eq!(m.get(1, 3), None);
        assert_eq!(m.get(7, 0), None);
    }

    #[test]
    fn rejects_bad_entries() {
        assert!(matches!(
            SparseCostMatrix::from_entries(2, 2, vec![(2, 0, 1.0)]),
            Err(LinkerError::IndexOutOfBounds { row: 2, .. })
        ));
        assert!(matches!(
            SparseCostMatrix::from_entries(2, 2, vec![(0, 1, f64::NAN)]),
            Err(LinkerError::NonNumericCost { row: 0, col: 1 })
        ));
        assert!(matches!(
            SparseCostMatrix::from_entries(2, 2, vec![(0, 1, f64::INFINITY)]),
            Err(LinkerError::NonFiniteCost { row: 0, col: 1, .. })
        ));
        assert!(matches!(
            SparseCostMatrix::from_entries(2, 2, vec![(1, 1, 1.0), (0, 0, 1.0), (1, 1, 2.0)]),
            Err(LinkerError::DuplicateEntry { row: 1, col: 1 })
        ));
    }
}
