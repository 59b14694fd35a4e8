use crate::linker::sparse::SparseCostMatrix;
use crate::linker::LinkerError;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

const NONE: usize = usize::MAX;

/// Complete assignment of a square problem
///
#[derive(Debug, Clone, Default)]
pub struct LapSolution {
    /// Column assigned to every row
    pub col_for_row: Vec<usize>,
    /// Row assigned to every column
    pub row_for_col: Vec<usize>,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    dist: f64,
    col: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// reversed: the heap pops the closest column first
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.col.cmp(&self.col))
    }
}

/// Minimum cost perfect matching of a sparse square cost matrix
///
/// The solver follows the Jonker-Volgenant scheme:
/// 1. column reduction assigns every column to its cheapest row when that row is still free
///    and initializes the column duals;
/// 2. every remaining free row is assigned along a shortest augmenting path found with
///    Dijkstra over reduced costs, after which the dual potentials are updated so that
///    reduced costs stay non-negative.
///
/// Only the defined entries of the matrix are ever visited.
///
pub struct SparseLapSolver<'a> {
    matrix: &'a SparseCostMatrix,
    u: Vec<f64>,
    v: Vec<f64>,
    col_for_row: Vec<usize>,
    row_for_col: Vec<usize>,
    dist: Vec<f64>,
    path: Vec<usize>,
    done: Vec<bool>,
    touched: Vec<usize>,
    scanned_rows: Vec<usize>,
    scanned_cols: Vec<usize>,
    heap: BinaryHeap<Candidate>,
}

impl<'a> SparseLapSolver<'a> {
    pub fn new(matrix: &'a SparseCostMatrix) -> Self {
        let n = matrix.n_rows();
        Self {
            matrix,
            u: vec![0.0; n],
            v: vec![f64::INFINITY; n],
            col_for_row: vec![NONE; n],
            row_for_col: vec![NONE; n],
            dist: vec![f64::INFINITY; n],
            path: vec![NONE; n],
            done: vec![false; n],
            touched: Vec::default(),
            scanned_rows: Vec::default(),
            scanned_cols: Vec::default(),
            heap: BinaryHeap::default(),
        }
    }

    /// Solves the problem
    ///
    /// # Errors
    /// * [LinkerError::NotSquare] - the matrix is rectangular;
    /// * [LinkerError::EmptyColumn] or [LinkerError::Infeasible] - no perfect matching exists
    ///   over the defined entries.
    ///
    pub fn solve(mut self) -> Result<LapSolution, LinkerError> {
        let (n_rows, n_cols) = (self.matrix.n_rows(), self.matrix.n_cols());
        if n_rows != n_cols {
            return Err(LinkerError::NotSquare { n_rows, n_cols });
        }

        self.column_reduction()?;

        for row in 0..n_rows {
            if self.col_for_row[row] == NONE {
                self.augment(row)?;
            }
        }

        let total_cost = self
            .col_for_row
            .iter()
            .enumerate()
            .filter_map(|(r, c)| self.matrix.get(r, *c))
            .sum();

        Ok(LapSolution {
            col_for_row: self.col_for_row,
            row_for_col: self.row_for_col,
            total_cost,
        })
    }

    fn column_reduction(&mut self) -> Result<(), LinkerError> {
        let matrix = self.matrix;
        let mut cheapest_row = vec![NONE; matrix.n_cols()];
        for r in 0..matrix.n_rows() {
            for (c, cost) in matrix.row(r) {
                if cost < self.v[c] {
                    self.v[c] = cost;
                    cheapest_row[c] = r;
                }
            }
        }

        for (c, &r) in cheapest_row.iter().enumerate() {
            if r == NONE {
                return Err(LinkerError::EmptyColumn { col: c });
            }
            if self.col_for_row[r] == NONE {
                self.col_for_row[r] = c;
                self.row_for_col[c] = r;
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        for &c in &self.touched {
            self.dist[c] = f64::INFINITY;
            self.path[c] = NONE;
            self.done[c] = false;
        }
        self.touched.clear();
        self.scanned_rows.clear();
        self.scanned_cols.clear();
        self.heap.clear();
    }

    fn augment(&mut self, start_row: usize) -> Result<(), LinkerError> {
        self.reset();

        let matrix = self.matrix;
        let mut row = start_row;
        let mut min_val = 0.0;
        let sink = loop {
            for (c, cost) in matrix.row(row) {
                if self.done[c] {
                    continue;
                }
                let reduced = min_val + cost - self.u[row] - self.v[c];
                if reduced < self.dist[c] {
                    if self.dist[c] == f64::INFINITY {
                        self.touched.push(c);
                    }
                    self.dist[c] = reduced;
                    self.path[c] = row;
                    self.heap.push(Candidate {
                        dist: reduced,
                        col: c,
                    });
                }
            }

            let col = loop {
                match self.heap.pop() {
                    None => return Err(LinkerError::Infeasible { row: start_row }),
                    Some(Candidate { col, .. }) if !self.done[col] => break col,
                    Some(_) => {}
                }
            };

            self.done[col] = true;
            self.scanned_cols.push(col);
            min_val = self.dist[col];

            match self.row_for_col[col] {
                NONE => break col,
                next => {
                    self.scanned_rows.push(next);
                    row = next;
                }
            }
        };

        self.u[start_row] += min_val;
        for &r in &self.scanned_rows {
            self.u[r] += min_val - self.dist[self.col_for_row[r]];
        }
        for &c in &self.scanned_cols {
            self.v[c] -= min_val - self.dist[c];
        }

        let mut col = sink;
        loop {
            let row = self.path[col];
            self.row_for_col[col] = row;
            let prev = std::mem::replace(&mut self.col_for_row[row], col);
            if row == start_row {
                break;
            }
            col = prev;
        }
        Ok(())
    }
}
