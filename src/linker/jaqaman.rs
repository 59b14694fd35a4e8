use crate::cost::CostFunction;
use crate::linker::lap::SparseLapSolver;
use crate::linker::sparse::SparseCostMatrix;
use crate::linker::{AssignmentResult, LinkerError};
use crate::utils::percentile::percentile;
use log::debug;

/// Links a source sequence to a target sequence by minimum total cost, letting any object opt out
///
/// The rectangular problem is embedded into a square one of size `|S| + |T|`:
///
/// ```text
///            targets        source slots
/// sources  [ linking costs | diag(alt)     ]
/// targets  [ diag(alt)     | aux, linkable ]
/// ```
///
/// * linking costs are the pairs whose cost does not exceed the threshold, other pairs are absent;
/// * `alt` is the cost of leaving an object unmatched: the alternative cost factor times the
///   cutoff percentile of all linking costs;
/// * the bottom-right block repeats the transposed linking pattern with the lowest linking cost,
///   so that every linked pair has a matching auxiliary assignment.
///
/// Only the defined entries are stored.
///
pub struct SparseJaqamanLinker<'a, T, C>
where
    C: CostFunction<T> + ?Sized,
{
    sources: &'a [T],
    targets: &'a [T],
    cost_function: &'a C,
    cost_threshold: f64,
    alternative_cost_factor: f64,
    cutoff_percentile: f64,
}

impl<'a, T, C> SparseJaqamanLinker<'a, T, C>
where
    C: CostFunction<T> + ?Sized,
{
    /// Constructs the linker
    ///
    /// # Parameters
    /// * `sources` - objects to link from
    /// * `targets` - objects to link to
    /// * `cost_function` - linking cost of a (source, target) pair
    /// * `cost_threshold` - pairs with a greater cost are never linked
    /// * `alternative_cost_factor` - multiplier of the cutoff percentile giving the opt-out cost
    /// * `cutoff_percentile` - percentile, in `[0, 100]`, of the linking costs used for the opt-out cost
    ///
    pub fn new(
        sources: &'a [T],
        targets: &'a [T],
        cost_function: &'a C,
        cost_threshold: f64,
        alternative_cost_factor: f64,
        cutoff_percentile: f64,
    ) -> Self {
        Self {
            sources,
            targets,
            cost_function,
            cost_threshold,
            alternative_cost_factor,
            cutoff_percentile,
        }
    }

    pub fn check_input(&self) -> Result<(), LinkerError> {
        if !(self.cost_threshold.is_finite() && self.cost_threshold > 0.0) {
            return Err(LinkerError::InvalidCostThreshold(self.cost_threshold));
        }
        if !(self.alternative_cost_factor.is_finite() && self.alternative_cost_factor >= 0.0) {
            return Err(LinkerError::InvalidAlternativeCostFactor(
                self.alternative_cost_factor,
            ));
        }
        if !(0.0..=100.0).contains(&self.cutoff_percentile) {
            return Err(LinkerError::InvalidPercentile(self.cutoff_percentile));
        }
        Ok(())
    }

    /// Linkable pairs as `(source, target, cost)`
    ///
    fn candidates(&self) -> Result<Vec<(usize, usize, f64)>, LinkerError> {
        let mut candidates = Vec::default();
        for (s, source) in self.sources.iter().enumerate() {
            for (t, target) in self.targets.iter().enumerate() {
                let cost = self.cost_function.linking_cost(source, target);
                if cost.is_nan() {
                    return Err(LinkerError::NonNumericCost { row: s, col: t });
                }
                if cost < 0.0 {
                    return Err(LinkerError::NegativeCost {
                        row: s,
                        col: t,
                        cost,
                    });
                }
                if cost > self.cost_threshold {
                    continue;
                }
                candidates.push((s, t, cost));
            }
        }
        Ok(candidates)
    }

    /// Computes the assignment
    ///
    /// When no pair is linkable, every source and target stays unlinked.
    ///
    pub fn process(&self) -> Result<AssignmentResult, LinkerError> {
        self.check_input()?;

        let (n_sources, n_targets) = (self.sources.len(), self.targets.len());
        let candidates = self.candidates()?;
        if candidates.is_empty() {
            debug!(
                "No linkable pair among {} sources and {} targets",
                n_sources, n_targets
            );
            return Ok(AssignmentResult::unassigned(n_sources));
        }

        let costs = candidates.iter().map(|(_, _, c)| *c).collect::<Vec<_>>();
        let alternative_cost = self.alternative_cost_factor
            * percentile(&costs, self.cutoff_percentile).unwrap_or_default();
        let auxiliary_cost = costs.iter().copied().fold(f64::INFINITY, f64::min);

        let n = n_sources + n_targets;
        let mut entries = Vec::with_capacity(2 * candidates.len() + n);
        for &(s, t, cost) in &candidates {
            entries.push((s, t, cost));
            entries.push((n_sources + t, n_targets + s, auxiliary_cost));
        }
        for s in 0..n_sources {
            entries.push((s, n_targets + s, alternative_cost));
        }
        for t in 0..n_targets {
            entries.push((n_sources + t, t, alternative_cost));
        }

        let matrix = SparseCostMatrix::from_entries(n, n, entries)?;
        let solution = SparseLapSolver::new(&matrix).solve()?;

        let links = solution
            .col_for_row
            .iter()
            .take(n_sources)
            .enumerate()
            .map(|(s, &col)| {
                if col < n_targets {
                    matrix.get(s, col).map(|cost| (col, cost))
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        let res = AssignmentResult {
            links,
            alternative_cost: Some(alternative_cost),
        };
        debug!(
            "Linked {} of {} sources to {} targets, {} candidates, alternative cost {}",
            res.n_links(),
            n_sources,
            n_targets,
            candidates.len(),
            alternative_cost
        );
        Ok(res)
    }
}
