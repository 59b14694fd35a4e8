use crate::spot::{Spot, SpotRef};
use std::collections::HashMap;

/// Squared Euclidean distance cost
pub mod square_distance;

/// Squared distance penalized by feature differences
pub mod feature_penalty;

pub use feature_penalty::FeaturePenaltyCostFunction;
pub use square_distance::SquareDistanceCostFunction;

/// Cost of linking a source object to a target object
///
/// Implementations must be pure: identical inputs always produce the same
/// non-negative cost and no side effects.
///
pub trait CostFunction<T>: Send + Sync {
    fn linking_cost(&self, source: &T, target: &T) -> f64;
}

/// Which spot cost function is in use
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostFunctionKind {
    SquareDistance,
    FeaturePenalty,
}

/// Spot cost function selected once per linking run
///
#[derive(Debug, Clone)]
pub enum SpotCostFunction {
    SquareDistance(SquareDistanceCostFunction),
    FeaturePenalty(FeaturePenaltyCostFunction),
}

impl SpotCostFunction {
    /// Chooses the cost function from the optional feature penalty weights
    ///
    /// An absent or empty penalty map selects the plain squared distance.
    ///
    pub fn select(penalties: Option<&HashMap<String, f64>>) -> Self {
        match penalties {
            Some(p) if !p.is_empty() => {
                SpotCostFunction::FeaturePenalty(FeaturePenaltyCostFunction::new(p.clone()))
            }
            _ => SpotCostFunction::SquareDistance(SquareDistanceCostFunction),
        }
    }

    pub fn kind(&self) -> CostFunctionKind {
        match self {
            SpotCostFunction::SquareDistance(_) => CostFunctionKind::SquareDistance,
            SpotCostFunction::FeaturePenalty(_) => CostFunctionKind::FeaturePenalty,
        }
    }
}

impl CostFunction<Spot> for SpotCostFunction {
    fn linking_cost(&self, source: &Spot, target: &Spot) -> f64 {
        match self {
            SpotCostFunction::SquareDistance(f) => f.linking_cost(source, target),
            SpotCostFunction::FeaturePenalty(f) => f.linking_cost(source, target),
        }
    }
}

impl CostFunction<SpotRef> for SpotCostFunction {
    fn linking_cost(&self, source: &SpotRef, target: &SpotRef) -> f64 {
        CostFunction::<Spot>::linking_cost(self, source, target)
    }
}

#[cfg(test)]
mod tests {
    use crate::cost::{CostFunction, CostFunctionKind, SpotCostFunction};
    use crate::spot::Spot;
    use crate::EPS;
    use std::collections::HashMap;

    #[test]
    fn selection() {
        assert_eq!(
            SpotCostFunction::select(None).kind(),
            CostFunctionKind::SquareDistance
        );
        assert_eq!(
            SpotCostFunction::select(Some(&HashMap::default())).kind(),
            CostFunctionKind::SquareDistance
        );
        let penalties = HashMap::from([("MEAN_INTENSITY".to_string(), 1.0)]);
        assert_eq!(
            SpotCostFunction::select(Some(&penalties)).kind(),
            CostFunctionKind::FeaturePenalty
        );
    }

    #[test]
    fn selected_functions_differ_on_skewed_feature() {
        let s = Spot::new(0.0, 0.0, 0.0).feature("MEAN_INTENSITY", 100.0);
        let t = Spot::new(3.0, 4.0, 0.0).feature("MEAN_INTENSITY", 300.0);

        let plain = SpotCostFunction::select(Some(&HashMap::default()));
        let penalties = HashMap::from([("MEAN_INTENSITY".to_string(), 2.0)]);
        let penalized = SpotCostFunction::select(Some(&penalties));

        assert!((plain.linking_cost(&s, &t) - 25.0).abs() < EPS);
        // ndiff = 200 / 400 = 0.5, factor = 1 + 2 * 0.5
        assert!((penalized.linking_cost(&s, &t) - 50.0).abs() < EPS);
    }
}
