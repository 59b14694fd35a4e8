use crate::cost::CostFunction;
use crate::spot::Spot;
use std::collections::BTreeMap;

/// Squared distance multiplied by a penalty that grows with feature differences
///
/// The cost is computed as:
///
/// ```text
/// d² * (1 + Σ w_f * |a_f - b_f| / |a_f + b_f|)
/// ```
///
/// Only the features present in the weight map are consulted. A feature missing
/// on either spot, or with a zero sum, does not contribute to the penalty.
/// Weights are summed in feature name order, so equal weight maps always give
/// bit-identical costs.
///
#[derive(Debug, Clone)]
pub struct FeaturePenaltyCostFunction {
    penalties: BTreeMap<String, f64>,
}

impl FeaturePenaltyCostFunction {
    pub fn new<I>(penalties: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        Self {
            penalties: penalties.into_iter().collect(),
        }
    }

    pub fn penalties(&self) -> &BTreeMap<String, f64> {
        &self.penalties
    }

    fn penalty(&self, source: &Spot, target: &Spot) -> f64 {
        self.penalties
            .iter()
            .filter_map(|(feature, weight)| {
                source
                    .normalized_diff_to(target, feature)
                    .map(|ndiff| weight * ndiff)
            })
            .sum::<f64>()
    }
}

impl CostFunction<Spot> for FeaturePenaltyCostFunction {
    fn linking_cost(&self, source: &Spot, target: &Spot) -> f64 {
        source.square_distance_to(target) * (1.0 + self.penalty(source, target))
    }
}

#[cfg(test)]
mod tests {
    use crate::cost::{CostFunction, FeaturePenaltyCostFunction};
    use crate::spot::Spot;
    use crate::EPS;
    use itertools::Itertools;
    use std::collections::HashMap;

    fn penalties() -> FeaturePenaltyCostFunction {
        FeaturePenaltyCostFunction::new(HashMap::from([
            ("QUALITY".to_string(), 1.0),
            ("RADIUS".to_string(), 3.0),
        ]))
    }

    #[test]
    fn penalized_cost() {
        let f = penalties();
        let s = Spot::new(0.0, 0.0, 0.0)
            .feature("QUALITY", 1.0)
            .feature("RADIUS", 2.0)
            .feature("IGNORED", 1.0);
        let t = Spot::new(0.0, 2.0, 0.0)
            .feature("QUALITY", 3.0)
            .feature("RADIUS", 2.0)
            .feature("IGNORED", 1000.0);
        // 4 * (1 + 1 * 2/4 + 3 * 0)
        assert!((f.linking_cost(&s, &t) - 6.0).abs() < EPS);
    }

    #[test]
    fn missing_feature_contributes_nothing() {
        let f = penalties();
        let s = Spot::new(0.0, 0.0, 0.0).feature("QUALITY", 1.0);
        let t = Spot::new(0.0, 2.0, 0.0).feature("RADIUS", 5.0);
        assert!((f.linking_cost(&s, &t) - 4.0).abs() < EPS);
    }

    #[test]
    fn zero_sum_contributes_nothing() {
        let f = penalties();
        let s = Spot::new(0.0, 0.0, 0.0).feature("QUALITY", 0.0);
        let t = Spot::new(0.0, 3.0, 0.0).feature("QUALITY", 0.0);
        assert!((f.linking_cost(&s, &t) - 9.0).abs() < EPS);
    }

    #[test]
    fn deterministic() {
        let f = penalties();
        let s = Spot::new(0.5, 0.0, 1.0).feature("QUALITY", 7.0);
        let t = Spot::new(0.0, 2.5, 0.0).feature("QUALITY", 3.0);
        let first = f.linking_cost(&s, &t);
        for _ in 0..10 {
            assert_eq!(f.linking_cost(&s, &t), first);
        }
    }

    #[test]
    fn weight_order_does_not_change_cost() {
        let weights = [
            ("QUALITY", 0.1),
            ("RADIUS", 0.7),
            ("MEAN_INTENSITY", 0.3),
            ("CONTRAST", 1e-9),
        ];
        let s = Spot::new(0.3, 0.1, 0.0)
            .feature("QUALITY", 0.7)
            .feature("RADIUS", 1.3)
            .feature("MEAN_INTENSITY", 101.0)
            .feature("CONTRAST", 0.1);
        let t = Spot::new(1.1, 0.9, 0.0)
            .feature("QUALITY", 0.2)
            .feature("RADIUS", 2.9)
            .feature("MEAN_INTENSITY", 33.0)
            .feature("CONTRAST", 0.3);

        let costs = weights
            .iter()
            .permutations(weights.len())
            .map(|order| {
                let f = FeaturePenaltyCostFunction::new(
                    order.into_iter().map(|(k, w)| (k.to_string(), *w)),
                );
                f.linking_cost(&s, &t).to_bits()
            })
            .collect::<Vec<_>>();
        assert!(costs.iter().all_equal());

        let names = penalties().penalties().keys().cloned().collect::<Vec<_>>();
        assert_eq!(names, vec!["QUALITY".to_string(), "RADIUS".to_string()]);
    }
}
