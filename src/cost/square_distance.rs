use crate::cost::CostFunction;
use crate::spot::Spot;

/// Links cost the squared Euclidean distance between the two spots
///
#[derive(Debug, Clone, Copy, Default)]
pub struct SquareDistanceCostFunction;

impl CostFunction<Spot> for SquareDistanceCostFunction {
    fn linking_cost(&self, source: &Spot, target: &Spot) -> f64 {
        source.square_distance_to(target)
    }
}
