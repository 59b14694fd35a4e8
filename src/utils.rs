/// Percentile of a sample
pub mod percentile;
