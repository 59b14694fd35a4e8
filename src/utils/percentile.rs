/// Percentile of the values, with linear interpolation between ranks
///
/// The rank of the percentile `p` (in `[0, 100]`) over `n` sorted values is
/// `p / 100 * (n + 1)`. Ranks below 1 return the minimum, ranks at or above `n`
/// return the maximum, and fractional ranks interpolate between neighbours.
///
/// Returns `None` for an empty sample. The values must be finite.
///
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let pos = p.clamp(0.0, 100.0) / 100.0 * (n as f64 + 1.0);

    if pos < 1.0 {
        return Some(sorted[0]);
    }
    if pos >= n as f64 {
        return Some(sorted[n - 1]);
    }

    let lower = pos.floor();
    let d = pos - lower;
    let i = lower as usize;
    Some(sorted[i - 1] + d * (sorted[i] - sorted[i - 1]))
}

#[cfg(test)]
mod tests {
    use crate::utils::percentile::percentile;
    use crate::EPS;

    #[test]
    fn empty() {
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn single() {
        assert_eq!(percentile(&[3.0], 0.0), Some(3.0));
        assert_eq!(percentile(&[3.0], 90.0), Some(3.0));
    }

    #[test]
    fn bounds() {
        let v = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile(&v, 0.0), Some(1.0));
        assert_eq!(percentile(&v, 100.0), Some(5.0));
        assert_eq!(percentile(&v, 95.0), Some(5.0));
    }

    #[test]
    fn interpolation() {
        let v = [4.0, 1.0, 3.0, 2.0];
        // rank = 0.5 * 5 = 2.5
        assert!((percentile(&v, 50.0).unwrap() - 2.5).abs() < EPS);
        // rank = 0.3 * 5 = 1.5
        assert!((percentile(&v, 30.0).unwrap() - 1.5).abs() < EPS);
        // rank = 0.9 * 5 = 4.5 >= 4
        assert_eq!(percentile(&v, 90.0), Some(4.0));
    }
}
