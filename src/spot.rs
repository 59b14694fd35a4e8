use nalgebra::Point3;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Per-frame spot collections
pub mod collection;

static SPOT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Shared handle to a spot. Spots are compared by id, never by coordinates.
///
pub type SpotRef = Arc<Spot>;

/// A single detection at a single frame
///
/// The spot is immutable once it is placed in a collection. Every spot receives
/// a unique id from a process-wide counter when it is created. The id is the
/// identity of the detection, so the spot is not `Clone`: share it through
/// [SpotRef] instead.
///
/// ```compile_fail
/// use sparselap::spot::Spot;
///
/// let s = Spot::new(1.0, 1.0, 0.0);
/// let _same_id = s.clone();
/// ```
///
#[derive(Debug)]
pub struct Spot {
    id: u64,
    frame: i32,
    visible: bool,
    position: Point3<f64>,
    features: HashMap<String, f64>,
}

impl Spot {
    /// Creates a visible spot at the given position
    ///
    /// # Parameters
    /// * `x`, `y`, `z` - spot coordinates; use `z = 0.0` for planar data
    ///
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            id: SPOT_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
            frame: 0,
            visible: true,
            position: Point3::new(x, y, z),
            features: HashMap::default(),
        }
    }

    /// Sets a numeric feature of the spot
    ///
    pub fn feature(mut self, name: &str, value: f64) -> Self {
        self.features.insert(name.to_string(), value);
        self
    }

    /// Sets the visibility flag
    ///
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub(crate) fn set_frame(&mut self, frame: i32) {
        self.frame = frame;
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn frame(&self) -> i32 {
        self.frame
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> &Point3<f64> {
        &self.position
    }

    pub fn get_feature(&self, name: &str) -> Option<f64> {
        self.features.get(name).copied()
    }

    pub fn features(&self) -> &HashMap<String, f64> {
        &self.features
    }

    /// Squared Euclidean distance to another spot
    ///
    pub fn square_distance_to(&self, other: &Spot) -> f64 {
        nalgebra::distance_squared(&self.position, &other.position)
    }

    /// Absolute difference of a feature normalized by the magnitude of the sum of both values
    ///
    /// Returns `None` when the feature is missing on either spot, and `0.0` when the sum is zero.
    ///
    pub fn normalized_diff_to(&self, other: &Spot, feature: &str) -> Option<f64> {
        let (a, b) = (self.get_feature(feature)?, other.get_feature(feature)?);
        let sum = (a + b).abs();
        if sum == 0.0 {
            Some(0.0)
        } else {
            Some((a - b).abs() / sum)
        }
    }
}

impl PartialEq for Spot {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Spot {}

#[cfg(test)]
mod tests {
    use crate::spot::{Spot, SpotRef};
    use std::sync::Arc;
    use crate::EPS;

    #[test]
    fn unique_ids() {
        let s1 = Spot::new(0.0, 0.0, 0.0);
        let s2 = Spot::new(0.0, 0.0, 0.0);
        assert_ne!(s1.id(), s2.id());
        assert_ne!(s1, s2);

        let shared: SpotRef = Arc::new(s1);
        let handle = shared.clone();
        assert_eq!(shared.id(), handle.id());
        assert_eq!(*shared, *handle);
    }

    #[test]
    fn square_distance() {
        let s1 = Spot::new(1.0, 2.0, 3.0);
        let s2 = Spot::new(2.0, 4.0, 6.0);
        assert!((s1.square_distance_to(&s2) - 14.0).abs() < EPS);
        assert!((s2.square_distance_to(&s1) - 14.0).abs() < EPS);
    }

    #[test]
    fn normalized_diff() {
        let s1 = Spot::new(0.0, 0.0, 0.0).feature("QUALITY", 3.0);
        let s2 = Spot::new(0.0, 0.0, 0.0).feature("QUALITY", 1.0);
        let s3 = Spot::new(0.0, 0.0, 0.0).feature("QUALITY", -3.0);
        let s4 = Spot::new(0.0, 0.0, 0.0);

        assert!((s1.normalized_diff_to(&s2, "QUALITY").unwrap() - 0.5).abs() < EPS);
        assert_eq!(s1.normalized_diff_to(&s3, "QUALITY"), Some(0.0));
        assert_eq!(s1.normalized_diff_to(&s4, "QUALITY"), None);
        assert_eq!(s4.normalized_diff_to(&s1, "QUALITY"), None);
    }
}
