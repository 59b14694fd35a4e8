use crate::spot::{Spot, SpotRef};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Read-only access to spots grouped by frame
///
/// Implementations must be safe to share between linking workers.
///
pub trait SpotCollection: Send + Sync {
    /// Frames present in the collection, in strictly increasing order
    ///
    fn frames(&self) -> Vec<i32>;

    /// Number of spots in the frame
    ///
    /// # Parameters
    /// * `frame` - frame number
    /// * `visible_only` - when `true`, only the spots marked visible are counted
    ///
    fn n_spots(&self, frame: i32, visible_only: bool) -> usize;

    /// Spots of the frame in a stable order
    ///
    fn spots(&self, frame: i32, visible_only: bool) -> Vec<SpotRef>;

    fn is_empty(&self) -> bool {
        self.frames().is_empty()
    }
}

/// In-memory spot collection keyed by frame
///
#[derive(Debug, Clone, Default)]
pub struct FrameSpots {
    frames: BTreeMap<i32, Vec<SpotRef>>,
}

impl FrameSpots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places the spot at the frame and returns the shared handle
    ///
    pub fn add(&mut self, mut spot: Spot, frame: i32) -> SpotRef {
        spot.set_frame(frame);
        let spot = Arc::new(spot);
        self.frames.entry(frame).or_default().push(spot.clone());
        spot
    }

    /// Registers a frame without spots
    ///
    pub fn add_frame(&mut self, frame: i32) {
        self.frames.entry(frame).or_default();
    }

    /// Total number of spots over all frames
    ///
    pub fn total(&self, visible_only: bool) -> usize {
        self.frames
            .keys()
            .map(|frame| self.n_spots(*frame, visible_only))
            .sum()
    }
}

impl FromIterator<(i32, Spot)> for FrameSpots {
    fn from_iter<I: IntoIterator<Item = (i32, Spot)>>(iter: I) -> Self {
        let mut spots = FrameSpots::new();
        for (frame, spot) in iter {
            spots.add(spot, frame);
        }
        spots
    }
}

impl SpotCollection for FrameSpots {
    fn frames(&self) -> Vec<i32> {
        self.frames.keys().copied().collect()
    }

    fn n_spots(&self, frame: i32, visible_only: bool) -> usize {
        self.frames
            .get(&frame)
            .map(|spots| {
                spots
                    .iter()
                    .filter(|s| !visible_only || s.is_visible())
                    .count()
            })
            .unwrap_or(0)
    }

    fn spots(&self, frame: i32, visible_only: bool) -> Vec<SpotRef> {
        self.frames
            .get(&frame)
            .map(|spots| {
                spots
                    .iter()
                    .filter(|s| !visible_only || s.is_visible())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use crate::spot::collection::{FrameSpots, SpotCollection};
    use crate::spot::Spot;

    #[test]
    fn frames_are_ordered() {
        let mut spots = FrameSpots::new();
        spots.add(Spot::new(0.0, 0.0, 0.0), 5);
        spots.add(Spot::new(0.0, 0.0, 0.0), 0);
        spots.add(Spot::new(0.0, 0.0, 0.0), 2);
        spots.add_frame(7);
        assert_eq!(spots.frames(), vec![0, 2, 5, 7]);
        assert!(!spots.is_empty());
        assert!(FrameSpots::new().is_empty());
    }

    #[test]
    fn visibility_filter() {
        let spots = FrameSpots::from_iter([
            (1, Spot::new(0.0, 0.0, 0.0)),
            (1, Spot::new(1.0, 0.0, 0.0).visible(false)),
            (1, Spot::new(2.0, 0.0, 0.0)),
        ]);
        assert_eq!(spots.n_spots(1, true), 2);
        assert_eq!(spots.n_spots(1, false), 3);
        assert_eq!(spots.n_spots(2, false), 0);
        assert_eq!(spots.total(true), 2);

        let visible = spots.spots(1, true);
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|s| s.is_visible() && s.frame() == 1));
        assert!(spots.spots(3, true).is_empty());
    }

    #[test]
    fn same_coordinates_at_two_frames_are_distinct() {
        let mut spots = FrameSpots::new();
        let first = spots.add(Spot::new(1.0, 1.0, 0.0), 0);
        let second = spots.add(Spot::new(1.0, 1.0, 0.0), 1);
        assert_ne!(first.id(), second.id());
        assert_eq!(spots.spots(0, true)[0].id(), first.id());
        assert_eq!(spots.spots(1, true)[0].id(), second.id());
    }
}
