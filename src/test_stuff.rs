use crate::spot::collection::FrameSpots;
use crate::spot::Spot;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Planar random walk producing one spot per frame
///
pub struct SpotGen2 {
    x: f64,
    y: f64,
    dist: Uniform<f64>,
    rng: StdRng,
}

impl SpotGen2 {
    /// Creates the generator
    ///
    /// # Parameters
    /// * `x`, `y` - initial position
    /// * `drift` - maximal displacement along each axis between two frames
    /// * `seed` - random seed
    ///
    pub fn new(x: f64, y: f64, drift: f64, seed: u64) -> Self {
        Self {
            x,
            y,
            dist: Uniform::new_inclusive(-drift, drift),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Iterator for SpotGen2 {
    type Item = Spot;

    fn next(&mut self) -> Option<Self::Item> {
        self.x += self.rng.sample(self.dist);
        self.y += self.rng.sample(self.dist);
        Some(Spot::new(self.x, self.y, 0.0))
    }
}

/// Collection of `objects` random walks laid out on a grid with the given spacing
///
/// Every object produces one spot in every frame of `frames`.
///
pub fn random_walks(objects: usize, frames: &[i32], spacing: f64, drift: f64) -> FrameSpots {
    let side = (objects as f64).sqrt().ceil().max(1.0) as usize;
    let mut gens = (0..objects)
        .map(|i| {
            SpotGen2::new(
                spacing * (i % side) as f64,
                spacing * (i / side) as f64,
                drift,
                i as u64,
            )
        })
        .collect::<Vec<_>>();

    let mut spots = FrameSpots::new();
    for frame in frames {
        spots.add_frame(*frame);
        for gen in gens.iter_mut() {
            if let Some(spot) = gen.next() {
                spots.add(spot, *frame);
            }
        }
    }
    spots
}

#[cfg(test)]
mod tests {
    use crate::spot::collection::SpotCollection;
    use crate::test_stuff::{random_walks, SpotGen2};

    #[test]
    fn bounded_drift() {
        let mut gen = SpotGen2::new(10.0, 20.0, 0.5, 1);
        let first = gen.next().unwrap();
        assert!((first.position().x - 10.0).abs() <= 0.5);
        assert!((first.position().y - 20.0).abs() <= 0.5);
        let second = gen.next().unwrap();
        assert!(first.square_distance_to(&second) <= 0.5);
    }

    #[test]
    fn walks() {
        let spots = random_walks(10, &[0, 1, 3], 100.0, 1.0);
        assert_eq!(spots.frames(), vec![0, 1, 3]);
        assert!(spots.frames().iter().all(|f| spots.n_spots(*f, true) == 10));
    }
}
