//! The hyperparameter space shared by both tuners.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GbdtParams;

/// Inclusive integer range with a step grid for the sequential tuner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IntRange {
    pub low: usize,
    pub high: usize,
    pub step: usize,
}

impl IntRange {
    /// Uniform draw over the whole range.
    pub fn sample_uniform(&self, rng: &mut impl Rng) -> usize {
        if self.low >= self.high {
            return self.low;
        }
        rng.gen_range(self.low..=self.high)
    }

    /// Draw restricted to `low, low+step, ...` grid points.
    pub fn sample_stepped(&self, rng: &mut impl Rng) -> usize {
        if self.low >= self.high || self.step == 0 {
            return self.low;
        }
        let n_points = (self.high - self.low) / self.step + 1;
        self.low + rng.gen_range(0..n_points) * self.step
    }
}

/// Candidate values per hyperparameter: discrete categorical lists plus one
/// integer range for the ensemble size. Searches read it, never mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpace {
    /// Ensemble size (boosting rounds).
    pub iterations: IntRange,
    pub max_depth: Vec<u32>,
    pub shrinkage: Vec<f32>,
    pub data_sample_ratio: Vec<f64>,
    pub feature_sample_ratio: Vec<f64>,
}

impl Default for ParamSpace {
    fn default() -> Self {
        Self {
            iterations: IntRange {
                low: 100,
                high: 500,
                step: 50,
            },
            max_depth: vec![2, 3, 4, 5, 6],
            shrinkage: vec![0.05, 0.1, 0.2],
            data_sample_ratio: vec![0.6, 0.8, 1.0],
            feature_sample_ratio: vec![0.6, 0.8, 1.0],
        }
    }
}

impl ParamSpace {
    fn pick<T: Copy>(values: &[T], rng: &mut impl Rng) -> T {
        values[rng.gen_range(0..values.len())]
    }

    /// Draw one candidate with the ensemble size sampled uniformly.
    pub fn sample(&self, rng: &mut impl Rng) -> GbdtParams {
        GbdtParams {
            iterations: self.iterations.sample_uniform(rng),
            max_depth: Self::pick(&self.max_depth, rng),
            shrinkage: Self::pick(&self.shrinkage, rng),
            data_sample_ratio: Self::pick(&self.data_sample_ratio, rng),
            feature_sample_ratio: Self::pick(&self.feature_sample_ratio, rng),
        }
    }

    /// Draw one candidate with the ensemble size on the step grid. Consumes
    /// one draw per field, same as `sample`.
    pub fn sample_stepped(&self, rng: &mut impl Rng) -> GbdtParams {
        GbdtParams {
            iterations: self.iterations.sample_stepped(rng),
            max_depth: Self::pick(&self.max_depth, rng),
            shrinkage: Self::pick(&self.shrinkage, rng),
            data_sample_ratio: Self::pick(&self.data_sample_ratio, rng),
            feature_sample_ratio: Self::pick(&self.feature_sample_ratio, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_stay_inside_the_space() {
        let space = ParamSpace::default();
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            let params = space.sample(&mut rng);
            assert!((100..=500).contains(&params.iterations));
            assert!(space.max_depth.contains(&params.max_depth));
            assert!(space.shrinkage.contains(&params.shrinkage));
        }
    }

    #[test]
    fn stepped_samples_land_on_grid_points() {
        let space = ParamSpace::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let params = space.sample_stepped(&mut rng);
            assert_eq!((params.iterations - 100) % 50, 0, "off-grid: {}", params.iterations);
        }
    }

    #[test]
    fn stepped_sampling_consumes_one_draw_per_field() {
        let space = ParamSpace::default();
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);

        let _ = space.sample_stepped(&mut a);
        // Replay the same draws by hand: one per field.
        let _ = space.iterations.sample_stepped(&mut b);
        for len in [
            space.max_depth.len(),
            space.shrinkage.len(),
            space.data_sample_ratio.len(),
            space.feature_sample_ratio.len(),
        ] {
            let _ = b.gen_range(0..len);
        }
        // Both generators must now sit at the same stream position.
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }

    #[test]
    fn sampling_is_deterministic_per_seed() {
        let space = ParamSpace::default();
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            assert_eq!(space.sample(&mut a), space.sample(&mut b));
        }
    }
}
