use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::problem::{job::JobIdx, vehicle::VehicleIdx};

/// Random perturbation of insertion costs.
///
/// Each job gets a seed drawn from the search rng when the generator is
/// created; the noise of a candidate only depends on that seed and on where
/// the job would go, so evaluation order does not change the outcome.
pub struct NoiseGenerator {
    seeds: Vec<u64>,
    pub noise_probability: f64,
    pub noise_level: f64,
    pub max_cost: f64,
}

impl NoiseGenerator {
    pub fn new<R>(
        num_jobs: usize,
        max_cost: f64,
        noise_probability: f64,
        noise_level: f64,
        rng: &mut R,
    ) -> Self
    where
        R: Rng,
    {
        Self {
            seeds: (0..num_jobs).map(|_| rng.random()).collect(),
            noise_probability,
            noise_level,
            max_cost,
        }
    }

    pub fn create_noise(
        &self,
        job_id: JobIdx,
        vehicle_id: VehicleIdx,
        route_key: usize,
        position: usize,
    ) -> f64 {
        if self.noise_level == 0.0 || self.noise_probability == 0.0 {
            return 0.0;
        }

        let seed = self.seeds[job_id.get()]
            ^ fxhash::hash64(&(vehicle_id.get(), route_key, position));
        let mut rng = SmallRng::seed_from_u64(seed);

        if rng.random_bool(self.noise_probability) {
            self.noise_level * self.max_cost * rng.random_range(0.0..=1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};

    use super::*;

    #[test]
    fn test_noise_is_stable_and_bounded() {
        let mut rng = SmallRng::seed_from_u64(7);
        let noise = NoiseGenerator::new(3, 10.0, 1.0, 0.5, &mut rng);

        let a = noise.create_noise(JobIdx::new(1), VehicleIdx::new(0), 2, 3);
        let b = noise.create_noise(JobIdx::new(1), VehicleIdx::new(0), 2, 3);
        assert_eq!(a, b);
        assert!((0.0..=5.0).contains(&a));

        let silent = NoiseGenerator::new(3, 10.0, 0.0, 0.5, &mut rng);
        assert_eq!(silent.create_noise(JobIdx::new(0), VehicleIdx::new(0), 0, 0), 0.0);
    }
}
