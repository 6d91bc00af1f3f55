use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How many jobs one ruin removes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuinShareFactory {
    /// Uniform share of the assigned jobs, both bounds in `[0, 1]`.
    Fraction { min: f64, max: f64 },

    /// Uniform count of jobs.
    Absolute { min: usize, max: usize },
}

impl Default for RuinShareFactory {
    fn default() -> Self {
        RuinShareFactory::Fraction { min: 0.3, max: 0.5 }
    }
}

impl RuinShareFactory {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            RuinShareFactory::Fraction { min, max } => {
                if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) || min > max {
                    return Err(ConfigError::InvalidRuinShare { min, max });
                }
            }
            RuinShareFactory::Absolute { min, max } => {
                if min > max {
                    return Err(ConfigError::InvalidRuinShare {
                        min: min as f64,
                        max: max as f64,
                    });
                }
            }
        }

        Ok(())
    }

    /// Number of jobs to remove out of `num_assigned`, never more than that.
    pub fn create_share<R>(&self, num_assigned: usize, rng: &mut R) -> usize
    where
        R: Rng,
    {
        let share = match *self {
            RuinShareFactory::Fraction { min, max } => {
                let fraction = if min < max {
                    rng.random_range(min..=max)
                } else {
                    min
                };
                (num_assigned as f64 * fraction).round() as usize
            }
            RuinShareFactory::Absolute { min, max } => rng.random_range(min..=max),
        };

        share.min(num_assigned)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};

    use super::*;

    #[test]
    fn test_validate_bounds() {
        assert!(RuinShareFactory::default().validate().is_ok());
        assert_eq!(
            RuinShareFactory::Fraction { min: -0.1, max: 0.5 }.validate(),
            Err(ConfigError::InvalidRuinShare {
                min: -0.1,
                max: 0.5
            })
        );
        assert!(RuinShareFactory::Fraction { min: 0.6, max: 0.5 }.validate().is_err());
        assert!(RuinShareFactory::Absolute { min: 5, max: 2 }.validate().is_err());
    }

    #[test]
    fn test_share_is_within_bounds_and_clamped() {
        let mut rng = SmallRng::seed_from_u64(1);

        for _ in 0..100 {
            let share = RuinShareFactory::Fraction { min: 0.2, max: 0.4 }.create_share(100, &mut rng);
            assert!((20..=40).contains(&share));
        }

        let share = RuinShareFactory::Absolute { min: 10, max: 10 }.create_share(4, &mut rng);
        assert_eq!(share, 4);

        let share = RuinShareFactory::Fraction { min: 0.5, max: 0.5 }.create_share(0, &mut rng);
        assert_eq!(share, 0);
    }
}
