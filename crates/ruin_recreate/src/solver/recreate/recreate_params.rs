use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::regret_scorer::RegretScorerParams;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecreateParams {
    /// Lets an existing route change its vehicle for another available type.
    pub vehicle_switch: bool,

    pub noise_level: f64,
    pub noise_probability: f64,

    pub regret: RegretScorerParams,
}

impl Default for RecreateParams {
    fn default() -> Self {
        RecreateParams {
            vehicle_switch: true,
            noise_level: 0.15,
            noise_probability: 0.2,
            regret: RegretScorerParams::default(),
        }
    }
}

impl RecreateParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.noise_probability) {
            return Err(ConfigError::InvalidParameter {
                name: "noise_probability",
                reason: format!("{} is outside of [0, 1]", self.noise_probability),
            });
        }

        if !self.noise_level.is_finite() || self.noise_level < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "noise_level",
                reason: format!("{} must be a non-negative number", self.noise_level),
            });
        }

        Ok(())
    }
}
