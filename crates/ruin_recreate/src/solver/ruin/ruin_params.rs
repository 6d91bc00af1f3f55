use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::ruin_share::RuinShareFactory;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuinParams {
    pub random_share: RuinShareFactory,
    pub radial_share: RuinShareFactory,
    pub worst_share: RuinShareFactory,
    pub cluster_share: RuinShareFactory,
    pub string_share: RuinShareFactory,

    /// Chance that the savings of a job get a random bonus in worst ruin.
    pub worst_noise_probability: f64,

    /// Bonus bound as a share of the largest transport cost.
    pub worst_noise_level: f64,

    /// Nearest neighbors each job is linked to when forming clusters.
    pub cluster_linkage: usize,

    /// Most clusters removed by one cluster ruin.
    pub cluster_max_clusters: usize,

    /// Bounds on the number of routes string ruin visits.
    pub string_k_min: usize,
    pub string_k_max: usize,

    /// Bounds on the length of one string.
    pub string_l_min: usize,
    pub string_l_max: usize,
}

impl Default for RuinParams {
    fn default() -> Self {
        RuinParams {
            random_share: RuinShareFactory::default(),
            radial_share: RuinShareFactory::default(),
            worst_share: RuinShareFactory::default(),
            cluster_share: RuinShareFactory::default(),
            string_share: RuinShareFactory::default(),
            worst_noise_probability: 0.2,
            worst_noise_level: 0.15,
            cluster_linkage: 1,
            cluster_max_clusters: 3,
            string_k_min: 1,
            string_k_max: 3,
            string_l_min: 3,
            string_l_max: 10,
        }
    }
}

impl RuinParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for share in [
            &self.random_share,
            &self.radial_share,
            &self.worst_share,
            &self.cluster_share,
            &self.string_share,
        ] {
            share.validate()?;
        }

        if !(0.0..=1.0).contains(&self.worst_noise_probability) {
            return Err(ConfigError::InvalidParameter {
                name: "worst_noise_probability",
                reason: format!("{} is outside of [0, 1]", self.worst_noise_probability),
            });
        }

        if self.cluster_linkage == 0 || self.cluster_max_clusters == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "cluster",
                reason: format!(
                    "linkage and cluster count must be positive, got {} and {}",
                    self.cluster_linkage, self.cluster_max_clusters
                ),
            });
        }

        if self.string_k_min == 0 || self.string_k_min > self.string_k_max {
            return Err(ConfigError::InvalidParameter {
                name: "string_k",
                reason: format!("need 1 <= min <= max, got {}..={}", self.string_k_min, self.string_k_max),
            });
        }

        if self.string_l_min == 0 || self.string_l_min > self.string_l_max {
            return Err(ConfigError::InvalidParameter {
                name: "string_l",
                reason: format!("need 1 <= min <= max, got {}..={}", self.string_l_min, self.string_l_max),
            });
        }

        Ok(())
    }
}
