use std::collections::VecDeque;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Stops the search before the iteration budget is spent. Checked after every
/// iteration; a running strategy always completes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// No new best-ever solution in this many consecutive iterations.
    IterationsWithoutImprovement(usize),

    /// Wall clock time since the search started.
    Duration(SignedDuration),

    /// The costs of the pool's best solution over the last `iterations`
    /// iterations vary less than `threshold` (standard deviation over mean).
    VariationCoefficient { iterations: usize, threshold: f64 },
}

impl Termination {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Termination::IterationsWithoutImprovement(0) => Err(ConfigError::InvalidParameter {
                name: "iterations_without_improvement",
                reason: "must be at least 1".to_owned(),
            }),
            Termination::Duration(duration) if duration.is_negative() || duration.is_zero() => {
                Err(ConfigError::InvalidParameter {
                    name: "duration",
                    reason: format!("{duration} must be positive"),
                })
            }
            Termination::VariationCoefficient {
                iterations,
                threshold,
            } if iterations < 2 || !(threshold >= 0.0) => Err(ConfigError::InvalidParameter {
                name: "variation_coefficient",
                reason: format!(
                    "need at least 2 iterations and a non-negative threshold, got {iterations} and {threshold}"
                ),
            }),
            _ => Ok(()),
        }
    }
}

/// Progress of a running search as seen by the terminations.
pub struct TerminationState {
    started_at: Timestamp,
    iterations_without_improvement: usize,
    recent_costs: VecDeque<f64>,
    max_recent_costs: usize,
}

impl TerminationState {
    pub fn new(started_at: Timestamp, terminations: &[Termination]) -> Self {
        let max_recent_costs = terminations
            .iter()
            .filter_map(|termination| match termination {
                Termination::VariationCoefficient { iterations, .. } => Some(*iterations),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        TerminationState {
            started_at,
            iterations_without_improvement: 0,
            recent_costs: VecDeque::with_capacity(max_recent_costs),
            max_recent_costs,
        }
    }

    pub fn iterations_without_improvement(&self) -> usize {
        self.iterations_without_improvement
    }

    /// Records one finished iteration.
    pub fn record_iteration(&mut self, improved_best: bool, pool_best_cost: f64) {
        if improved_best {
            self.iterations_without_improvement = 0;
        } else {
            self.iterations_without_improvement += 1;
        }

        if self.max_recent_costs > 0 {
            if self.recent_costs.len() == self.max_recent_costs {
                self.recent_costs.pop_front();
            }
            self.recent_costs.push_back(pool_best_cost);
        }
    }

    fn variation_coefficient(&self, iterations: usize) -> Option<f64> {
        if self.recent_costs.len() < iterations {
            return None;
        }

        let costs = self.recent_costs.iter().skip(self.recent_costs.len() - iterations);
        let mean = costs.clone().sum::<f64>() / iterations as f64;
        if mean == 0.0 {
            return Some(0.0);
        }

        let variance = costs.map(|cost| (cost - mean).powi(2)).sum::<f64>() / iterations as f64;
        Some(variance.sqrt() / mean.abs())
    }

    pub fn is_met(&self, termination: &Termination) -> bool {
        match *termination {
            Termination::IterationsWithoutImprovement(max) => {
                self.iterations_without_improvement >= max
            }
            Termination::Duration(max_duration) => {
                Timestamp::now().duration_since(self.started_at) > max_duration
            }
            Termination::VariationCoefficient {
                iterations,
                threshold,
            } => self
                .variation_coefficient(iterations)
                .is_some_and(|coefficient| coefficient < threshold),
        }
    }
}
