use rand::{Rng, seq::IndexedRandom};

use crate::error::ConfigError;

use super::search_strategy::SearchStrategy;

struct WeightedStrategy {
    strategy: SearchStrategy,
    weight: f64,
}

/// Draws the strategy of each iteration with a probability proportional to its weight.
#[derive(Default)]
pub struct StrategyManager {
    strategies: Vec<WeightedStrategy>,
}

impl StrategyManager {
    pub fn add_strategy(&mut self, strategy: SearchStrategy, weight: f64) -> Result<(), ConfigError> {
        if self
            .strategies
            .iter()
            .any(|entry| entry.strategy.id() == strategy.id())
        {
            return Err(ConfigError::DuplicateStrategy(strategy.id().to_owned()));
        }

        if !(weight > 0.0 && weight.is_finite()) {
            return Err(ConfigError::InvalidStrategyWeight(strategy.id().to_owned()));
        }

        self.strategies.push(WeightedStrategy { strategy, weight });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn strategies(&self) -> impl Iterator<Item = &SearchStrategy> {
        self.strategies.iter().map(|entry| &entry.strategy)
    }

    pub fn weight(&self, id: &str) -> Option<f64> {
        self.strategies
            .iter()
            .find(|entry| entry.strategy.id() == id)
            .map(|entry| entry.weight)
    }

    /// One draw from `rng`, against the cumulative weights.
    pub fn select_strategy<R>(&self, rng: &mut R) -> Result<&SearchStrategy, ConfigError>
    where
        R: Rng,
    {
        self.strategies
            .choose_weighted(rng, |entry| entry.weight)
            .map(|entry| &entry.strategy)
            .map_err(|_| ConfigError::NoStrategies)
    }
}
