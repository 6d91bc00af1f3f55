use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{
    acceptor::solution_acceptor::SolutionAcceptorParams, error::ConfigError,
    selector::solution_selector::SolutionSelector,
};

use super::{
    recreate::{
        best_insertion::BestInsertionSortStrategy, recreate_params::RecreateParams,
        recreate_strategy::RecreateStrategy,
    },
    ruin::{ruin_params::RuinParams, ruin_strategy::RuinStrategy},
    search_strategy::RuinAndRecreate,
    termination::Termination,
};

/// One weighted search strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    pub id: String,
    pub weight: f64,
    #[serde(default)]
    pub selector: SolutionSelector,
    pub modules: Vec<RuinAndRecreate>,
}

impl StrategyParams {
    pub fn new(id: impl Into<String>, weight: f64, modules: Vec<RuinAndRecreate>) -> Self {
        StrategyParams {
            id: id.into(),
            weight,
            selector: SolutionSelector::default(),
            modules,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmParams {
    pub max_iterations: usize,
    pub random_seed: u64,

    /// Workers evaluating insertion candidates. 1 evaluates on the calling thread.
    pub insertion_threads: usize,

    /// How the first solution is built when none is supplied.
    pub construction: RecreateStrategy,

    pub max_solutions: usize,
    pub acceptor: SolutionAcceptorParams,
    pub strategies: Vec<StrategyParams>,
    pub terminations: Vec<Termination>,

    pub ruin: RuinParams,
    pub recreate: RecreateParams,
    pub neighborhood_size: usize,

    /// Weight of the fixed cost of a vehicle while the solution is still far from complete.
    pub fixed_cost_weight: f64,

    /// Deliveries have to come before any pickup on a route.
    pub deliveries_first: bool,

    /// Scales the cost of leaving a job unassigned.
    pub penalty_factor: f64,
}

impl Default for AlgorithmParams {
    fn default() -> Self {
        AlgorithmParams {
            max_iterations: 2000,
            random_seed: 2427121,
            insertion_threads: 1,
            construction: RecreateStrategy::BestInsertion(BestInsertionSortStrategy::Random),
            max_solutions: 1,
            acceptor: SolutionAcceptorParams::default(),
            strategies: default_strategies(),
            terminations: Vec::new(),
            ruin: RuinParams::default(),
            recreate: RecreateParams::default(),
            neighborhood_size: 50,
            fixed_cost_weight: 0.0,
            deliveries_first: false,
            penalty_factor: 1.0,
        }
    }
}

/// Every ruin paired with best and with regret insertion, equally weighted.
pub fn default_strategies() -> Vec<StrategyParams> {
    let ruins = [
        ("random", RuinStrategy::Random),
        ("radial", RuinStrategy::Radial),
        ("worst", RuinStrategy::Worst),
        ("cluster", RuinStrategy::Cluster),
        ("string", RuinStrategy::String),
    ];
    let recreates = [
        (
            "best",
            RecreateStrategy::BestInsertion(BestInsertionSortStrategy::Random),
        ),
        ("regret", RecreateStrategy::RegretInsertion),
    ];

    ruins
        .iter()
        .flat_map(|&(ruin_name, ruin)| {
            recreates.iter().map(move |&(recreate_name, recreate)| {
                StrategyParams::new(
                    format!("{ruin_name}_{recreate_name}"),
                    1.0,
                    vec![RuinAndRecreate { ruin, recreate }],
                )
            })
        })
        .collect()
}

fn invalid(name: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidParameter { name, reason }
}

impl AlgorithmParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.insertion_threads == 0 {
            return Err(invalid("insertion_threads", "must be at least 1".to_owned()));
        }

        if self.max_solutions == 0 {
            return Err(invalid("max_solutions", "must be at least 1".to_owned()));
        }

        if self.neighborhood_size == 0 {
            return Err(invalid("neighborhood_size", "must be at least 1".to_owned()));
        }

        if !(self.fixed_cost_weight >= 0.0 && self.fixed_cost_weight.is_finite()) {
            return Err(invalid(
                "fixed_cost_weight",
                format!("{} must be a non-negative number", self.fixed_cost_weight),
            ));
        }

        if !(self.penalty_factor >= 0.0 && self.penalty_factor.is_finite()) {
            return Err(invalid(
                "penalty_factor",
                format!("{} must be a non-negative number", self.penalty_factor),
            ));
        }

        if self.strategies.is_empty() {
            return Err(ConfigError::NoStrategies);
        }

        let mut ids = FxHashSet::default();
        for strategy in &self.strategies {
            if !ids.insert(strategy.id.as_str()) {
                return Err(ConfigError::DuplicateStrategy(strategy.id.clone()));
            }
            if !(strategy.weight > 0.0 && strategy.weight.is_finite()) {
                return Err(ConfigError::InvalidStrategyWeight(strategy.id.clone()));
            }
            if strategy.modules.is_empty() {
                return Err(invalid(
                    "modules",
                    format!("strategy '{}' has no ruin and recreate module", strategy.id),
                ));
            }
        }

        for termination in &self.terminations {
            termination.validate()?;
        }

        self.acceptor.validate()?;
        self.ruin.validate()?;
        self.recreate.validate()
    }
}
