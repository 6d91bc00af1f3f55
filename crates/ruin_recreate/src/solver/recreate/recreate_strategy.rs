use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    error::SolverError,
    problem::job::JobIdx,
    solver::solution::working_solution::WorkingSolution,
};

use super::{
    best_insertion::{BestInsertion, BestInsertionSortStrategy},
    recreate_context::RecreateContext,
    regret_insertion::RegretInsertion,
};

pub trait RecreateSolution {
    /// Inserts the unassigned jobs of `solution` and returns those that fit nowhere.
    fn recreate_solution(
        &self,
        solution: &mut WorkingSolution,
        context: RecreateContext,
    ) -> Result<Vec<JobIdx>, SolverError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecreateStrategy {
    BestInsertion(BestInsertionSortStrategy),
    RegretInsertion,
    FastRegretInsertion,
}

impl Default for RecreateStrategy {
    fn default() -> Self {
        RecreateStrategy::BestInsertion(BestInsertionSortStrategy::Random)
    }
}

impl Display for RecreateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BestInsertion(sort_strategy) => write!(f, "BestInsertion({sort_strategy})"),
            Self::RegretInsertion => write!(f, "RegretInsertion"),
            Self::FastRegretInsertion => write!(f, "FastRegretInsertion"),
        }
    }
}

impl RecreateSolution for RecreateStrategy {
    fn recreate_solution(
        &self,
        solution: &mut WorkingSolution,
        context: RecreateContext,
    ) -> Result<Vec<JobIdx>, SolverError> {
        match self {
            RecreateStrategy::BestInsertion(sort_strategy) => {
                BestInsertion::new(*sort_strategy).recreate_solution(solution, context)
            }
            RecreateStrategy::RegretInsertion => {
                RegretInsertion::new(false).recreate_solution(solution, context)
            }
            RecreateStrategy::FastRegretInsertion => {
                RegretInsertion::new(true).recreate_solution(solution, context)
            }
        }
    }
}
