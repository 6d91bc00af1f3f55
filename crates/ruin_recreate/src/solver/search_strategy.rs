use std::{fmt::Display, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    acceptor::{
        accept_solution::{AcceptSolution, AcceptSolutionContext},
        solution_acceptor::SolutionAcceptor,
    },
    error::SolverError,
    problem::job::JobIdx,
    selector::{select_solution::SelectSolution, solution_selector::SolutionSelector},
};

use super::{
    accepted_solution::{AcceptedSolution, insert_solution},
    recreate::recreate_strategy::{RecreateSolution, RecreateStrategy},
    ruin::ruin_strategy::RuinStrategy,
    search_context::SearchContext,
    solution::working_solution::WorkingSolution,
};

/// Removes jobs with `ruin` and puts them back with `recreate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuinAndRecreate {
    pub ruin: RuinStrategy,
    pub recreate: RecreateStrategy,
}

impl Display for RuinAndRecreate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} + {}", self.ruin, self.recreate)
    }
}

impl RuinAndRecreate {
    /// Returns the jobs that could not be put back.
    pub fn run(
        &self,
        solution: &mut WorkingSolution,
        context: &mut SearchContext,
    ) -> Result<Vec<JobIdx>, SolverError> {
        let outcome = self.ruin.ruin(
            solution,
            context.ruin_params,
            context.problem,
            context.neighborhoods,
            &mut *context.rng,
        );

        context
            .fleet
            .sync(solution.non_empty_routes_iter().map(|route| route.vehicle_id()))?;

        let failed = self
            .recreate
            .recreate_solution(solution, context.recreate_context())?;

        trace!(
            module = %self,
            removed = outcome.removed_jobs.len(),
            failed = failed.len(),
            "ran ruin and recreate"
        );

        Ok(failed)
    }
}

/// The candidate produced by one strategy run.
pub struct StrategyResult {
    pub solution: WorkingSolution,
    pub cost: f64,
    pub accepted: bool,
}

pub struct SearchStrategy {
    id: String,
    selector: SolutionSelector,
    modules: Vec<RuinAndRecreate>,
    acceptor: Arc<SolutionAcceptor>,
}

impl SearchStrategy {
    pub fn new(
        id: impl Into<String>,
        selector: SolutionSelector,
        modules: Vec<RuinAndRecreate>,
        acceptor: Arc<SolutionAcceptor>,
    ) -> Self {
        SearchStrategy {
            id: id.into(),
            selector,
            modules,
            acceptor,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn modules(&self) -> &[RuinAndRecreate] {
        &self.modules
    }

    /// Selects a solution of the pool, changes a copy of it with every module and
    /// lets the acceptor decide whether the copy enters the pool.
    pub fn run(
        &self,
        solutions: &mut Vec<AcceptedSolution>,
        context: &mut SearchContext,
    ) -> Result<StrategyResult, SolverError> {
        let mut solution = self
            .selector
            .select_solution(solutions, &mut *context.rng)
            .map(|selected| selected.solution.clone())
            .ok_or_else(|| SolverError::EmptySelection {
                strategy: self.id.clone(),
                pool_size: solutions.len(),
            })?;

        for module in &self.modules {
            module.run(&mut solution, context)?;
        }

        let cost = context.update_cost(&mut solution)?;

        let accepted = self.acceptor.accept(
            solutions,
            cost,
            &AcceptSolutionContext {
                iteration: context.iteration,
                max_iterations: context.max_iterations,
                max_solutions: context.max_solutions,
            },
        );

        if accepted {
            insert_solution(
                solutions,
                AcceptedSolution {
                    solution: solution.clone(),
                    cost,
                },
                context.max_solutions,
            );
        }

        Ok(StrategyResult {
            solution,
            cost,
            accepted,
        })
    }
}
