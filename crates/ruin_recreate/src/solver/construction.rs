use std::sync::Arc;

use tracing::debug;

use crate::{error::SolverError, problem::vehicle_routing_problem::VehicleRoutingProblem};

use super::{
    recreate::recreate_strategy::{RecreateSolution, RecreateStrategy},
    search_context::SearchContext,
    solution::working_solution::WorkingSolution,
};

/// Starts from the initial routes of the problem and inserts every other job
/// with `strategy`. The returned solution carries its cost.
pub fn construct_solution(
    problem: Arc<VehicleRoutingProblem>,
    strategy: RecreateStrategy,
    context: &mut SearchContext,
) -> Result<WorkingSolution, SolverError> {
    let mut solution = WorkingSolution::from_routes(Arc::clone(&problem), problem.initial_routes())?;

    let failed = strategy.recreate_solution(&mut solution, context.recreate_context())?;
    let cost = context.update_cost(&mut solution)?;

    debug!(
        %strategy,
        cost,
        routes = solution.non_empty_routes_count(),
        unassigned = failed.len(),
        "constructed initial solution"
    );

    Ok(solution)
}
