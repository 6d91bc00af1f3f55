use crate::{
    error::StateError,
    solver::{
        solution::working_solution::WorkingSolution,
        state::{state_key::StateKey, state_manager::StateManager},
    },
    utils::enumerate_idx::EnumerateIdx,
};

use super::solution::{route::VehicleRoute, route_id::RouteIdx};

/// Total cost of a solution. `states` must be in sync with `solution`.
pub trait SolutionCostCalculator: Send + Sync {
    fn calculate_cost(
        &self,
        solution: &WorkingSolution,
        states: &StateManager,
    ) -> Result<f64, StateError>;
}

/// Fixed costs of the used vehicles, variable route costs and a penalty per
/// unassigned job that grows with its priority.
#[derive(Debug, Clone, Copy)]
pub struct DefaultSolutionCostCalculator {
    penalty_factor: f64,
}

impl DefaultSolutionCostCalculator {
    pub fn new(penalty_factor: f64) -> Self {
        DefaultSolutionCostCalculator { penalty_factor }
    }

    pub fn unassigned_penalty(&self, solution: &WorkingSolution) -> f64 {
        let problem = solution.problem();
        let max_cost = problem.max_transport_cost();

        solution
            .unassigned_jobs()
            .iter()
            .filter(|&&job_id| {
                // A break only counts when its vehicle is on the road
                problem.job(job_id).break_vehicle().is_none_or(|vehicle_id| {
                    solution
                        .non_empty_routes_iter()
                        .any(|route| route.vehicle_id() == vehicle_id)
                })
            })
            .map(|&job_id| {
                let priority = f64::from(problem.job(job_id).priority());
                self.penalty_factor * (11.0 - priority) * max_cost
            })
            .sum()
    }
}

impl SolutionCostCalculator for DefaultSolutionCostCalculator {
    fn calculate_cost(
        &self,
        solution: &WorkingSolution,
        states: &StateManager,
    ) -> Result<f64, StateError> {
        let problem = solution.problem();

        let mut cost = 0.0;
        for (route_id, route) in solution.routes().iter().enumerate_idx() {
            let (route_id, route): (RouteIdx, &VehicleRoute) = (route_id, route);
            if route.is_empty() {
                continue;
            }

            cost += route.vehicle(problem).vehicle_type().costs().fixed;
            cost += *states.route_state::<f64>(route_id, StateKey::COSTS)?;
        }

        Ok(cost + self.unassigned_penalty(solution))
    }
}
