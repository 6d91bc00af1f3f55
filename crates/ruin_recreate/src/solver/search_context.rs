use rand::rngs::SmallRng;

use crate::{
    error::SolverError,
    problem::{neighborhood::JobNeighborhoods, vehicle_routing_problem::VehicleRoutingProblem},
};

use super::{
    constraints::constraint_manager::ConstraintManager,
    cost_calculator::SolutionCostCalculator,
    fleet::vehicle_fleet_manager::VehicleFleetManager,
    recreate::{recreate_context::RecreateContext, recreate_params::RecreateParams},
    ruin::ruin_params::RuinParams,
    solution::working_solution::WorkingSolution,
    state::state_manager::StateManager,
};

/// Everything a strategy needs to turn one solution into another.
pub struct SearchContext<'a> {
    pub problem: &'a VehicleRoutingProblem,
    pub constraints: &'a ConstraintManager,
    pub neighborhoods: &'a JobNeighborhoods,
    pub cost_calculator: &'a dyn SolutionCostCalculator,
    pub ruin_params: &'a RuinParams,
    pub recreate_params: &'a RecreateParams,
    pub thread_pool: Option<&'a rayon::ThreadPool>,
    pub states: &'a mut StateManager,
    pub fleet: &'a mut VehicleFleetManager,
    pub rng: &'a mut SmallRng,
    pub iteration: usize,
    pub max_iterations: usize,
    pub max_solutions: usize,
}

impl SearchContext<'_> {
    pub fn recreate_context(&mut self) -> RecreateContext<'_> {
        RecreateContext {
            problem: self.problem,
            constraints: self.constraints,
            states: &mut *self.states,
            fleet: &mut *self.fleet,
            rng: &mut *self.rng,
            thread_pool: self.thread_pool,
            params: self.recreate_params,
        }
    }

    /// Brings the states in line with `solution` and stores its cost on it.
    pub fn update_cost(&mut self, solution: &mut WorkingSolution) -> Result<f64, SolverError> {
        self.states.update_solution(solution)?;
        let cost = self.cost_calculator.calculate_cost(solution, self.states)?;
        solution.set_cost(cost);
        Ok(cost)
    }
}
