use rand::rngs::SmallRng;
use rayon::prelude::*;
use tracing::trace;

use crate::{
    error::{SolverError, StateError},
    problem::{job::JobIdx, vehicle::VehicleIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        constraints::constraint_manager::ConstraintManager,
        fleet::vehicle_fleet_manager::VehicleFleetManager,
        insertion::{InsertionData, InsertionResult, InsertionRoute},
        insertion_calculator::JobInsertionCalculator,
        noise::NoiseGenerator,
        solution::{route::VehicleRoute, route_id::RouteIdx, working_solution::WorkingSolution},
        state::state_manager::StateManager,
    },
    utils::enumerate_idx::EnumerateIdx,
};

use super::recreate_params::RecreateParams;

/// A route to try a job in, with the vehicle that would drive it.
/// `route_id` is `None` for a new route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteCandidate {
    pub route_id: Option<RouteIdx>,
    pub vehicle_id: VehicleIdx,
}

pub struct RecreateContext<'a> {
    pub problem: &'a VehicleRoutingProblem,
    pub constraints: &'a ConstraintManager,
    pub states: &'a mut StateManager,
    pub fleet: &'a mut VehicleFleetManager,
    pub rng: &'a mut SmallRng,
    pub thread_pool: Option<&'a rayon::ThreadPool>,
    pub params: &'a RecreateParams,
}

impl<'a> RecreateContext<'a> {
    /// Brings fleet and states in line with `solution` and draws the noise of the pass.
    pub fn begin_pass(
        &mut self,
        solution: &mut WorkingSolution,
    ) -> Result<Option<NoiseGenerator>, SolverError> {
        self.fleet
            .sync(solution.non_empty_routes_iter().map(|route| route.vehicle_id()))?;
        self.states.update_solution(solution)?;

        if self.params.noise_level > 0.0 && self.params.noise_probability > 0.0 {
            Ok(Some(NoiseGenerator::new(
                self.problem.num_jobs(),
                self.problem.max_transport_cost(),
                self.params.noise_probability,
                self.params.noise_level,
                &mut *self.rng,
            )))
        } else {
            Ok(None)
        }
    }

    pub fn calculator<'b>(
        &'b self,
        noise: Option<&'b NoiseGenerator>,
        completeness: f64,
    ) -> JobInsertionCalculator<'b> {
        JobInsertionCalculator {
            problem: self.problem,
            states: &*self.states,
            constraints: self.constraints,
            noise,
            completeness,
        }
    }

    /// Vehicles that may drive `route` once `job_id` joins it: its own, plus one
    /// available vehicle of every other type when vehicles may switch. A route
    /// holding a break keeps the vehicle the break belongs to.
    pub fn route_vehicles(&self, route: &VehicleRoute, job_id: JobIdx) -> Vec<VehicleIdx> {
        let mut vehicles = vec![route.vehicle_id()];
        if self.params.vehicle_switch && !route.jobs().any(|job| self.problem.job(job).is_break()) {
            let identity = route.vehicle(self.problem).type_identity();
            vehicles.extend(self.fleet.available_vehicles_without(Some(identity)));
        }

        self.retain_compatible(job_id, &mut vehicles);
        vehicles
    }

    /// One available vehicle per type that could open a new route for `job_id`.
    /// A break never opens a route on its own.
    pub fn new_route_vehicles(&self, job_id: JobIdx) -> Vec<VehicleIdx> {
        if self.problem.job(job_id).is_break() {
            return Vec::new();
        }

        let mut vehicles = self.fleet.available_vehicles();
        self.retain_compatible(job_id, &mut vehicles);
        vehicles
    }

    // Skills are left to the constraints so that failures carry a reason.
    fn retain_compatible(&self, job_id: JobIdx, vehicles: &mut Vec<VehicleIdx>) {
        if let Some(break_vehicle) = self.problem.job(job_id).break_vehicle() {
            vehicles.retain(|&vehicle_id| vehicle_id == break_vehicle);
        }
    }

    /// Every non-empty route with each of its possible vehicles, then every new route.
    pub fn route_candidates(&self, solution: &WorkingSolution, job_id: JobIdx) -> Vec<RouteCandidate> {
        let mut candidates = Vec::new();

        for (route_id, route) in solution.routes().iter().enumerate_idx() {
            let route_id: RouteIdx = route_id;
            if route.is_empty() {
                continue;
            }

            candidates.extend(self.route_vehicles(route, job_id).into_iter().map(|vehicle_id| {
                RouteCandidate {
                    route_id: Some(route_id),
                    vehicle_id,
                }
            }));
        }

        candidates.extend(self.new_route_vehicles(job_id).into_iter().map(|vehicle_id| {
            RouteCandidate {
                route_id: None,
                vehicle_id,
            }
        }));

        candidates
    }

    /// Evaluates every candidate, in parallel when the context has a pool.
    /// Results keep the order of `candidates`.
    pub fn evaluate(
        &self,
        calculator: &JobInsertionCalculator,
        solution: &WorkingSolution,
        job_id: JobIdx,
        candidates: &[RouteCandidate],
    ) -> Result<Vec<InsertionResult>, StateError> {
        let evaluate = |candidate: &RouteCandidate| {
            calculator.calculate_in(solution, candidate.route_id, job_id, candidate.vehicle_id)
        };

        match self.thread_pool {
            Some(thread_pool) if candidates.len() > 1 => {
                thread_pool.install(|| candidates.par_iter().map(evaluate).collect())
            }
            _ => candidates.iter().map(evaluate).collect(),
        }
    }

    /// Best insertion of `job_id` over all of its route candidates.
    pub fn best_insertion(
        &self,
        calculator: &JobInsertionCalculator,
        solution: &WorkingSolution,
        job_id: JobIdx,
    ) -> Result<InsertionResult, StateError> {
        let candidates = self.route_candidates(solution, job_id);
        let results = self.evaluate(calculator, solution, job_id, &candidates)?;

        Ok(results
            .into_iter()
            .fold(InsertionResult::failure(), InsertionResult::merge))
    }

    /// Applies `data`, moves the vehicles in the fleet and recomputes the route states.
    pub fn insert(
        &mut self,
        solution: &mut WorkingSolution,
        data: &InsertionData,
    ) -> Result<RouteIdx, SolverError> {
        let previous_vehicle = match data.route {
            InsertionRoute::Existing(route_id) => {
                Some(solution.route(route_id).vehicle_id())
            }
            InsertionRoute::New => None,
        };

        if previous_vehicle != Some(data.vehicle_id) {
            if let Some(previous_vehicle) = previous_vehicle {
                self.fleet.unlock(previous_vehicle)?;
            }
            self.fleet.lock(data.vehicle_id)?;
        }

        let route_id = solution.insert(data);
        trace!(job = %data.job_id, route = %route_id, cost = data.cost, "inserted job");

        self.states
            .update_route(self.problem, route_id, solution.route_mut(route_id))?;

        Ok(route_id)
    }

    /// True when `data` still uses a vehicle it may use.
    pub fn is_vehicle_available(&self, solution: &WorkingSolution, data: &InsertionData) -> bool {
        match data.route {
            InsertionRoute::Existing(route_id)
                if solution.route(route_id).vehicle_id() == data.vehicle_id =>
            {
                true
            }
            _ => !self.fleet.is_locked(data.vehicle_id),
        }
    }
}
