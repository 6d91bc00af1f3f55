use crate::{
    error::StateError,
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        solution::{route::VehicleRoute, route_id::RouteIdx},
        state::{state_key::StateKey, state_manager::StateManager},
    },
};

pub fn update_skills(
    problem: &VehicleRoutingProblem,
    route_id: RouteIdx,
    route: &mut VehicleRoute,
    states: &mut StateManager,
) -> Result<(), StateError> {
    let violated = route
        .jobs()
        .any(|job_id| !problem.is_job_compatible_with_vehicle(job_id, route.vehicle_id()));

    states.put_route_state(route_id, StateKey::SKILL_VIOLATED, violated)
}
