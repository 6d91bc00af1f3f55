use crate::{
    error::StateError,
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        solution::{route::VehicleRoute, route_id::RouteIdx},
        state::{state_key::StateKey, state_manager::StateManager},
    },
};

/// Accumulated transport and activity costs, per activity and for the whole route.
/// Needs the activity times to be up to date.
pub fn update_variable_costs(
    problem: &VehicleRoutingProblem,
    route_id: RouteIdx,
    route: &mut VehicleRoute,
    states: &mut StateManager,
) -> Result<(), StateError> {
    let vehicle = route.vehicle(problem);
    let transport_costs = problem.transport_costs();
    let activity_costs = problem.activity_costs();

    let mut total = 0.0;
    let mut previous = route.start();
    for activity in route.activities() {
        total += transport_costs.transport_cost(
            previous.location_id(),
            activity.location_id(),
            previous.end_time(),
            route.driver(),
            Some(vehicle),
        );
        total += activity_costs.activity_cost(
            activity,
            activity.arrival_time(),
            route.driver(),
            Some(vehicle),
        );
        states.put_activity_state(activity, StateKey::COSTS, total)?;
        previous = activity;
    }

    if vehicle.return_to_depot() {
        total += transport_costs.transport_cost(
            previous.location_id(),
            route.end().location_id(),
            previous.end_time(),
            route.driver(),
            Some(vehicle),
        );
    }

    states.put_route_state(route_id, StateKey::COSTS, total)
}
