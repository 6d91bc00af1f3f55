use crate::{
    error::StateError,
    problem::{
        location::LocationIdx, vehicle::Vehicle, vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        solution::{route::VehicleRoute, route_id::RouteIdx},
        state::{state_key::StateKey, state_manager::StateManager},
    },
};

use super::is_floating_break;

/// Where each activity of `route` takes place, a floating break sitting where
/// the activity before it is. Stored break locations may predate the last change.
fn activity_locations(problem: &VehicleRoutingProblem, route: &VehicleRoute) -> Vec<LocationIdx> {
    let mut previous = route.start().location_id();
    route
        .activities()
        .iter()
        .map(|activity| {
            if !is_floating_break(problem, activity) {
                previous = activity.location_id();
            }
            previous
        })
        .collect()
}

/// Latest time at which each activity of `route` may start so that every later
/// activity, and the return to the depot, stays within its window when the
/// route is driven by `vehicle`.
pub fn compute_latest_starts(
    problem: &VehicleRoutingProblem,
    route: &VehicleRoute,
    vehicle: &Vehicle,
) -> Vec<f64> {
    let transport_costs = problem.transport_costs();
    let activity_costs = problem.activity_costs();
    let activities = route.activities();
    let locations = activity_locations(problem, route);

    let mut latest_starts = vec![0.0; activities.len()];
    let mut latest_at_next = vehicle.latest_arrival();
    let mut next_location = vehicle.end_location_id();

    for (position, activity) in activities.iter().enumerate().rev() {
        let is_last = position + 1 == activities.len();

        let latest = if is_last && !vehicle.return_to_depot() {
            activity.latest_start()
        } else {
            let travel_time = transport_costs.backward_transport_time(
                locations[position],
                next_location,
                latest_at_next,
                route.driver(),
                Some(vehicle),
            );
            let duration = activity_costs.activity_duration(
                route.previous(position),
                activity,
                latest_at_next,
                route.driver(),
                Some(vehicle),
            );
            (latest_at_next - travel_time - duration).min(activity.latest_start())
        };

        latest_starts[position] = latest;
        latest_at_next = latest;
        next_location = locations[position];
    }

    latest_starts
}

pub fn update_latest_operation_starts(
    problem: &VehicleRoutingProblem,
    _route_id: RouteIdx,
    route: &mut VehicleRoute,
    states: &mut StateManager,
) -> Result<(), StateError> {
    let vehicle = route.vehicle(problem);
    let latest_starts = compute_latest_starts(problem, route, vehicle);

    for (activity, latest) in route.activities().iter().zip(latest_starts) {
        states.put_activity_state(activity, StateKey::LATEST_OPERATION_START, latest)?;
    }

    Ok(())
}
