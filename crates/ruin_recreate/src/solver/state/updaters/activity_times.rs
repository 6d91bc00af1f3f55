use crate::{
    error::StateError,
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        solution::{route::VehicleRoute, route_id::RouteIdx},
        state::{state_key::StateKey, state_manager::StateManager},
    },
};

use super::is_floating_break;

/// Forward pass setting arrival and end times, starting at the vehicle's earliest departure.
pub fn update_activity_times(
    problem: &VehicleRoutingProblem,
    route_id: RouteIdx,
    route: &mut VehicleRoute,
    states: &mut StateManager,
) -> Result<(), StateError> {
    let vehicle = problem.vehicle(route.vehicle_id());
    let driver = route.driver().clone();
    let transport_costs = problem.transport_costs();
    let activity_costs = problem.activity_costs();

    let (start, activities, end) = route.tour_mut();
    start.set_arrival_time(vehicle.earliest_start());
    start.set_end_time(vehicle.earliest_start());

    for position in 0..activities.len() {
        let (before, rest) = activities.split_at_mut(position);
        let previous = before.last().unwrap_or(&*start);
        let activity = &mut rest[0];

        if is_floating_break(problem, activity) {
            activity.set_location_id(previous.location_id());
        }

        let arrival_time = previous.end_time()
            + transport_costs.transport_time(
                previous.location_id(),
                activity.location_id(),
                previous.end_time(),
                &driver,
                Some(vehicle),
            );
        let operation_start = arrival_time.max(activity.earliest_start());
        let duration = activity_costs.activity_duration(
            previous,
            activity,
            arrival_time,
            &driver,
            Some(vehicle),
        );

        activity.set_arrival_time(arrival_time);
        activity.set_end_time(operation_start + duration);
    }

    let last = activities.last().unwrap_or(&*start);
    let arrival_at_end = if vehicle.return_to_depot() {
        last.end_time()
            + transport_costs.transport_time(
                last.location_id(),
                end.location_id(),
                last.end_time(),
                &driver,
                Some(vehicle),
            )
    } else {
        last.end_time()
    };
    end.set_arrival_time(arrival_at_end);
    end.set_end_time(arrival_at_end);

    let duration = arrival_at_end - start.end_time();
    states.put_route_state(route_id, StateKey::DURATION, duration)
}
