use crate::{
    error::StateError,
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        solution::{route::VehicleRoute, route_id::RouteIdx},
        state::{state_key::StateKey, state_manager::StateManager},
    },
};

pub fn update_waiting_times(
    _problem: &VehicleRoutingProblem,
    route_id: RouteIdx,
    route: &mut VehicleRoute,
    states: &mut StateManager,
) -> Result<(), StateError> {
    let mut future_waiting = 0.0;
    for activity in route.activities().iter().rev() {
        let waiting = (activity.earliest_start() - activity.arrival_time()).max(0.0);
        future_waiting += waiting;
        states.put_activity_state(activity, StateKey::WAITING, waiting)?;
        states.put_activity_state(activity, StateKey::FUTURE_WAITING, future_waiting)?;
    }

    states.put_route_state(route_id, StateKey::WAITING, future_waiting)
}
