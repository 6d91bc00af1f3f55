use crate::{
    error::StateError,
    problem::{capacity::Capacity, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        solution::{activity::ActivityKind, route::VehicleRoute, route_id::RouteIdx},
        state::{state_key::StateKey, state_manager::StateManager},
    },
};

/// Load carried when leaving the depot (service deliveries) and when coming back
/// (service pickups), load after every activity, and running maxima in both directions.
pub fn update_loads(
    _problem: &VehicleRoutingProblem,
    route_id: RouteIdx,
    route: &mut VehicleRoute,
    states: &mut StateManager,
) -> Result<(), StateError> {
    let mut load_at_beginning = Capacity::ZERO;
    let mut load_at_end = Capacity::ZERO;
    for activity in route.activities() {
        match activity.kind() {
            ActivityKind::DeliverService => load_at_beginning -= activity.size(),
            ActivityKind::PickupService | ActivityKind::Service => load_at_end += activity.size(),
            _ => {}
        }
    }

    let mut current = load_at_beginning.clone();
    let mut past_max = load_at_beginning.clone();
    let mut loads = Vec::with_capacity(route.len());
    for activity in route.activities() {
        current += activity.size();
        past_max = past_max.max(&current);
        states.put_activity_state(activity, StateKey::LOAD, current.clone())?;
        states.put_activity_state(activity, StateKey::PAST_MAX_LOAD, past_max.clone())?;
        loads.push(current.clone());
    }

    let mut future_max = load_at_end.clone();
    for (activity, load) in route.activities().iter().zip(loads).rev() {
        future_max = future_max.max(&load);
        states.put_activity_state(activity, StateKey::FUTURE_MAX_LOAD, future_max.clone())?;
    }

    states.put_route_state(route_id, StateKey::MAX_LOAD, past_max.max(&load_at_end))?;
    states.put_route_state(route_id, StateKey::LOAD_AT_BEGINNING, load_at_beginning)?;
    states.put_route_state(route_id, StateKey::LOAD_AT_END, load_at_end)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::job::{Job, JobIdx},
        test_utils::{self, TestRoute},
    };

    use super::*;

    #[test]
    fn test_mixed_pickups_and_deliveries() {
        let mut jobs: Vec<Job> = vec![
            test_utils::create_delivery(1, 3.0),
            test_utils::create_pickup(2, 2.0),
            test_utils::create_delivery(3, 1.0),
        ];
        jobs.push(test_utils::create_pickup(4, 5.0));

        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(3, 3),
            jobs,
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0, 1, 2, 3],
            }],
        );
        let mut states = StateManager::with_default_updaters(&problem);
        states.update_solution(&mut solution).unwrap();

        let route_id = RouteIdx::new(0);
        let load = |job: usize, key: StateKey| {
            let activity = &problem.job_activities(JobIdx::new(job))[0];
            states.activity_state::<Capacity>(activity, key).unwrap().get(0)
        };

        // 4 -> 1 -> 3 -> 2 -> 7
        assert_eq!(
            states
                .route_state::<Capacity>(route_id, StateKey::LOAD_AT_BEGINNING)
                .unwrap()
                .get(0),
            4.0
        );
        assert_eq!(
            states
                .route_state::<Capacity>(route_id, StateKey::LOAD_AT_END)
                .unwrap()
                .get(0),
            7.0
        );
        assert_eq!(load(0, StateKey::LOAD), 1.0);
        assert_eq!(load(1, StateKey::LOAD), 3.0);
        assert_eq!(load(2, StateKey::LOAD), 2.0);
        assert_eq!(load(3, StateKey::LOAD), 7.0);

        assert_eq!(load(0, StateKey::PAST_MAX_LOAD), 4.0);
        assert_eq!(load(2, StateKey::FUTURE_MAX_LOAD), 7.0);
        assert_eq!(load(1, StateKey::FUTURE_MAX_LOAD), 7.0);
        assert_eq!(
            states
                .route_state::<Capacity>(route_id, StateKey::MAX_LOAD)
                .unwrap()
                .get(0),
            7.0
        );
    }
}
