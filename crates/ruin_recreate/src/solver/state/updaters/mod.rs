use crate::{
    problem::{job::Job, vehicle_routing_problem::VehicleRoutingProblem},
    solver::solution::activity::{ActivityKind, TourActivity},
};

use super::state_manager::StateUpdater;

pub mod activity_times;
pub mod costs;
pub mod loads;
pub mod skills;
pub mod time_windows;
pub mod violations;
pub mod waiting_times;

/// Loads, time window slack, skills, violations, times, costs and waiting, in that order.
pub fn default_updaters() -> [StateUpdater; 7] {
    [
        StateUpdater::new("loads", loads::update_loads),
        StateUpdater::new(
            "latest_operation_starts",
            time_windows::update_latest_operation_starts,
        ),
        StateUpdater::new("skills", skills::update_skills),
        StateUpdater::new("violations", violations::update_violations),
        StateUpdater::new("activity_times", activity_times::update_activity_times),
        StateUpdater::new("variable_costs", costs::update_variable_costs),
        StateUpdater::new("waiting_times", waiting_times::update_waiting_times),
    ]
}

/// A break without a location is performed wherever the vehicle is.
pub(crate) fn is_floating_break(problem: &VehicleRoutingProblem, activity: &TourActivity) -> bool {
    if activity.kind() != ActivityKind::Break {
        return false;
    }

    activity.job().is_some_and(|job_id| {
        matches!(problem.job(job_id), Job::Break { vehicle_break, .. } if vehicle_break.location_id().is_none())
    })
}
