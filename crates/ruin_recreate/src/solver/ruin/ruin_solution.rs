use rand::Rng;

use crate::{
    problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::solution::working_solution::WorkingSolution,
};

use super::ruin_context::RuinContext;

pub trait RuinSolution {
    /// Removes up to `context.num_jobs_to_remove` jobs from their routes.
    fn ruin_solution<R>(&self, solution: &mut WorkingSolution, context: RuinContext<R>)
    where
        R: Rng;
}

/// Routed jobs a ruin may take out, in index order. Breaks stay with their route.
pub fn removable_jobs(solution: &WorkingSolution) -> Vec<JobIdx> {
    let problem: &VehicleRoutingProblem = solution.problem();
    let mut jobs: Vec<JobIdx> = solution
        .non_empty_routes_iter()
        .flat_map(|route| route.jobs())
        .filter(|&job_id| !problem.job(job_id).is_break())
        .collect();
    jobs.sort_unstable();
    jobs.dedup();
    jobs
}
