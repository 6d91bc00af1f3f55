use std::fmt::Display;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    problem::{
        job::JobIdx, neighborhood::JobNeighborhoods, vehicle::VehicleIdx,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::solution::working_solution::WorkingSolution,
};

use super::{
    ruin_cluster::RuinCluster,
    ruin_context::RuinContext,
    ruin_params::RuinParams,
    ruin_radial::RuinRadial,
    ruin_random::RuinRandom,
    ruin_share::RuinShareFactory,
    ruin_solution::{RuinSolution, removable_jobs},
    ruin_string::RuinString,
    ruin_worst::RuinWorst,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuinStrategy {
    Random,
    Radial,
    Worst,
    Cluster,
    String,
}

impl Display for RuinStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuinStrategy::Random => write!(f, "RuinRandom"),
            RuinStrategy::Radial => write!(f, "RuinRadial"),
            RuinStrategy::Worst => write!(f, "RuinWorst"),
            RuinStrategy::Cluster => write!(f, "RuinCluster"),
            RuinStrategy::String => write!(f, "RuinString"),
        }
    }
}

/// What a ruin left behind.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RuinOutcome {
    /// Jobs taken out of their routes, in index order.
    pub removed_jobs: Vec<JobIdx>,

    /// Vehicles of the routes that ended up empty.
    pub released_vehicles: Vec<VehicleIdx>,
}

impl RuinStrategy {
    pub fn share<'a>(&self, params: &'a RuinParams) -> &'a RuinShareFactory {
        match self {
            RuinStrategy::Random => &params.random_share,
            RuinStrategy::Radial => &params.radial_share,
            RuinStrategy::Worst => &params.worst_share,
            RuinStrategy::Cluster => &params.cluster_share,
            RuinStrategy::String => &params.string_share,
        }
    }

    /// Draws how many jobs to remove, runs the operator and drops the routes it emptied.
    /// A route left with nothing but breaks is emptied too.
    pub fn ruin<R>(
        &self,
        solution: &mut WorkingSolution,
        params: &RuinParams,
        problem: &VehicleRoutingProblem,
        neighborhoods: &JobNeighborhoods,
        rng: &mut R,
    ) -> RuinOutcome
    where
        R: Rng,
    {
        let before = solution.sorted_unassigned_jobs();
        let num_removable = removable_jobs(solution).len();
        let num_jobs_to_remove = self.share(params).create_share(num_removable, rng);

        if num_jobs_to_remove > 0 {
            self.ruin_solution(
                solution,
                RuinContext {
                    params,
                    problem,
                    neighborhoods,
                    rng,
                    num_jobs_to_remove,
                },
            );
        }

        let break_only: Vec<JobIdx> = solution
            .non_empty_routes_iter()
            .filter(|route| route.jobs().all(|job_id| problem.job(job_id).is_break()))
            .flat_map(|route| route.jobs())
            .collect();
        for job_id in break_only {
            solution.remove_job(job_id);
        }

        let released_vehicles = solution.remove_empty_routes();
        let removed_jobs: Vec<JobIdx> = solution
            .sorted_unassigned_jobs()
            .into_iter()
            .filter(|job_id| before.binary_search(job_id).is_err())
            .collect();

        trace!(
            strategy = %self,
            requested = num_jobs_to_remove,
            removed = removed_jobs.len(),
            released = released_vehicles.len(),
            "ruined solution"
        );

        RuinOutcome {
            removed_jobs,
            released_vehicles,
        }
    }
}

impl RuinSolution for RuinStrategy {
    fn ruin_solution<R>(&self, solution: &mut WorkingSolution, context: RuinContext<R>)
    where
        R: Rng,
    {
        match self {
            RuinStrategy::Random => RuinRandom.ruin_solution(solution, context),
            RuinStrategy::Radial => RuinRadial.ruin_solution(solution, context),
            RuinStrategy::Worst => RuinWorst.ruin_solution(solution, context),
            RuinStrategy::Cluster => RuinCluster.ruin_solution(solution, context),
            RuinStrategy::String => RuinString.ruin_solution(solution, context),
        }
    }
}
