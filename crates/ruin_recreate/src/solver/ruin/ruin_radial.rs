use rand::{Rng, seq::IndexedRandom};

use crate::solver::solution::working_solution::WorkingSolution;

use super::{
    ruin_context::RuinContext,
    ruin_solution::{RuinSolution, removable_jobs},
};

/// Removes a random job and its nearest neighbors.
pub struct RuinRadial;

impl RuinSolution for RuinRadial {
    fn ruin_solution<R>(
        &self,
        solution: &mut WorkingSolution,
        RuinContext {
            rng,
            num_jobs_to_remove,
            problem,
            neighborhoods,
            ..
        }: RuinContext<R>,
    ) where
        R: Rng,
    {
        if num_jobs_to_remove == 0 {
            return;
        }

        let Some(&seed) = removable_jobs(solution).choose(rng) else {
            return;
        };

        solution.remove_job(seed);
        let mut remaining = num_jobs_to_remove - 1;

        for job_id in neighborhoods.neighbors(seed) {
            if remaining == 0 {
                break;
            }

            if problem.job(*job_id).is_break() {
                continue;
            }

            if solution.remove_job(*job_id).is_some() {
                remaining -= 1;
            }
        }
    }
}
