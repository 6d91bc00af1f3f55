use rand::{Rng, seq::IndexedRandom};

use crate::solver::solution::working_solution::WorkingSolution;

use super::{
    ruin_context::RuinContext,
    ruin_solution::{RuinSolution, removable_jobs},
};

/// Removes jobs drawn uniformly from the routed ones.
pub struct RuinRandom;

impl RuinSolution for RuinRandom {
    fn ruin_solution<R>(
        &self,
        solution: &mut WorkingSolution,
        RuinContext {
            rng,
            num_jobs_to_remove,
            ..
        }: RuinContext<R>,
    ) where
        R: Rng,
    {
        let candidates = removable_jobs(solution);
        let selected: Vec<_> = candidates
            .choose_multiple(rng, num_jobs_to_remove)
            .copied()
            .collect();

        for job_id in selected {
            solution.remove_job(job_id);
        }
    }
}
