//! Slack Induction by String Removals for Vehicle Routing Problems
//! Jan Christiaens, Greet Vanden Berghe

use fxhash::FxHashSet;
use rand::{Rng, seq::IndexedRandom};

use crate::{
    problem::job::JobIdx,
    solver::solution::{route_id::RouteIdx, working_solution::WorkingSolution},
};

use super::{
    ruin_context::RuinContext,
    ruin_params::RuinParams,
    ruin_solution::{RuinSolution, removable_jobs},
};

/// Removes strings of consecutive activities from a few neighboring routes,
/// sometimes keeping a substring in the middle.
pub struct RuinString;

impl RuinString {
    /// Starts of every string of `string_length` that covers `index`.
    fn compute_possible_string_start(
        string_length: usize,
        index: usize,
        route_length: usize,
    ) -> Vec<usize> {
        let mut starts = vec![];
        for i in 1..=string_length {
            let lower = index as i64 - (string_length as i64 - i as i64);
            let upper = index + (i - 1);
            if lower >= 0 && upper < route_length {
                starts.push(lower as usize);
            }
        }

        starts
    }

    fn compute_preserved_length<R>(string_length: usize, route_length: usize, rng: &mut R) -> usize
    where
        R: Rng,
    {
        if string_length == route_length {
            return 0;
        }

        let mut preserved_length = 1;
        while string_length + preserved_length < route_length {
            if rng.random_bool(0.01) {
                return preserved_length;
            }
            preserved_length += 1;
        }

        preserved_length
    }

    /// Positions of one string of `route_id`, with the preserved part left out.
    fn select_positions<R>(
        params: &RuinParams,
        route_length: usize,
        max_length: usize,
        rng: &mut R,
    ) -> Vec<usize>
    where
        R: Rng,
    {
        let string_length = rng
            .random_range(params.string_l_min..=params.string_l_max)
            .min(route_length)
            .min(max_length);
        if string_length == 0 {
            return Vec::new();
        }

        let split = rng.random_bool(0.5);
        let preserved_length = if split {
            Self::compute_preserved_length(string_length, route_length, rng)
        } else {
            0
        };
        let total_length = string_length + preserved_length;

        let random_activity = rng.random_range(0..route_length);
        let possible_starts =
            Self::compute_possible_string_start(total_length, random_activity, route_length);
        let Some(&start) = possible_starts.choose(rng) else {
            return Vec::new();
        };

        let preserved_start = if preserved_length > 0 {
            rng.random_range(0..string_length)
        } else {
            0
        };

        (0..total_length)
            .filter(|offset| {
                preserved_length == 0
                    || *offset < preserved_start
                    || *offset >= preserved_start + preserved_length
            })
            .map(|offset| start + offset)
            .collect()
    }

    /// Removes the jobs at `positions` of `route_id` and returns how many went out.
    fn remove_positions(
        solution: &mut WorkingSolution,
        route_id: RouteIdx,
        positions: &[usize],
    ) -> usize {
        let route = solution.route(route_id);
        let problem = solution.problem();
        let mut jobs: Vec<JobIdx> = positions
            .iter()
            .filter_map(|&position| route.activity(position).job())
            .filter(|&job_id| !problem.job(job_id).is_break())
            .collect();
        jobs.dedup();

        jobs.into_iter()
            .filter(|&job_id| solution.remove_job(job_id).is_some())
            .count()
    }
}

impl RuinSolution for RuinString {
    fn ruin_solution<R>(
        &self,
        solution: &mut WorkingSolution,
        RuinContext {
            params,
            rng,
            num_jobs_to_remove,
            neighborhoods,
            ..
        }: RuinContext<R>,
    ) where
        R: Rng,
    {
        let Some(&seed) = removable_jobs(solution).choose(rng) else {
            return;
        };

        let num_routes = rng
            .random_range(params.string_k_min..=params.string_k_max)
            .min(solution.non_empty_routes_count());

        let mut ruined_routes = FxHashSet::<RouteIdx>::default();
        let mut remaining = num_jobs_to_remove;
        let mut seed_job = seed;

        while ruined_routes.len() < num_routes && remaining > 0 {
            let Some(route_id) = solution.route_of_job(seed_job) else {
                break;
            };

            let route_length = solution.route(route_id).len();
            let positions = Self::select_positions(params, route_length, remaining, rng);
            let removed = Self::remove_positions(solution, route_id, &positions);
            remaining = remaining.saturating_sub(removed);
            ruined_routes.insert(route_id);

            let next_seed = neighborhoods.neighbors(seed_job).iter().copied().find(|&job_id| {
                solution
                    .route_of_job(job_id)
                    .is_some_and(|route_id| !ruined_routes.contains(&route_id))
            });

            match next_seed {
                Some(job_id) => seed_job = job_id,
                None => break,
            }
        }
    }
}
