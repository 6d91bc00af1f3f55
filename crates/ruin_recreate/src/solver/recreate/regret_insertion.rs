use rayon::prelude::*;
use tracing::trace;

use crate::{
    error::{SolverError, StateError},
    problem::job::JobIdx,
    solver::{
        constraints::constraint::FailureReasons,
        insertion::{InsertionData, InsertionResult},
        insertion_calculator::JobInsertionCalculator,
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    },
    utils::enumerate_idx::EnumerateIdx,
};

use super::{
    insertion_cache::InsertionCache,
    recreate_context::RecreateContext,
    recreate_strategy::RecreateSolution,
    regret_scorer::{RegretScorer, highest_score},
};

/// Inserts first the job that would cost the most to postpone.
///
/// Every round scores each remaining job by the gap between its best and
/// second best route, then places the highest scoring one. The fast variant
/// keeps per-route results until the route changes or a vehicle is released.
/// It falls back to the plain variant when route costs vary along the pass.
#[derive(Default)]
pub struct RegretInsertion {
    fast: bool,
}

/// Best and second best route of one job for the current round.
#[derive(Default)]
struct JobRegret {
    best: Option<InsertionData>,
    second_best_cost: Option<f64>,
    reasons: FailureReasons,
}

impl JobRegret {
    /// Takes the best result of one route, new routes counting as one.
    fn consider(&mut self, result: InsertionResult) {
        match result {
            InsertionResult::Success(data) => match &self.best {
                Some(best) if !data.is_better_than(best) => {
                    if self.second_best_cost.is_none_or(|cost| data.cost < cost) {
                        self.second_best_cost = Some(data.cost);
                    }
                }
                _ => {
                    self.second_best_cost = self.best.as_ref().map(|best| best.cost);
                    self.best = Some(data);
                }
            },
            InsertionResult::Failure(reasons) => self.reasons.extend(reasons),
        }
    }
}

impl RegretInsertion {
    pub fn new(fast: bool) -> Self {
        RegretInsertion { fast }
    }

    fn evaluate_job(
        &self,
        context: &RecreateContext,
        calculator: &JobInsertionCalculator,
        solution: &WorkingSolution,
        cache: Option<&InsertionCache>,
        job_id: JobIdx,
    ) -> Result<JobRegret, StateError> {
        let mut regret = JobRegret::default();

        for (route_id, route) in solution.routes().iter().enumerate_idx() {
            let route_id: RouteIdx = route_id;
            if route.is_empty() {
                continue;
            }

            let cached = cache
                .and_then(|cache| cache.get(route_id, route.version(), job_id))
                .filter(|result| {
                    result
                        .data()
                        .is_none_or(|data| context.is_vehicle_available(solution, data))
                });

            let result = match cached {
                Some(result) => result,
                None => {
                    let mut result = InsertionResult::failure();
                    for vehicle_id in context.route_vehicles(route, job_id) {
                        result = result.merge(calculator.calculate(
                            Some(route_id),
                            route,
                            job_id,
                            vehicle_id,
                        )?);
                    }

                    if let Some(cache) = cache {
                        cache.insert(route_id, route.version(), job_id, result.clone());
                    }
                    result
                }
            };

            regret.consider(result);
        }

        let mut new_route = InsertionResult::failure();
        for vehicle_id in context.new_route_vehicles(job_id) {
            new_route = new_route.merge(calculator.calculate_in(solution, None, job_id, vehicle_id)?);
        }
        regret.consider(new_route);

        Ok(regret)
    }
}

impl RecreateSolution for RegretInsertion {
    fn recreate_solution(
        &self,
        solution: &mut WorkingSolution,
        mut context: RecreateContext,
    ) -> Result<Vec<JobIdx>, SolverError> {
        let noise = context.begin_pass(solution)?;
        let scorer = RegretScorer::new(context.problem, context.params.regret);
        let cache = (self.fast && !context.constraints.depends_on_completeness())
            .then(InsertionCache::new);

        let mut remaining = solution.sorted_unassigned_jobs();
        let total = remaining.len();
        let mut failed = Vec::new();

        while !remaining.is_empty() {
            let completeness = (total - remaining.len()) as f64 / total as f64;

            let regrets: Vec<JobRegret> = {
                let calculator = context.calculator(noise.as_ref(), completeness);
                let context = &context;
                let solution = &*solution;
                let evaluate = |&job_id: &JobIdx| {
                    self.evaluate_job(context, &calculator, solution, cache.as_ref(), job_id)
                };

                match context.thread_pool {
                    Some(thread_pool) if remaining.len() > 1 => thread_pool
                        .install(|| remaining.par_iter().map(evaluate).collect::<Result<_, _>>())?,
                    _ => remaining
                        .iter()
                        .map(evaluate)
                        .collect::<Result<_, _>>()?,
                }
            };

            let mut scores = Vec::with_capacity(remaining.len());
            let mut candidates = Vec::with_capacity(remaining.len());
            for (&job_id, regret) in remaining.iter().zip(regrets) {
                match regret.best {
                    Some(best) => {
                        let score = scorer.score(context.problem, job_id, &best, regret.second_best_cost);
                        scores.push((job_id, score));
                        candidates.push(best);
                    }
                    None => {
                        trace!(job = %job_id, reasons = %regret.reasons, "job cannot be inserted");
                        failed.push(job_id);
                    }
                }
            }

            let Some(index) = highest_score(&scores) else {
                break;
            };

            let data = &candidates[index];
            let releases_vehicle = data.is_vehicle_switch(solution);
            context.insert(solution, data)?;

            let inserted = data.job_id;
            remaining.retain(|&job_id| job_id != inserted && !failed.contains(&job_id));

            if let Some(cache) = &cache {
                if releases_vehicle {
                    cache.clear();
                } else {
                    cache.retain_current(solution.routes());
                }
            }
        }

        failed.sort_unstable();
        Ok(failed)
    }
}
