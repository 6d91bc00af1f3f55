use fxhash::FxHashMap;
use rand::Rng;

use crate::{
    problem::{
        job::JobIdx, transport_costs::Cost, vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::solution::{route::VehicleRoute, working_solution::WorkingSolution},
};

use super::{ruin_context::RuinContext, ruin_solution::RuinSolution};

/// Removes, one at a time, the job whose removal saves the most transport cost.
pub struct RuinWorst;

/// Transport cost saved by skipping the activity at `position`.
fn compute_savings(problem: &VehicleRoutingProblem, route: &VehicleRoute, position: usize) -> Cost {
    let transport_costs = problem.transport_costs();
    let vehicle = route.vehicle(problem);
    let driver = route.driver();

    let previous = route.previous(position);
    let activity = route.activity(position);
    let next = route.next(position);

    let to_activity = transport_costs.transport_cost(
        previous.location_id(),
        activity.location_id(),
        previous.end_time(),
        driver,
        Some(vehicle),
    );

    if next.is_end() && !vehicle.return_to_depot() {
        return to_activity;
    }

    let from_activity = transport_costs.transport_cost(
        activity.location_id(),
        next.location_id(),
        activity.end_time(),
        driver,
        Some(vehicle),
    );
    let direct = transport_costs.transport_cost(
        previous.location_id(),
        next.location_id(),
        previous.end_time(),
        driver,
        Some(vehicle),
    );

    to_activity + from_activity - direct
}

impl RuinSolution for RuinWorst {
    fn ruin_solution<R>(&self, solution: &mut WorkingSolution, context: RuinContext<R>)
    where
        R: Rng,
    {
        let RuinContext {
            params,
            problem,
            rng,
            num_jobs_to_remove,
            ..
        } = context;
        let max_noise = params.worst_noise_level * problem.max_transport_cost();

        let mut savings: FxHashMap<JobIdx, Cost> = FxHashMap::default();
        let mut candidates: Vec<(JobIdx, Cost)> = Vec::new();

        for _ in 0..num_jobs_to_remove {
            savings.clear();
            for route in solution.non_empty_routes_iter() {
                for position in 0..route.len() {
                    let Some(job_id) = route.activity(position).job() else {
                        continue;
                    };
                    if problem.job(job_id).is_break() {
                        continue;
                    }

                    *savings.entry(job_id).or_default() += compute_savings(problem, route, position);
                }
            }

            candidates.clear();
            candidates.extend(savings.iter().map(|(&job_id, &saving)| (job_id, saving)));
            candidates.sort_unstable_by_key(|&(job_id, _)| job_id);

            for (_, saving) in candidates.iter_mut() {
                if rng.random_bool(params.worst_noise_probability) {
                    *saving += max_noise * rng.random::<f64>();
                }
            }

            let worst = candidates
                .iter()
                .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)))
                .map(|&(job_id, _)| job_id);

            match worst {
                Some(job_id) => {
                    solution.remove_job(job_id);
                }
                None => break,
            }
        }
    }
}
