use std::fmt::Display;

use rand::{rngs::SmallRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    error::SolverError,
    problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{insertion::InsertionResult, solution::working_solution::WorkingSolution},
};

use super::{recreate_context::RecreateContext, recreate_strategy::RecreateSolution};

/// Order in which best insertion visits the unassigned jobs.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BestInsertionSortStrategy {
    #[default]
    Random,
    Demand,
    Far,
    Close,
    TimeWindow,
}

impl Display for BestInsertionSortStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => write!(f, "Random"),
            Self::Demand => write!(f, "Demand"),
            Self::Far => write!(f, "Far"),
            Self::Close => write!(f, "Close"),
            Self::TimeWindow => write!(f, "TimeWindow"),
        }
    }
}

/// Inserts jobs one at a time, each at its cheapest feasible place in the whole solution.
#[derive(Default)]
pub struct BestInsertion {
    sort_strategy: BestInsertionSortStrategy,
}

impl BestInsertion {
    pub fn new(sort_strategy: BestInsertionSortStrategy) -> Self {
        BestInsertion { sort_strategy }
    }

    pub fn sort_unassigned_jobs(
        &self,
        problem: &VehicleRoutingProblem,
        unassigned_jobs: &mut [JobIdx],
        rng: &mut SmallRng,
    ) {
        match self.sort_strategy {
            BestInsertionSortStrategy::Random => unassigned_jobs.shuffle(rng),
            BestInsertionSortStrategy::Demand => unassigned_jobs.sort_by(|&a, &b| {
                let demand_a: f64 = problem.job(a).demand().iter().sum();
                let demand_b: f64 = problem.job(b).demand().iter().sum();
                demand_b.total_cmp(&demand_a)
            }),
            BestInsertionSortStrategy::Far => unassigned_jobs.sort_by(|&a, &b| {
                average_depot_distance(problem, b).total_cmp(&average_depot_distance(problem, a))
            }),
            BestInsertionSortStrategy::Close => unassigned_jobs.sort_by(|&a, &b| {
                average_depot_distance(problem, a).total_cmp(&average_depot_distance(problem, b))
            }),
            BestInsertionSortStrategy::TimeWindow => unassigned_jobs.sort_by(|&a, &b| {
                latest_end(problem, a).total_cmp(&latest_end(problem, b))
            }),
        }
    }
}

fn average_depot_distance(problem: &VehicleRoutingProblem, job_id: JobIdx) -> f64 {
    let transport_costs = problem.transport_costs();
    let locations = problem.job(job_id).location_ids();
    let depots = problem.depot_locations();
    if locations.is_empty() || depots.is_empty() {
        return 0.0;
    }

    let total: f64 = locations
        .iter()
        .flat_map(|&location| {
            depots
                .iter()
                .map(move |&depot| transport_costs.distance(depot, location))
        })
        .sum();

    total / (locations.len() * depots.len()) as f64
}

/// Earliest closing time over the activities of the job.
fn latest_end(problem: &VehicleRoutingProblem, job_id: JobIdx) -> f64 {
    problem
        .job_activities(job_id)
        .iter()
        .flat_map(|activity| problem.activity_time_windows(activity))
        .map(|time_window| time_window.end())
        .fold(f64::MAX, f64::min)
}

impl RecreateSolution for BestInsertion {
    fn recreate_solution(
        &self,
        solution: &mut WorkingSolution,
        mut context: RecreateContext,
    ) -> Result<Vec<JobIdx>, SolverError> {
        let noise = context.begin_pass(solution)?;

        let mut unassigned_jobs = solution.sorted_unassigned_jobs();
        self.sort_unassigned_jobs(context.problem, &mut unassigned_jobs, context.rng);

        let total = unassigned_jobs.len();
        let mut failed = Vec::new();
        for (index, job_id) in unassigned_jobs.into_iter().enumerate() {
            let completeness = index as f64 / total as f64;
            let result = {
                let calculator = context.calculator(noise.as_ref(), completeness);
                context.best_insertion(&calculator, solution, job_id)?
            };

            match result {
                InsertionResult::Success(data) => {
                    context.insert(solution, &data)?;
                }
                InsertionResult::Failure(reasons) => {
                    trace!(job = %job_id, %reasons, "job cannot be inserted");
                    failed.push(job_id);
                }
            }
        }

        Ok(failed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;

    use crate::{
        problem::time_window::TimeWindow,
        solver::{
            constraints::constraint_manager::ConstraintManager,
            fleet::vehicle_fleet_manager::VehicleFleetManager,
            recreate::recreate_params::RecreateParams, state::state_manager::StateManager,
        },
        test_utils,
    };

    use super::*;

    #[test]
    fn test_sort_by_time_window() {
        let mut jobs = test_utils::create_basic_services(vec![1]);
        jobs.push(test_utils::create_service_with_time_window(
            2,
            0.0,
            TimeWindow::new(0.0, 50.0).unwrap(),
        ));
        jobs.push(test_utils::create_service_with_time_window(
            3,
            0.0,
            TimeWindow::new(0.0, 10.0).unwrap(),
        ));
        let problem = test_utils::create_test_problem(
            test_utils::create_location_grid(1, 4),
            jobs,
            test_utils::create_basic_vehicles(vec![0]),
        );

        let mut unassigned = vec![JobIdx::new(0), JobIdx::new(1), JobIdx::new(2)];
        let mut rng = SmallRng::seed_from_u64(0);
        BestInsertion::new(BestInsertionSortStrategy::TimeWindow).sort_unassigned_jobs(
            &problem,
            &mut unassigned,
            &mut rng,
        );

        assert_eq!(unassigned, vec![JobIdx::new(2), JobIdx::new(1), JobIdx::new(0)]);
    }

    #[test]
    fn test_sort_far_first() {
        let problem = test_utils::create_test_problem(
            test_utils::create_location_grid(1, 5),
            test_utils::create_basic_services(vec![1, 4, 2]),
            test_utils::create_basic_vehicles(vec![0]),
        );

        let mut unassigned = vec![JobIdx::new(0), JobIdx::new(1), JobIdx::new(2)];
        let mut rng = SmallRng::seed_from_u64(0);
        BestInsertion::new(BestInsertionSortStrategy::Far).sort_unassigned_jobs(
            &problem,
            &mut unassigned,
            &mut rng,
        );

        assert_eq!(unassigned, vec![JobIdx::new(1), JobIdx::new(2), JobIdx::new(0)]);
    }

    #[test]
    fn test_inserts_every_job_in_one_route() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(3, 3),
            test_utils::create_basic_services(vec![1, 2, 5, 8]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let mut solution = WorkingSolution::new(Arc::clone(&problem));

        let constraints = ConstraintManager::with_default_constraints(false, 0.0);
        let mut states = StateManager::with_default_updaters(&problem);
        let mut fleet = VehicleFleetManager::new(&problem);
        let mut rng = SmallRng::seed_from_u64(3);
        let params = RecreateParams {
            noise_level: 0.0,
            ..RecreateParams::default()
        };

        let failed = BestInsertion::default()
            .recreate_solution(
                &mut solution,
                RecreateContext {
                    problem: &problem,
                    constraints: &constraints,
                    states: &mut states,
                    fleet: &mut fleet,
                    rng: &mut rng,
                    thread_pool: None,
                    params: &params,
                },
            )
            .unwrap();

        assert!(failed.is_empty());
        assert!(!solution.has_unassigned());
        assert_eq!(solution.non_empty_routes_count(), 1);
        assert!(fleet.is_locked(crate::problem::vehicle::VehicleIdx::new(0)));
        solution.check_consistency().unwrap();
    }

    #[test]
    fn test_jobs_beyond_capacity_stay_unassigned() {
        let mut jobs = test_utils::create_basic_services(vec![1]);
        jobs.push(test_utils::create_pickup(2, 50.0));
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(1, 3),
            jobs,
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let mut solution = WorkingSolution::new(Arc::clone(&problem));

        let constraints = ConstraintManager::with_default_constraints(false, 0.0);
        let mut states = StateManager::with_default_updaters(&problem);
        let mut fleet = VehicleFleetManager::new(&problem);
        let mut rng = SmallRng::seed_from_u64(3);
        let params = RecreateParams::default();

        let failed = BestInsertion::default()
            .recreate_solution(
                &mut solution,
                RecreateContext {
                    problem: &problem,
                    constraints: &constraints,
                    states: &mut states,
                    fleet: &mut fleet,
                    rng: &mut rng,
                    thread_pool: None,
                    params: &params,
                },
            )
            .unwrap();

        assert_eq!(failed, vec![JobIdx::new(1)]);
        assert!(solution.is_unassigned(JobIdx::new(1)));
        assert!(!solution.is_unassigned(JobIdx::new(0)));
    }
}
