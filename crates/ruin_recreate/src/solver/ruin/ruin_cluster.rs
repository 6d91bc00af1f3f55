use fxhash::FxHashSet;
use rand::{Rng, seq::IndexedRandom};

use crate::{
    problem::{job::JobIdx, neighborhood::JobNeighborhoods},
    solver::solution::working_solution::WorkingSolution,
    utils::disjoint_set::DisjointSet,
};

use super::{
    ruin_context::RuinContext,
    ruin_solution::{RuinSolution, removable_jobs},
};

/// Links every assigned job to its nearest assigned neighbors and removes
/// between one and `cluster_max_clusters` of the connected clusters.
pub struct RuinCluster;

/// Connected components of `jobs` when each job is linked to the first
/// `linkage` of its neighbors that are also in `jobs`.
pub fn cluster_jobs(
    jobs: &[JobIdx],
    neighborhoods: &JobNeighborhoods,
    linkage: usize,
) -> Vec<Vec<JobIdx>> {
    let members: FxHashSet<JobIdx> = jobs.iter().copied().collect();
    let ids: Vec<usize> = jobs.iter().map(|job_id| job_id.get()).collect();

    let mut dsu = DisjointSet::new(&ids);
    for &job_id in jobs {
        for neighbor in neighborhoods
            .neighbors(job_id)
            .iter()
            .filter(|neighbor| members.contains(neighbor))
            .take(linkage)
        {
            dsu.union(job_id.get(), neighbor.get());
        }
    }

    dsu.components(&ids)
        .into_iter()
        .map(|component| component.into_iter().map(JobIdx::new).collect())
        .collect()
}

impl RuinSolution for RuinCluster {
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
        let jobs = removable_jobs(solution);
        let clusters = cluster_jobs(&jobs, neighborhoods, params.cluster_linkage);
        let num_clusters = rng.random_range(1..=params.cluster_max_clusters);

        let mut remaining = num_jobs_to_remove;
        for cluster in clusters.choose_multiple(rng, num_clusters) {
            for &job_id in cluster {
                if remaining == 0 {
                    return;
                }
                if solution.remove_job(job_id).is_some() {
                    remaining -= 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::SmallRng};

    use crate::{
        problem::{
            neighborhood::AverageJobDistance, vehicle_routing_problem::VehicleRoutingProblem,
        },
        solver::ruin::ruin_params::RuinParams,
        test_utils::{self, TestRoute},
    };

    use super::*;

    fn two_groups() -> (Arc<VehicleRoutingProblem>, JobNeighborhoods) {
        // Jobs 0 and 1 at x = 1, 2, jobs 2 and 3 at x = 8, 9.
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(1, 10),
            test_utils::create_basic_services(vec![1, 2, 8, 9]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let neighborhoods = JobNeighborhoods::new(&problem, &AverageJobDistance, 3);
        (problem, neighborhoods)
    }

    #[test]
    fn test_cluster_jobs_links_nearest_neighbors() {
        let (_, neighborhoods) = two_groups();
        let jobs: Vec<JobIdx> = (0..4).map(JobIdx::new).collect();

        assert_eq!(
            cluster_jobs(&jobs, &neighborhoods, 1),
            vec![
                vec![JobIdx::new(0), JobIdx::new(1)],
                vec![JobIdx::new(2), JobIdx::new(3)]
            ]
        );

        // Job 1 reaches job 2 through its second neighbor.
        assert_eq!(cluster_jobs(&jobs, &neighborhoods, 2).len(), 1);
    }

    #[test]
    fn test_removes_whole_clusters() {
        let (problem, neighborhoods) = two_groups();
        let params = RuinParams {
            cluster_max_clusters: 1,
            ..RuinParams::default()
        };

        for seed in 0..10 {
            let mut solution = test_utils::create_test_working_solution(
                Arc::clone(&problem),
                vec![TestRoute {
                    vehicle_id: 0,
                    job_ids: vec![0, 1, 2, 3],
                }],
            );

            let mut rng = SmallRng::seed_from_u64(seed);
            RuinCluster.ruin_solution(
                &mut solution,
                RuinContext {
                    params: &params,
                    problem: &problem,
                    neighborhoods: &neighborhoods,
                    rng: &mut rng,
                    num_jobs_to_remove: 4,
                },
            );

            let removed = solution.sorted_unassigned_jobs();
            assert!(
                removed == vec![JobIdx::new(0), JobIdx::new(1)]
                    || removed == vec![JobIdx::new(2), JobIdx::new(3)],
                "seed {seed} removed {removed:?}"
            );
        }
    }

    #[test]
    fn test_never_removes_more_than_asked() {
        let (problem, neighborhoods) = two_groups();
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0, 1, 2, 3],
            }],
        );

        let mut rng = SmallRng::seed_from_u64(3);
        RuinCluster.ruin_solution(
            &mut solution,
            RuinContext {
                params: &RuinParams::default(),
                problem: &problem,
                neighborhoods: &neighborhoods,
                rng: &mut rng,
                num_jobs_to_remove: 1,
            },
        );

        assert_eq!(solution.sorted_unassigned_jobs().len(), 1);
    }
}
