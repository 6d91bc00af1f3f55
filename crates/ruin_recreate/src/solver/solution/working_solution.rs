use std::sync::Arc;

use fxhash::{FxHashMap, FxHashSet};
use rand::{Rng, seq::IteratorRandom};

use crate::{
    error::SolverError,
    problem::{
        fleet::FleetSize,
        job::JobIdx,
        vehicle::VehicleIdx,
        vehicle_routing_problem::{InitialRoute, VehicleRoutingProblem},
    },
    solver::{
        insertion::{InsertionData, InsertionRoute},
        solution::{
            activity::TourActivity, route::VehicleRoute, route_id::RouteIdx,
            summary::SolutionSummary,
        },
    },
    utils::enumerate_idx::EnumerateIdx,
};

/// Routes plus unassigned jobs. Cloning gives an independent copy.
#[derive(Clone)]
pub struct WorkingSolution {
    problem: Arc<VehicleRoutingProblem>,
    routes: Vec<VehicleRoute>,
    unassigned_jobs: FxHashSet<JobIdx>,
    cost: f64,
}

impl WorkingSolution {
    /// No routes, every job unassigned.
    pub fn new(problem: Arc<VehicleRoutingProblem>) -> Self {
        let unassigned_jobs = problem.jobs_iter().collect();
        WorkingSolution {
            problem,
            routes: Vec::new(),
            unassigned_jobs,
            cost: f64::INFINITY,
        }
    }

    /// Solution made of the given job sequences, the remaining jobs unassigned.
    /// A shipment is listed twice: pickup first, then delivery. Each activity
    /// gets the first of its time windows.
    pub fn from_routes(
        problem: Arc<VehicleRoutingProblem>,
        initial_routes: &[InitialRoute],
    ) -> Result<Self, SolverError> {
        let mut solution = WorkingSolution::new(Arc::clone(&problem));
        let mut seen: FxHashMap<JobIdx, usize> = FxHashMap::default();
        let mut used_vehicles = FxHashSet::default();

        for initial_route in initial_routes {
            if initial_route.vehicle_id.get() >= problem.num_vehicles() {
                return Err(SolverError::InvalidInitialSolution(format!(
                    "unknown vehicle {}",
                    initial_route.vehicle_id
                )));
            }

            let vehicle = problem.vehicle(initial_route.vehicle_id);
            if problem.fleet_size() == FleetSize::Finite
                && !vehicle.is_penalty()
                && !used_vehicles.insert(initial_route.vehicle_id)
            {
                return Err(SolverError::InvalidInitialSolution(format!(
                    "vehicle {} serves more than one route",
                    initial_route.vehicle_id
                )));
            }

            let mut route = VehicleRoute::empty(&problem, initial_route.vehicle_id);
            let mut activities: Vec<(usize, TourActivity)> = Vec::new();
            for &job_id in &initial_route.jobs {
                if job_id.get() >= problem.num_jobs() {
                    return Err(SolverError::InvalidInitialSolution(format!(
                        "unknown job {job_id}"
                    )));
                }

                let occurrence = seen.entry(job_id).or_default();
                let Some(template) = problem.job_activities(job_id).get(*occurrence) else {
                    return Err(SolverError::DuplicatedJob(job_id));
                };
                *occurrence += 1;

                // Positions refer to the empty route, each one is shifted by the
                // activities placed before it.
                let time_window = problem.activity_time_windows(template)[0];
                activities.push((0, template.clone().with_time_window(time_window)));
            }
            route.insert_activities(&activities);

            solution.routes.push(route);
        }

        for (job_id, count) in seen {
            if count != problem.job_activities(job_id).len() {
                return Err(SolverError::InvalidInitialSolution(format!(
                    "job {job_id} has {count} of {} activities routed",
                    problem.job_activities(job_id).len()
                )));
            }
            solution.unassigned_jobs.remove(&job_id);
        }

        solution.routes.retain(|route| !route.is_empty());
        Ok(solution)
    }

    pub fn problem(&self) -> &VehicleRoutingProblem {
        self.problem.as_ref()
    }

    pub fn problem_arc(&self) -> Arc<VehicleRoutingProblem> {
        Arc::clone(&self.problem)
    }

    pub fn routes(&self) -> &[VehicleRoute] {
        &self.routes
    }

    pub fn route(&self, route_id: RouteIdx) -> &VehicleRoute {
        &self.routes[route_id]
    }

    pub(crate) fn routes_mut(&mut self) -> &mut [VehicleRoute] {
        &mut self.routes
    }

    pub(crate) fn route_mut(&mut self, route_id: RouteIdx) -> &mut VehicleRoute {
        &mut self.routes[route_id]
    }

    pub fn non_empty_routes_iter(&self) -> impl Iterator<Item = &VehicleRoute> {
        self.routes.iter().filter(|route| !route.is_empty())
    }

    pub fn non_empty_routes_count(&self) -> usize {
        self.non_empty_routes_iter().count()
    }

    pub fn unassigned_jobs(&self) -> &FxHashSet<JobIdx> {
        &self.unassigned_jobs
    }

    /// Unassigned jobs in index order.
    pub fn sorted_unassigned_jobs(&self) -> Vec<JobIdx> {
        let mut jobs: Vec<JobIdx> = self.unassigned_jobs.iter().copied().collect();
        jobs.sort();
        jobs
    }

    pub fn has_unassigned(&self) -> bool {
        !self.unassigned_jobs.is_empty()
    }

    pub fn is_unassigned(&self, job_id: JobIdx) -> bool {
        self.unassigned_jobs.contains(&job_id)
    }

    pub(crate) fn add_unassigned(&mut self, job_id: JobIdx) {
        self.unassigned_jobs.insert(job_id);
    }

    /// Routed jobs in route order.
    pub fn assigned_jobs(&self) -> Vec<JobIdx> {
        self.routes.iter().flat_map(|route| route.jobs()).collect()
    }

    pub fn num_assigned_jobs(&self) -> usize {
        self.problem.num_jobs() - self.unassigned_jobs.len()
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub(crate) fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }

    pub fn route_of_job(&self, job_id: JobIdx) -> Option<RouteIdx> {
        self.routes
            .iter()
            .enumerate_idx()
            .find(|(_, route): &(RouteIdx, &VehicleRoute)| route.contains_job(job_id))
            .map(|(route_id, _)| route_id)
    }

    pub fn random_assigned_job<R>(&self, rng: &mut R) -> Option<JobIdx>
    where
        R: Rng,
    {
        self.routes
            .iter()
            .flat_map(|route| route.jobs())
            .choose(rng)
    }

    pub fn random_non_empty_route<R>(&self, rng: &mut R) -> Option<RouteIdx>
    where
        R: Rng,
    {
        self.routes
            .iter()
            .enumerate_idx()
            .filter(|(_, route): &(RouteIdx, &VehicleRoute)| !route.is_empty())
            .choose(rng)
            .map(|(route_id, _)| route_id)
    }

    /// Applies an insertion and returns the route it went into. An existing route
    /// takes the insertion's vehicle when it differs from its own.
    pub fn insert(&mut self, data: &InsertionData) -> RouteIdx {
        let route_id = match data.route {
            InsertionRoute::Existing(route_id) => route_id,
            InsertionRoute::New => {
                self.routes
                    .push(VehicleRoute::empty(&self.problem, data.vehicle_id));
                RouteIdx::new(self.routes.len() - 1)
            }
        };

        let route = &mut self.routes[route_id];
        if route.vehicle_id() != data.vehicle_id {
            route.set_vehicle(&self.problem, data.vehicle_id);
        }
        route.insert_activities(&data.activities);
        self.unassigned_jobs.remove(&data.job_id);

        route_id
    }

    /// Removes every activity of `job_id` and marks it unassigned.
    pub fn remove_job(&mut self, job_id: JobIdx) -> Option<RouteIdx> {
        let route_id = self.route_of_job(job_id)?;
        self.routes[route_id].remove_job(job_id);
        self.unassigned_jobs.insert(job_id);
        Some(route_id)
    }

    /// Drops routes without activities and returns the vehicles they used.
    pub fn remove_empty_routes(&mut self) -> Vec<VehicleIdx> {
        let released = self
            .routes
            .iter()
            .filter(|route| route.is_empty())
            .map(|route| route.vehicle_id())
            .collect();
        self.routes.retain(|route| !route.is_empty());
        released
    }

    /// Same vehicles serving the same activity sequences, in the same route order.
    pub fn is_identical(&self, other: &WorkingSolution) -> bool {
        self.routes.len() == other.routes.len()
            && self
                .routes
                .iter()
                .zip(&other.routes)
                .all(|(route, other_route)| route.is_same_tour(other_route))
    }

    /// Every job is either routed with all of its activities exactly once, or unassigned.
    pub fn check_consistency(&self) -> Result<(), SolverError> {
        let mut counts = vec![0usize; self.problem.num_jobs()];
        for route in &self.routes {
            for activity in route.activities() {
                if let Some(job_id) = activity.job() {
                    counts[job_id.get()] += 1;
                }
            }
        }

        for (job_id, count) in counts.into_iter().enumerate_idx() {
            let job_id: JobIdx = job_id;
            let routed = count > 0;
            if routed && self.unassigned_jobs.contains(&job_id) {
                return Err(SolverError::DuplicatedJob(job_id));
            }
            if routed && count != self.problem.job_activities(job_id).len() {
                return Err(SolverError::DuplicatedJob(job_id));
            }
            if !routed && !self.unassigned_jobs.contains(&job_id) {
                return Err(SolverError::InvalidInitialSolution(format!(
                    "job {job_id} is neither routed nor unassigned"
                )));
            }
        }

        if self.problem.fleet_size() == FleetSize::Finite {
            let mut vehicles = FxHashSet::default();
            for route in &self.routes {
                let vehicle = route.vehicle(&self.problem);
                if !vehicle.is_penalty() && !vehicles.insert(route.vehicle_id()) {
                    return Err(SolverError::InvalidInitialSolution(format!(
                        "vehicle {} serves more than one route",
                        route.vehicle_id()
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn summary(&self) -> SolutionSummary {
        SolutionSummary::new(self)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};
    use smallvec::smallvec;

    use crate::{
        problem::{
            job::Job,
            shipment::{ShipmentBuilder, ShipmentLocation},
        },
        test_utils::{self, TestRoute},
    };

    use super::*;

    fn create_problem() -> Arc<VehicleRoutingProblem> {
        Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(3, 3),
            test_utils::create_basic_services(vec![1, 2, 3, 4]),
            test_utils::create_basic_vehicles(vec![0, 8]),
        ))
    }

    #[test]
    fn test_insert_new_route_and_remove() {
        let problem = create_problem();
        let mut solution = WorkingSolution::new(Arc::clone(&problem));
        assert_eq!(solution.unassigned_jobs().len(), 4);

        let activity = problem.job_activities(JobIdx::new(2))[0].clone();
        let route_id = solution.insert(&InsertionData {
            job_id: JobIdx::new(2),
            route: InsertionRoute::New,
            vehicle_id: VehicleIdx::new(1),
            cost: 0.0,
            activities: smallvec![(0, activity)],
        });

        assert_eq!(route_id, RouteIdx::new(0));
        assert_eq!(solution.route(route_id).vehicle_id(), VehicleIdx::new(1));
        assert!(!solution.is_unassigned(JobIdx::new(2)));
        assert_eq!(solution.route_of_job(JobIdx::new(2)), Some(route_id));
        solution.check_consistency().unwrap();

        assert_eq!(solution.remove_job(JobIdx::new(2)), Some(route_id));
        assert_eq!(solution.remove_job(JobIdx::new(2)), None);
        assert_eq!(solution.remove_empty_routes(), vec![VehicleIdx::new(1)]);
        assert!(solution.routes().is_empty());
        assert_eq!(solution.sorted_unassigned_jobs().len(), 4);
        solution.check_consistency().unwrap();
    }

    #[test]
    fn test_shipment_positions_are_shifted() {
        let mut jobs = test_utils::create_basic_services(vec![1, 2]);
        let mut shipment = ShipmentBuilder::default();
        shipment
            .set_external_id("s")
            .set_pickup(ShipmentLocation::new(3, 0.0, vec![]))
            .set_delivery(ShipmentLocation::new(4, 0.0, vec![]));
        jobs.push(Job::Shipment(shipment.build().unwrap()));

        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(3, 3),
            jobs,
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0, 1],
            }],
        );

        let activities = problem.job_activities(JobIdx::new(2));
        solution.insert(&InsertionData {
            job_id: JobIdx::new(2),
            route: InsertionRoute::Existing(RouteIdx::new(0)),
            vehicle_id: VehicleIdx::new(0),
            cost: 0.0,
            activities: smallvec![(1, activities[0].clone()), (1, activities[1].clone())],
        });

        let route = solution.route(RouteIdx::new(0));
        let jobs: Vec<Option<JobIdx>> = route.activities().iter().map(|a| a.job()).collect();
        assert_eq!(
            jobs,
            vec![
                Some(JobIdx::new(0)),
                Some(JobIdx::new(2)),
                Some(JobIdx::new(2)),
                Some(JobIdx::new(1))
            ]
        );
        assert_eq!(
            route.jobs().collect::<Vec<_>>(),
            vec![JobIdx::new(0), JobIdx::new(2), JobIdx::new(1)]
        );
        solution.check_consistency().unwrap();
    }

    #[test]
    fn test_from_routes_validates() {
        let problem = create_problem();

        let solution = WorkingSolution::from_routes(
            Arc::clone(&problem),
            &[InitialRoute {
                vehicle_id: VehicleIdx::new(0),
                jobs: vec![JobIdx::new(1), JobIdx::new(0)],
            }],
        )
        .unwrap();
        assert_eq!(
            solution.route(RouteIdx::new(0)).jobs().collect::<Vec<_>>(),
            vec![JobIdx::new(1), JobIdx::new(0)]
        );
        assert_eq!(
            solution.sorted_unassigned_jobs(),
            vec![JobIdx::new(2), JobIdx::new(3)]
        );

        assert!(matches!(
            WorkingSolution::from_routes(
                Arc::clone(&problem),
                &[InitialRoute {
                    vehicle_id: VehicleIdx::new(0),
                    jobs: vec![JobIdx::new(1), JobIdx::new(1)],
                }],
            ),
            Err(SolverError::DuplicatedJob(_))
        ));
        assert!(matches!(
            WorkingSolution::from_routes(
                Arc::clone(&problem),
                &[InitialRoute {
                    vehicle_id: VehicleIdx::new(9),
                    jobs: vec![],
                }],
            ),
            Err(SolverError::InvalidInitialSolution(_))
        ));
    }

    #[test]
    fn test_random_picks_are_assigned() {
        let problem = create_problem();
        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 1,
                job_ids: vec![3],
            }],
        );
        let mut rng = SmallRng::seed_from_u64(3);

        assert_eq!(solution.random_assigned_job(&mut rng), Some(JobIdx::new(3)));
        assert_eq!(solution.random_non_empty_route(&mut rng), Some(RouteIdx::new(0)));
        assert!(
            solution.is_identical(&solution.clone()),
            "a clone is identical to its source"
        );
    }
}
