#![allow(dead_code)]

use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use ruin_recreate::{
    problem::{
        capacity::Capacity,
        fleet::FleetSize,
        job::Job,
        location::Location,
        service::ServiceBuilder,
        skill::Skill,
        time_window::TimeWindow,
        vehicle::{Vehicle, VehicleBuilder},
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
        vehicle_type::{VehicleCosts, VehicleType, VehicleTypeBuilder},
    },
    solver::{
        algorithm::AlgorithmBuilder,
        algorithm_params::AlgorithmParams,
        solution::{activity::ActivityKind, working_solution::WorkingSolution},
        statistics::SearchStatistics,
    },
};

pub const EPSILON: f64 = 1e-6;

pub fn vehicle_type(type_id: &str, capacity: f64) -> Arc<VehicleType> {
    vehicle_type_with_fixed_cost(type_id, capacity, 0.0)
}

pub fn vehicle_type_with_fixed_cost(type_id: &str, capacity: f64, fixed: f64) -> Arc<VehicleType> {
    let mut builder = VehicleTypeBuilder::default();
    builder
        .set_type_id(type_id)
        .set_capacity(Capacity::from_vec(vec![capacity]))
        .set_costs(VehicleCosts {
            fixed,
            ..VehicleCosts::default()
        });
    Arc::new(builder.build().unwrap())
}

pub fn vehicle(id: &str, vehicle_type: &Arc<VehicleType>, location_id: usize) -> VehicleBuilder {
    let mut builder = VehicleBuilder::default();
    builder
        .set_external_id(id)
        .set_vehicle_type(Arc::clone(vehicle_type))
        .set_start_location_id(location_id);
    builder
}

pub fn service(id: &str, location_id: usize, demand: f64) -> ServiceBuilder {
    let mut builder = ServiceBuilder::default();
    builder
        .set_external_id(id)
        .set_location_id(location_id)
        .set_demand(Capacity::from_vec(vec![demand]));
    builder
}

pub fn service_with_window(id: &str, location_id: usize, start: f64, end: f64) -> Job {
    let mut builder = service(id, location_id, 1.0);
    builder.set_time_windows(vec![TimeWindow::new(start, end).unwrap()]);
    Job::Service(builder.build().unwrap())
}

pub fn skilled_service(id: &str, location_id: usize, skill: &str) -> Job {
    let mut builder = service(id, location_id, 1.0);
    builder.set_skills(vec![Skill::new(skill)]);
    Job::Service(builder.build().unwrap())
}

pub fn build_problem(
    locations: Vec<Location>,
    jobs: Vec<Job>,
    vehicles: Vec<Vehicle>,
    fleet_size: FleetSize,
) -> Arc<VehicleRoutingProblem> {
    let mut builder = VehicleRoutingProblemBuilder::default();
    builder
        .set_locations(locations)
        .set_jobs(jobs)
        .set_vehicles(vehicles)
        .set_fleet_size(fleet_size);
    Arc::new(builder.build().unwrap())
}

/// Mixed services, pickups and deliveries on a 10x10 grid, a third of them
/// with a time window, served by three depots.
pub fn random_problem(seed: u64, num_jobs: usize) -> Arc<VehicleRoutingProblem> {
    random_problem_with_fixed_costs(seed, num_jobs, 0.0, 0.0)
}

/// [`random_problem`] whose small and large vehicles carry the given fixed costs.
pub fn random_problem_with_fixed_costs(
    seed: u64,
    num_jobs: usize,
    small_fixed: f64,
    large_fixed: f64,
) -> Arc<VehicleRoutingProblem> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let locations: Vec<Location> = (0..100)
        .map(|index| Location::from_cartesian((index % 10) as f64, (index / 10) as f64))
        .collect();

    let jobs = (0..num_jobs)
        .map(|index| {
            let id = format!("job_{index}");
            let mut builder = service(&id, rng.random_range(0..100), rng.random_range(1..=3) as f64);
            if index % 3 == 0 {
                let start = rng.random_range(0.0..40.0);
                builder.set_time_windows(vec![TimeWindow::new(start, start + 15.0).unwrap()]);
            }

            let service = builder.build().unwrap();
            match index % 4 {
                0 => Job::Pickup(service),
                1 => Job::Delivery(service),
                _ => Job::Service(service),
            }
        })
        .collect();

    let small = vehicle_type_with_fixed_cost("small", 8.0, small_fixed);
    let large = vehicle_type_with_fixed_cost("large", 15.0, large_fixed);
    let vehicles = [(0, &small), (45, &large), (99, &small), (45, &small)]
        .into_iter()
        .enumerate()
        .map(|(index, (location_id, vehicle_type))| {
            let mut builder = vehicle(&format!("vehicle_{index}"), vehicle_type, location_id);
            builder.set_latest_arrival(120.0);
            builder.build().unwrap()
        })
        .collect();

    build_problem(locations, jobs, vehicles, FleetSize::Finite)
}

pub fn search(
    problem: &Arc<VehicleRoutingProblem>,
    params: AlgorithmParams,
) -> (Vec<WorkingSolution>, SearchStatistics) {
    let mut builder = AlgorithmBuilder::default();
    builder.set_problem(Arc::clone(problem)).set_params(params);
    let mut algorithm = builder.build().unwrap();

    let solutions = algorithm.search_solutions().unwrap();
    (solutions, algorithm.statistics().clone())
}

/// Load after every activity stays within `[0, capacity]` in every dimension.
pub fn assert_capacity(solution: &WorkingSolution) {
    let problem = solution.problem();
    for route in solution.non_empty_routes_iter() {
        let capacity = route.vehicle(problem).capacity();

        let mut load: Vec<f64> = vec![0.0; capacity.len()];
        for activity in route.activities() {
            if activity.kind() == ActivityKind::DeliverService {
                for (dimension, value) in load.iter_mut().enumerate() {
                    *value -= activity.size().get(dimension);
                }
            }
        }

        for activity in route.activities() {
            for (dimension, value) in load.iter_mut().enumerate() {
                *value += activity.size().get(dimension);
                assert!(
                    *value >= -EPSILON && *value <= capacity.get(dimension) + EPSILON,
                    "load {value} out of [0, {}] on vehicle {}",
                    capacity.get(dimension),
                    route.vehicle(problem).external_id()
                );
            }
        }
    }
}

/// Every routed activity starts before the end of its window.
pub fn assert_time_windows(solution: &WorkingSolution) {
    for route in solution.non_empty_routes_iter() {
        for activity in route.activities() {
            let start = activity.arrival_time().max(activity.earliest_start());
            assert!(
                start <= activity.latest_start() + EPSILON,
                "activity of job {:?} starts at {start}, after {}",
                activity.job(),
                activity.latest_start()
            );
        }
    }
}

/// Every job is either routed exactly once or unassigned.
pub fn assert_job_conservation(solution: &WorkingSolution) {
    let problem = solution.problem();
    let assigned = solution.assigned_jobs();

    assert_eq!(
        assigned.len() + solution.unassigned_jobs().len(),
        problem.num_jobs()
    );
    assert!(assigned.iter().all(|job_id| !solution.is_unassigned(*job_id)));
    solution.check_consistency().unwrap();
}
