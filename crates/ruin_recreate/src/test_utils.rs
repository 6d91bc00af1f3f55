use std::sync::Arc;

use rand::RngCore;

use crate::{
    problem::{
        capacity::Capacity,
        job::{ActivityIdx, Job, JobIdx},
        location::{Location, LocationIdx},
        service::ServiceBuilder,
        time_window::TimeWindow,
        vehicle::{Vehicle, VehicleBuilder, VehicleIdx},
        vehicle_routing_problem::{InitialRoute, VehicleRoutingProblem, VehicleRoutingProblemBuilder},
        vehicle_type::{VehicleType, VehicleTypeBuilder},
    },
    solver::{
        solution::{
            activity::{ActivityKind, TourActivity},
            working_solution::WorkingSolution,
        },
        state::state_manager::StateManager,
    },
};

pub fn create_location_grid(rows: usize, cols: usize) -> Vec<Location> {
    let mut locations = Vec::new();

    for y in 0..rows {
        for x in 0..cols {
            locations.push(Location::from_cartesian(x as f64, y as f64));
        }
    }

    locations
}

pub fn create_locations(locations: Vec<(f64, f64)>) -> Vec<Location> {
    locations
        .iter()
        .map(|&(x, y)| Location::from_cartesian(x, y))
        .collect()
}

pub fn create_basic_vehicle_type() -> VehicleType {
    let mut builder = VehicleTypeBuilder::default();
    builder
        .set_type_id("basic")
        .set_capacity(Capacity::from_vec(vec![10.0]));
    builder.build().unwrap()
}

/// Services with a demand of 1, external id = index.
pub fn create_basic_services(location_ids: Vec<usize>) -> Vec<Job> {
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| {
            let mut builder = ServiceBuilder::default();
            builder
                .set_external_id(index.to_string())
                .set_location_id(location_id)
                .set_demand(Capacity::from_vec(vec![1.0]));
            Job::Service(builder.build().unwrap())
        })
        .collect()
}

pub fn create_service_with_time_window(
    location_id: usize,
    duration: f64,
    time_window: TimeWindow,
) -> Job {
    let mut builder = ServiceBuilder::default();
    builder
        .set_external_id(format!("tw_{location_id}"))
        .set_location_id(location_id)
        .set_duration(duration)
        .set_demand(Capacity::from_vec(vec![1.0]))
        .set_time_windows(vec![time_window]);
    Job::Service(builder.build().unwrap())
}

pub fn create_pickup(location_id: usize, amount: f64) -> Job {
    let mut builder = ServiceBuilder::default();
    builder
        .set_external_id(format!("pickup_{location_id}"))
        .set_location_id(location_id)
        .set_demand(Capacity::from_vec(vec![amount]));
    Job::Pickup(builder.build().unwrap())
}

pub fn create_delivery(location_id: usize, amount: f64) -> Job {
    let mut builder = ServiceBuilder::default();
    builder
        .set_external_id(format!("delivery_{location_id}"))
        .set_location_id(location_id)
        .set_demand(Capacity::from_vec(vec![amount]));
    Job::Delivery(builder.build().unwrap())
}

/// Vehicles sharing one basic type, external id = index.
pub fn create_basic_vehicles(location_ids: Vec<usize>) -> Vec<Vehicle> {
    create_vehicles_with_shift(location_ids, 0.0, f64::MAX)
}

pub fn create_vehicles_with_shift(
    location_ids: Vec<usize>,
    earliest_start: f64,
    latest_arrival: f64,
) -> Vec<Vehicle> {
    let vehicle_type = Arc::new(create_basic_vehicle_type());
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| {
            let mut builder = VehicleBuilder::default();
            builder
                .set_external_id(index.to_string())
                .set_vehicle_type(Arc::clone(&vehicle_type))
                .set_start_location_id(location_id)
                .set_earliest_start(earliest_start)
                .set_latest_arrival(latest_arrival);
            builder.build().unwrap()
        })
        .collect()
}

pub fn create_vehicle(
    location_id: usize,
    earliest_start: f64,
    latest_arrival: f64,
    return_to_depot: bool,
) -> Vehicle {
    let mut builder = VehicleBuilder::default();
    builder
        .set_external_id("0")
        .set_vehicle_type(Arc::new(create_basic_vehicle_type()))
        .set_start_location_id(location_id)
        .set_earliest_start(earliest_start)
        .set_latest_arrival(latest_arrival)
        .set_return_to_depot(return_to_depot);
    builder.build().unwrap()
}

/// Finite fleet, euclidean costs.
pub fn create_test_problem(
    locations: Vec<Location>,
    jobs: Vec<Job>,
    vehicles: Vec<Vehicle>,
) -> VehicleRoutingProblem {
    let mut builder = VehicleRoutingProblemBuilder::default();
    builder
        .set_locations(locations)
        .set_jobs(jobs)
        .set_vehicles(vehicles);
    builder.build().unwrap()
}

pub struct TestRoute {
    pub vehicle_id: usize,
    pub job_ids: Vec<usize>,
}

/// Solution with the given routes and up to date activity times.
pub fn create_test_working_solution(
    problem: Arc<VehicleRoutingProblem>,
    routes: Vec<TestRoute>,
) -> WorkingSolution {
    let initial_routes: Vec<InitialRoute> = routes
        .into_iter()
        .map(|route| InitialRoute {
            vehicle_id: VehicleIdx::new(route.vehicle_id),
            jobs: route.job_ids.into_iter().map(JobIdx::new).collect(),
        })
        .collect();

    let mut solution = WorkingSolution::from_routes(Arc::clone(&problem), &initial_routes).unwrap();
    let mut states = StateManager::with_default_updaters(&problem);
    states.update_solution(&mut solution).unwrap();

    solution
}

pub fn dummy_activity(job: usize) -> TourActivity {
    TourActivity::job_activity(
        ActivityKind::Service,
        JobIdx::new(job),
        ActivityIdx::new(job),
        LocationIdx::new(0),
        Capacity::ZERO,
        0.0,
    )
}

/// Replays `data` in a loop.
pub struct MockRng {
    data: Vec<u64>,
    index: usize,
}

impl MockRng {
    pub fn new(data: Vec<u64>) -> Self {
        MockRng { data, index: 0 }
    }
}

impl RngCore for MockRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let value = self.data[self.index % self.data.len()];
        self.index = (self.index + 1) % self.data.len();
        value
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for byte in dst.iter_mut() {
            *byte = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn test_mock_rng() {
        let data = vec![1, 2, 3, 4];
        let mut rng = MockRng::new(data.clone());

        for &expected in data.iter().cycle().take(8) {
            assert_eq!(rng.next_u64(), expected);
        }
    }

    #[test]
    fn test_random_bool() {
        let mut rng = MockRng::new(vec![u64::MAX / 4]);

        assert!(!rng.random_bool(0.20));
        assert!(rng.random_bool(0.26));
    }
}
