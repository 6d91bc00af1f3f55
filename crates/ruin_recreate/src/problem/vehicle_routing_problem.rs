use std::sync::Arc;

use fxhash::{FxHashMap, FxHashSet};
use rand::Rng;
use smallvec::{SmallVec, smallvec};

use crate::{
    error::ConfigError,
    problem::{
        activity_costs::{ActivityCosts, WaitingTimeCosts},
        capacity::Capacity,
        fleet::FleetSize,
        job::{ActivityIdx, Job, JobIdx},
        location::{Location, LocationIdx},
        time_window::TimeWindow,
        transport_costs::{Cost, TransportCosts},
        travel_cost_matrix::TravelMatrices,
        vehicle::{TypeIdentityIdx, Vehicle, VehicleIdx, VehicleTypeKey},
    },
    solver::solution::activity::{ActivityKind, TourActivity},
    utils::enumerate_idx::EnumerateIdx,
};

const UNBOUNDED: [TimeWindow; 1] = [TimeWindow::new_unchecked(0.0, f64::MAX)];

/// Route the search starts from. A shipment appears twice in `jobs`: the first
/// occurrence is its pickup, the second its delivery.
#[derive(Debug, Clone)]
pub struct InitialRoute {
    pub vehicle_id: VehicleIdx,
    pub jobs: Vec<JobIdx>,
}

pub struct VehicleRoutingProblem {
    locations: Vec<Location>,
    jobs: Vec<Job>,
    vehicles: Vec<Vehicle>,
    fleet_size: FleetSize,
    type_identities: Vec<VehicleTypeKey>,
    transport_costs: Arc<dyn TransportCosts>,
    activity_costs: Arc<dyn ActivityCosts>,
    job_activities: Vec<SmallVec<[TourActivity; 2]>>,
    num_activities: usize,
    initial_routes: Vec<InitialRoute>,
    depot_locations: Vec<LocationIdx>,
    max_transport_cost: Cost,
}

impl VehicleRoutingProblem {
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, location_id: LocationIdx) -> &Location {
        &self.locations[location_id]
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, job_id: JobIdx) -> &Job {
        &self.jobs[job_id]
    }

    pub fn num_jobs(&self) -> usize {
        self.jobs.len()
    }

    pub fn jobs_iter(&self) -> impl Iterator<Item = JobIdx> {
        (0..self.jobs.len()).map(JobIdx::new)
    }

    pub fn random_job<R>(&self, rng: &mut R) -> JobIdx
    where
        R: Rng,
    {
        JobIdx::new(rng.random_range(0..self.jobs.len()))
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &Vehicle {
        &self.vehicles[vehicle_id]
    }

    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    pub fn fleet_size(&self) -> FleetSize {
        self.fleet_size
    }

    pub fn num_type_identities(&self) -> usize {
        self.type_identities.len()
    }

    pub fn type_identity(&self, index: TypeIdentityIdx) -> &VehicleTypeKey {
        &self.type_identities[index]
    }

    pub fn transport_costs(&self) -> &dyn TransportCosts {
        self.transport_costs.as_ref()
    }

    pub fn activity_costs(&self) -> &dyn ActivityCosts {
        self.activity_costs.as_ref()
    }

    /// Unscheduled activities of a job, in route order.
    pub fn job_activities(&self, job_id: JobIdx) -> &[TourActivity] {
        &self.job_activities[job_id.get()]
    }

    /// Number of indexed job activities, the size of the activity state table.
    pub fn num_activities(&self) -> usize {
        self.num_activities
    }

    /// Candidate windows of a job activity; unconstrained activities get a single open window.
    pub fn activity_time_windows(&self, activity: &TourActivity) -> &[TimeWindow] {
        let Some(job_id) = activity.job() else {
            return &UNBOUNDED;
        };

        let time_windows = match (self.job(job_id), activity.kind()) {
            (Job::Service(service) | Job::Pickup(service) | Job::Delivery(service), _) => {
                service.time_windows()
            }
            (Job::Shipment(shipment), ActivityKind::DeliverShipment) => {
                shipment.delivery().time_windows()
            }
            (Job::Shipment(shipment), _) => shipment.pickup().time_windows(),
            (Job::Break { vehicle_break, .. }, _) => vehicle_break.time_windows(),
        };

        if time_windows.is_empty() {
            &UNBOUNDED
        } else {
            time_windows
        }
    }

    pub fn initial_routes(&self) -> &[InitialRoute] {
        &self.initial_routes
    }

    /// Distinct start locations of the regular fleet.
    pub fn depot_locations(&self) -> &[LocationIdx] {
        &self.depot_locations
    }

    /// Largest vehicle independent transport cost between any two used locations.
    pub fn max_transport_cost(&self) -> Cost {
        self.max_transport_cost
    }

    pub fn is_job_compatible_with_vehicle(&self, job_id: JobIdx, vehicle_id: VehicleIdx) -> bool {
        let job = self.job(job_id);
        let vehicle = self.vehicle(vehicle_id);

        if let Some(break_vehicle) = job.break_vehicle() {
            return break_vehicle == vehicle_id;
        }

        job.skills().is_none_or(|skills| vehicle.has_skills(skills))
    }
}

#[derive(Default)]
pub struct VehicleRoutingProblemBuilder {
    locations: Option<Vec<Location>>,
    jobs: Vec<Job>,
    vehicles: Vec<Vehicle>,
    fleet_size: FleetSize,
    transport_costs: Option<Arc<dyn TransportCosts>>,
    activity_costs: Option<Arc<dyn ActivityCosts>>,
    initial_routes: Vec<InitialRoute>,
    penalty_factor: Option<f64>,
}

impl VehicleRoutingProblemBuilder {
    pub fn set_locations(&mut self, locations: Vec<Location>) -> &mut VehicleRoutingProblemBuilder {
        self.locations = Some(locations);
        self
    }

    pub fn set_jobs(&mut self, jobs: Vec<Job>) -> &mut VehicleRoutingProblemBuilder {
        self.jobs = jobs;
        self
    }

    pub fn add_job(&mut self, job: Job) -> &mut VehicleRoutingProblemBuilder {
        self.jobs.push(job);
        self
    }

    pub fn set_vehicles(&mut self, vehicles: Vec<Vehicle>) -> &mut VehicleRoutingProblemBuilder {
        self.vehicles = vehicles;
        self
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> &mut VehicleRoutingProblemBuilder {
        self.vehicles.push(vehicle);
        self
    }

    pub fn set_fleet_size(&mut self, fleet_size: FleetSize) -> &mut VehicleRoutingProblemBuilder {
        self.fleet_size = fleet_size;
        self
    }

    /// Defaults to euclidean matrices over the locations.
    pub fn set_transport_costs(
        &mut self,
        transport_costs: Arc<dyn TransportCosts>,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.transport_costs = Some(transport_costs);
        self
    }

    /// Defaults to [`WaitingTimeCosts`].
    pub fn set_activity_costs(
        &mut self,
        activity_costs: Arc<dyn ActivityCosts>,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.activity_costs = Some(activity_costs);
        self
    }

    pub fn add_initial_route(
        &mut self,
        initial_route: InitialRoute,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.initial_routes.push(initial_route);
        self
    }

    /// Adds one penalty vehicle per type identity of a finite fleet, with costs scaled by `factor`.
    pub fn add_penalty_vehicles(&mut self, factor: f64) -> &mut VehicleRoutingProblemBuilder {
        self.penalty_factor = Some(factor);
        self
    }

    pub fn build(self) -> Result<VehicleRoutingProblem, ConfigError> {
        let VehicleRoutingProblemBuilder {
            locations,
            mut jobs,
            mut vehicles,
            fleet_size,
            transport_costs,
            activity_costs,
            initial_routes,
            penalty_factor,
        } = self;

        if vehicles.is_empty() {
            return Err(ConfigError::NoVehicles);
        }

        let locations = locations.unwrap_or_default();
        let transport_costs: Arc<dyn TransportCosts> = match transport_costs {
            Some(transport_costs) => transport_costs,
            None if !locations.is_empty() => Arc::new(TravelMatrices::from_euclidean(&locations)),
            None => return Err(ConfigError::MissingField("transport_costs")),
        };

        let mut job_ids = FxHashSet::default();
        for job in &jobs {
            if !job_ids.insert(job.external_id().to_owned()) {
                return Err(ConfigError::DuplicateJob(job.external_id().to_owned()));
            }
        }

        let mut vehicle_ids = FxHashSet::default();
        for vehicle in &vehicles {
            if !vehicle_ids.insert(vehicle.external_id().to_owned()) {
                return Err(ConfigError::DuplicateVehicle(vehicle.external_id().to_owned()));
            }
        }

        // Breaks become jobs bound to their vehicle
        for (vehicle_id, vehicle) in vehicles.iter_mut().enumerate_idx() {
            if let Some(vehicle_break) = vehicle.vehicle_break().cloned() {
                if !job_ids.insert(vehicle_break.external_id().to_owned()) {
                    return Err(ConfigError::DuplicateJob(vehicle_break.external_id().to_owned()));
                }
                vehicle.set_break_job(JobIdx::new(jobs.len()));
                jobs.push(Job::Break {
                    vehicle_id,
                    vehicle_break,
                });
            }
        }

        if !locations.is_empty() {
            let used_locations = jobs
                .iter()
                .flat_map(|job| job.location_ids())
                .chain(
                    vehicles
                        .iter()
                        .flat_map(|v| [v.start_location_id(), v.end_location_id()]),
                );
            for location_id in used_locations {
                if location_id.get() >= locations.len() {
                    return Err(ConfigError::UnknownLocation(location_id.get()));
                }
            }
        }

        let mut type_identities: Vec<VehicleTypeKey> = Vec::new();
        let mut identity_lookup: FxHashMap<VehicleTypeKey, TypeIdentityIdx> = FxHashMap::default();
        for vehicle in vehicles.iter_mut() {
            let key = vehicle.type_key();
            let identity = *identity_lookup.entry(key.clone()).or_insert_with(|| {
                type_identities.push(key);
                TypeIdentityIdx::new(type_identities.len() - 1)
            });
            vehicle.set_type_identity(identity);
        }

        if fleet_size == FleetSize::Finite
            && let Some(factor) = penalty_factor
        {
            if factor < 1.0 || factor.is_nan() {
                return Err(ConfigError::InvalidParameter {
                    name: "penalty_factor",
                    reason: format!("must be at least 1, got {factor}"),
                });
            }

            let mut seen = FxHashSet::default();
            let penalty_vehicles: Vec<Vehicle> = vehicles
                .iter()
                .filter(|vehicle| seen.insert(vehicle.type_identity()))
                .map(|vehicle| vehicle.to_penalty_vehicle(factor))
                .collect();
            vehicles.extend(penalty_vehicles);
        }

        let (job_activities, num_activities) = build_job_activities(&jobs, &vehicles);

        validate_initial_routes(&initial_routes, &jobs, &vehicles)?;

        let mut depot_locations: Vec<LocationIdx> = vehicles
            .iter()
            .filter(|vehicle| !vehicle.is_penalty())
            .map(|vehicle| vehicle.start_location_id())
            .collect();
        depot_locations.sort();
        depot_locations.dedup();

        let max_transport_cost = compute_max_transport_cost(&jobs, &vehicles, transport_costs.as_ref());

        Ok(VehicleRoutingProblem {
            locations,
            jobs,
            vehicles,
            fleet_size,
            type_identities,
            transport_costs,
            activity_costs: activity_costs.unwrap_or_else(|| Arc::new(WaitingTimeCosts)),
            job_activities,
            num_activities,
            initial_routes,
            depot_locations,
            max_transport_cost,
        })
    }
}

fn build_job_activities(
    jobs: &[Job],
    vehicles: &[Vehicle],
) -> (Vec<SmallVec<[TourActivity; 2]>>, usize) {
    let mut next_index = 0;
    let mut next_activity_index = || {
        let index = ActivityIdx::new(next_index);
        next_index += 1;
        index
    };

    let job_activities = jobs
        .iter()
        .enumerate_idx()
        .map(|(job_id, job): (JobIdx, &Job)| -> SmallVec<[TourActivity; 2]> {
            match job {
                Job::Service(service) => smallvec![TourActivity::job_activity(
                    ActivityKind::Service,
                    job_id,
                    next_activity_index(),
                    service.location_id(),
                    service.demand().clone(),
                    service.duration(),
                )],
                Job::Pickup(service) => smallvec![TourActivity::job_activity(
                    ActivityKind::PickupService,
                    job_id,
                    next_activity_index(),
                    service.location_id(),
                    service.demand().clone(),
                    service.duration(),
                )],
                Job::Delivery(service) => smallvec![TourActivity::job_activity(
                    ActivityKind::DeliverService,
                    job_id,
                    next_activity_index(),
                    service.location_id(),
                    -service.demand(),
                    service.duration(),
                )],
                Job::Shipment(shipment) => smallvec![
                    TourActivity::job_activity(
                        ActivityKind::PickupShipment,
                        job_id,
                        next_activity_index(),
                        shipment.pickup().location_id(),
                        shipment.demand().clone(),
                        shipment.pickup().duration(),
                    ),
                    TourActivity::job_activity(
                        ActivityKind::DeliverShipment,
                        job_id,
                        next_activity_index(),
                        shipment.delivery().location_id(),
                        -shipment.demand(),
                        shipment.delivery().duration(),
                    )
                ],
                Job::Break {
                    vehicle_id,
                    vehicle_break,
                } => smallvec![TourActivity::job_activity(
                    ActivityKind::Break,
                    job_id,
                    next_activity_index(),
                    vehicle_break
                        .location_id()
                        .unwrap_or_else(|| vehicles[*vehicle_id].start_location_id()),
                    Capacity::ZERO,
                    vehicle_break.duration(),
                )],
            }
        })
        .collect();

    (job_activities, next_index)
}

fn validate_initial_routes(
    initial_routes: &[InitialRoute],
    jobs: &[Job],
    vehicles: &[Vehicle],
) -> Result<(), ConfigError> {
    let mut routed: FxHashMap<JobIdx, usize> = FxHashMap::default();
    let mut used_vehicles = FxHashSet::default();

    for route in initial_routes {
        if route.vehicle_id.get() >= vehicles.len() {
            return Err(ConfigError::InvalidInitialRoute(format!(
                "vehicle {}",
                route.vehicle_id
            )));
        }
        if !used_vehicles.insert(route.vehicle_id) {
            return Err(ConfigError::InvalidInitialRoute(format!(
                "vehicle {} used twice",
                route.vehicle_id
            )));
        }

        for &job_id in &route.jobs {
            if job_id.get() >= jobs.len() {
                return Err(ConfigError::InvalidInitialRoute(format!("job {job_id}")));
            }
            *routed.entry(job_id).or_default() += 1;
        }
    }

    for (job_id, count) in routed {
        let expected = jobs[job_id.get()].num_activities();
        if count != expected {
            return Err(ConfigError::InvalidInitialRoute(format!(
                "job {job_id} listed {count} times, expected {expected}"
            )));
        }
    }

    Ok(())
}

fn compute_max_transport_cost(
    jobs: &[Job],
    vehicles: &[Vehicle],
    transport_costs: &dyn TransportCosts,
) -> Cost {
    let mut locations: Vec<LocationIdx> = jobs
        .iter()
        .flat_map(|job| job.location_ids())
        .chain(
            vehicles
                .iter()
                .flat_map(|v| [v.start_location_id(), v.end_location_id()]),
        )
        .collect();
    locations.sort();
    locations.dedup();

    let mut max_cost: Cost = 0.0;
    for &from in &locations {
        for &to in &locations {
            max_cost = max_cost.max(transport_costs.distance(from, to));
        }
    }

    max_cost
}
