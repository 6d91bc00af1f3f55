use crate::problem::{
    driver::Driver,
    job::JobIdx,
    transport_costs::Cost,
    vehicle::{Vehicle, VehicleIdx},
    vehicle_routing_problem::VehicleRoutingProblem,
};

use super::activity::{ActivityKind, TourActivity};

/// Ordered activities of one vehicle, bounded by its start and end.
#[derive(Debug, Clone)]
pub struct VehicleRoute {
    vehicle_id: VehicleIdx,
    driver: Driver,
    start: TourActivity,
    end: TourActivity,
    activities: Vec<TourActivity>,
    version: usize,
}

impl VehicleRoute {
    pub fn empty(problem: &VehicleRoutingProblem, vehicle_id: VehicleIdx) -> Self {
        let vehicle = problem.vehicle(vehicle_id);
        VehicleRoute {
            vehicle_id,
            driver: Driver::NoDriver,
            start: TourActivity::start(vehicle),
            end: TourActivity::end(vehicle),
            activities: Vec::new(),
            version: 0,
        }
    }

    pub fn vehicle_id(&self) -> VehicleIdx {
        self.vehicle_id
    }

    pub fn vehicle<'a>(&self, problem: &'a VehicleRoutingProblem) -> &'a Vehicle {
        problem.vehicle(self.vehicle_id)
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub fn start(&self) -> &TourActivity {
        &self.start
    }

    pub fn end(&self) -> &TourActivity {
        &self.end
    }

    pub fn departure_time(&self) -> f64 {
        self.start.end_time()
    }

    pub fn activities(&self) -> &[TourActivity] {
        &self.activities
    }

    pub fn activity(&self, position: usize) -> &TourActivity {
        &self.activities[position]
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Incremented on every mutation, used to invalidate cached insertions.
    pub fn version(&self) -> usize {
        self.version
    }

    /// Activity before `position`, the start for the first position.
    pub fn previous(&self, position: usize) -> &TourActivity {
        if position == 0 {
            &self.start
        } else {
            &self.activities[position - 1]
        }
    }

    /// Activity at `position`, the end past the last activity.
    pub fn next(&self, position: usize) -> &TourActivity {
        self.activities.get(position).unwrap_or(&self.end)
    }

    /// Jobs served by the route, each listed once.
    pub fn jobs(&self) -> impl Iterator<Item = JobIdx> + '_ {
        self.activities
            .iter()
            .filter(|activity| activity.kind() != ActivityKind::DeliverShipment)
            .filter_map(|activity| activity.job())
    }

    pub fn contains_job(&self, job_id: JobIdx) -> bool {
        self.activities
            .iter()
            .any(|activity| activity.job() == Some(job_id))
    }

    pub fn position_of(&self, job_id: JobIdx) -> Option<usize> {
        self.activities
            .iter()
            .position(|activity| activity.job() == Some(job_id))
    }

    /// Transport cost of the route as currently scheduled.
    pub fn transport_costs(&self, problem: &VehicleRoutingProblem) -> Cost {
        let vehicle = self.vehicle(problem);
        let costs = problem.transport_costs();

        let mut total = 0.0;
        let mut previous = &self.start;
        for activity in &self.activities {
            total += costs.transport_cost(
                previous.location_id(),
                activity.location_id(),
                previous.end_time(),
                &self.driver,
                Some(vehicle),
            );
            previous = activity;
        }

        if vehicle.return_to_depot() {
            total += costs.transport_cost(
                previous.location_id(),
                self.end.location_id(),
                previous.end_time(),
                &self.driver,
                Some(vehicle),
            );
        }

        total
    }

    /// Inserts `(position, activity)` pairs. Positions refer to the route before
    /// the call, so a later activity of the same job is shifted by the earlier ones.
    pub(crate) fn insert_activities(&mut self, activities: &[(usize, TourActivity)]) {
        for (offset, (position, activity)) in activities.iter().enumerate() {
            self.activities.insert(position + offset, activity.clone());
        }
        self.version += 1;
    }

    pub(crate) fn remove_job(&mut self, job_id: JobIdx) -> bool {
        let before = self.activities.len();
        self.activities
            .retain(|activity| activity.job() != Some(job_id));

        let removed = self.activities.len() != before;
        if removed {
            self.version += 1;
        }

        removed
    }

    pub(crate) fn set_vehicle(&mut self, problem: &VehicleRoutingProblem, vehicle_id: VehicleIdx) {
        let vehicle = problem.vehicle(vehicle_id);
        self.vehicle_id = vehicle_id;
        self.start = TourActivity::start(vehicle);
        self.end = TourActivity::end(vehicle);
        self.version += 1;
    }

    /// Copy of the route driven by `vehicle_id`, starting and ending at its depots.
    /// Activity times are left as they were and must be simulated again.
    pub(crate) fn with_vehicle(&self, problem: &VehicleRoutingProblem, vehicle_id: VehicleIdx) -> VehicleRoute {
        let mut route = self.clone();
        route.set_vehicle(problem, vehicle_id);
        route
    }

    /// Start, activities and end, for the state updaters.
    pub(crate) fn tour_mut(
        &mut self,
    ) -> (&mut TourActivity, &mut [TourActivity], &mut TourActivity) {
        (&mut self.start, &mut self.activities, &mut self.end)
    }

    pub(crate) fn is_same_tour(&self, other: &VehicleRoute) -> bool {
        self.vehicle_id == other.vehicle_id && self.activities == other.activities
    }
}
