use crate::{
    error::StateError,
    problem::{
        driver::Driver,
        job::JobIdx,
        vehicle::{Vehicle, VehicleIdx},
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        noise::NoiseGenerator,
        solution::{activity::TourActivity, route::VehicleRoute, route_id::RouteIdx},
        state::{
            state_key::{StateKey, StateType},
            state_manager::StateManager,
        },
    },
};

/// Everything the constraints need to judge one job on one route with one vehicle.
pub struct JobInsertionContext<'a> {
    pub problem: &'a VehicleRoutingProblem,
    pub states: &'a StateManager,

    /// `None` when the job would open a new route.
    pub route_id: Option<RouteIdx>,

    /// The target route as `new_vehicle` would drive it.
    pub route: &'a VehicleRoute,

    /// Vehicle driving the target route in the solution.
    pub route_vehicle_id: VehicleIdx,
    pub job_id: JobIdx,

    pub new_vehicle_id: VehicleIdx,
    pub new_vehicle: &'a Vehicle,
    pub new_driver: &'a Driver,
    pub departure_time: f64,

    /// Latest operation starts of the route's activities recomputed for
    /// `new_vehicle`, set when it differs from the route's vehicle.
    pub vehicle_latest_starts: Option<&'a [f64]>,

    pub noise: Option<&'a NoiseGenerator>,

    /// Share of the jobs of the current pass already inserted, in `[0, 1]`.
    pub completeness: f64,
}

impl<'a> JobInsertionContext<'a> {
    /// Route state of the target route; a new route has only defaults.
    pub fn route_state<T: StateType>(&self, key: StateKey) -> Result<&'a T, StateError> {
        match self.route_id {
            Some(route_id) => self.states.route_state(route_id, key),
            None => Ok(T::default_ref()),
        }
    }

    pub fn activity_state<T: StateType>(
        &self,
        activity: &TourActivity,
        key: StateKey,
    ) -> Result<&'a T, StateError> {
        self.states.activity_state(activity, key)
    }

    /// Latest operation start of the route activity at `position`, for the new vehicle.
    pub fn latest_operation_start(&self, position: usize) -> Result<f64, StateError> {
        match self.vehicle_latest_starts {
            Some(latest_starts) => Ok(latest_starts[position]),
            None => self
                .states
                .activity_state::<f64>(self.route.activity(position), StateKey::LATEST_OPERATION_START)
                .copied(),
        }
    }

    pub fn is_new_route(&self) -> bool {
        self.route_id.is_none() || self.route.is_empty()
    }

    /// True when an existing route would change vehicle.
    pub fn is_vehicle_switch(&self) -> bool {
        !self.is_new_route() && self.new_vehicle_id != self.route_vehicle_id
    }

    /// Key identifying the target route, new routes share one.
    pub fn route_key(&self) -> usize {
        self.route_id.map(|route_id| route_id.get()).unwrap_or(usize::MAX)
    }
}

/// Neighborhood of one candidate position.
pub struct ActivityContext<'a> {
    pub previous: &'a TourActivity,
    pub new: &'a TourActivity,
    pub next: &'a TourActivity,

    /// Index of `next` in the route activities, `None` when it is the route end.
    pub next_position: Option<usize>,

    /// Insertion position of `new` in the original route.
    pub position: usize,
    pub previous_end_time: f64,

    /// For a shipment delivery: position of its pickup in the original route.
    pub pickup_position: Option<usize>,

    /// For a shipment delivery placed right after its own pickup: the activity
    /// preceding that pickup, whose stored state is still valid.
    pub pickup_previous: Option<&'a TourActivity>,
}
