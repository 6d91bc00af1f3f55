use tracing::trace;

use crate::{
    error::StateError,
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::solution::{
        activity::TourActivity, route::VehicleRoute, route_id::RouteIdx,
        working_solution::WorkingSolution,
    },
    utils::enumerate_idx::EnumerateIdx,
};

use super::{
    state_key::{StateKey, StateType, StateValue, StateValueType},
    updaters,
};

pub type UpdateFn = fn(
    &VehicleRoutingProblem,
    RouteIdx,
    &mut VehicleRoute,
    &mut StateManager,
) -> Result<(), StateError>;

/// Recomputes one family of derived values for a route.
#[derive(Clone, Copy)]
pub struct StateUpdater {
    pub name: &'static str,
    pub update: UpdateFn,
}

impl StateUpdater {
    pub const fn new(name: &'static str, update: UpdateFn) -> Self {
        StateUpdater { name, update }
    }
}

struct KeyDefinition {
    name: String,
    value_type: StateValueType,
}

type StateRow = Vec<Option<StateValue>>;

/// Keyed store of per-route and per-activity derived values.
///
/// Activity values are addressed by the activity index assigned when the
/// problem was built, route values by the route index in the solution that
/// was last synchronized.
pub struct StateManager {
    keys: Vec<KeyDefinition>,
    route_states: Vec<StateRow>,
    activity_states: Vec<StateRow>,
    updaters: Vec<StateUpdater>,
}

impl StateManager {
    /// Empty store with the built-in keys and no updaters.
    pub fn new(problem: &VehicleRoutingProblem) -> Self {
        StateManager {
            keys: StateKey::BUILT_IN
                .iter()
                .map(|(_, name, value_type)| KeyDefinition {
                    name: (*name).to_owned(),
                    value_type: *value_type,
                })
                .collect(),
            route_states: Vec::new(),
            activity_states: vec![Vec::new(); problem.num_activities()],
            updaters: Vec::new(),
        }
    }

    /// Store with the default updaters, in dependency order.
    pub fn with_default_updaters(problem: &VehicleRoutingProblem) -> Self {
        let mut states = StateManager::new(problem);
        for updater in updaters::default_updaters() {
            states.add_state_updater(updater);
        }
        states
    }

    /// Registers a new key. Existing values are wiped so that no row is shorter than the key table.
    pub fn create_state_key(&mut self, name: &str, value_type: StateValueType) -> StateKey {
        self.clear();
        self.keys.push(KeyDefinition {
            name: name.to_owned(),
            value_type,
        });
        StateKey::new(self.keys.len() - 1)
    }

    pub fn key_name(&self, key: StateKey) -> Option<&str> {
        self.keys.get(key.index()).map(|key| key.name.as_str())
    }

    /// Updaters run in registration order on every route update.
    pub fn add_state_updater(&mut self, updater: StateUpdater) {
        self.updaters.push(updater);
    }

    pub fn updater_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.updaters.iter().map(|updater| updater.name)
    }

    pub fn clear(&mut self) {
        self.route_states.clear();
        for row in self.activity_states.iter_mut() {
            row.clear();
        }
    }

    fn check_type<T: StateType>(&self, key: StateKey) -> Result<(), StateError> {
        let definition = self
            .keys
            .get(key.index())
            .ok_or(StateError::UnknownKey(key))?;

        if definition.value_type != T::VALUE_TYPE {
            return Err(StateError::TypeMismatch {
                key,
                declared: definition.value_type,
                requested: T::VALUE_TYPE,
            });
        }

        Ok(())
    }

    fn read<T: StateType>(row: Option<&StateRow>, key: StateKey) -> &T {
        row.and_then(|row| row.get(key.index()))
            .and_then(|value| value.as_ref())
            .and_then(T::from_value)
            .unwrap_or_else(|| T::default_ref())
    }

    fn write<T: StateType>(row: &mut StateRow, key: StateKey, value: T) {
        if row.len() <= key.index() {
            row.resize(key.index() + 1, None);
        }
        row[key.index()] = Some(value.into_value());
    }

    /// Last computed value, or the type default when nothing was stored.
    pub fn route_state<T: StateType>(&self, route_id: RouteIdx, key: StateKey) -> Result<&T, StateError> {
        self.check_type::<T>(key)?;
        Ok(Self::read(self.route_states.get(route_id.get()), key))
    }

    /// Last computed value of a job activity. Start and end have no activity
    /// state; their values live at route level.
    pub fn activity_state<T: StateType>(
        &self,
        activity: &TourActivity,
        key: StateKey,
    ) -> Result<&T, StateError> {
        self.check_type::<T>(key)?;
        let index = activity.index().ok_or(StateError::UnindexedActivity)?;
        Ok(Self::read(self.activity_states.get(index.get()), key))
    }

    pub fn put_route_state<T: StateType>(
        &mut self,
        route_id: RouteIdx,
        key: StateKey,
        value: T,
    ) -> Result<(), StateError> {
        self.check_type::<T>(key)?;
        if self.route_states.len() <= route_id.get() {
            self.route_states.resize(route_id.get() + 1, Vec::new());
        }
        Self::write(&mut self.route_states[route_id.get()], key, value);
        Ok(())
    }

    pub fn put_activity_state<T: StateType>(
        &mut self,
        activity: &TourActivity,
        key: StateKey,
        value: T,
    ) -> Result<(), StateError> {
        self.check_type::<T>(key)?;
        let index = activity.index().ok_or(StateError::UnindexedActivity)?;
        let row = self
            .activity_states
            .get_mut(index.get())
            .ok_or(StateError::UnindexedActivity)?;
        Self::write(row, key, value);
        Ok(())
    }

    /// Runs every updater on one route, recomputing its state from scratch.
    pub fn update_route(
        &mut self,
        problem: &VehicleRoutingProblem,
        route_id: RouteIdx,
        route: &mut VehicleRoute,
    ) -> Result<(), StateError> {
        if let Some(row) = self.route_states.get_mut(route_id.get()) {
            row.clear();
        }

        for index in 0..self.updaters.len() {
            let updater = self.updaters[index];
            trace!(updater = updater.name, route = %route_id, "updating route state");
            (updater.update)(problem, route_id, route, self)?;
        }

        Ok(())
    }

    /// Wipes all values and recomputes every route of `solution`.
    pub fn update_solution(&mut self, solution: &mut WorkingSolution) -> Result<(), StateError> {
        self.clear();

        let problem = solution.problem_arc();
        for (route_id, route) in solution.routes_mut().iter_mut().enumerate_idx() {
            self.update_route(&problem, route_id, route)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::{capacity::Capacity, job::JobIdx},
        test_utils::{self, TestRoute},
    };

    use super::*;

    fn create_states() -> (Arc<VehicleRoutingProblem>, WorkingSolution, StateManager) {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(3, 3),
            test_utils::create_basic_services(vec![1, 2, 3]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0, 1],
            }],
        );
        let states = StateManager::with_default_updaters(&problem);
        (problem, solution, states)
    }

    #[test]
    fn test_missing_values_return_defaults() {
        let (problem, _, states) = create_states();
        let activity = &problem.job_activities(JobIdx::new(2))[0];

        assert_eq!(
            states.route_state::<Capacity>(RouteIdx::new(4), StateKey::LOAD_AT_END),
            Ok(&Capacity::ZERO)
        );
        assert_eq!(
            states.activity_state::<f64>(activity, StateKey::COSTS),
            Ok(&0.0)
        );
        assert_eq!(
            states.activity_state::<bool>(activity, StateKey::SKILL_VIOLATED),
            Ok(&false)
        );
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        let (problem, _, mut states) = create_states();
        let activity = &problem.job_activities(JobIdx::new(0))[0];

        assert_eq!(
            states.activity_state::<f64>(activity, StateKey::LOAD),
            Err(StateError::TypeMismatch {
                key: StateKey::LOAD,
                declared: StateValueType::Capacity,
                requested: StateValueType::Double,
            })
        );
        assert!(
            states
                .put_route_state(RouteIdx::new(0), StateKey::SKILL_VIOLATED, 1.0)
                .is_err()
        );
    }

    #[test]
    fn test_start_has_no_activity_state() {
        let (_, solution, states) = create_states();
        let route = solution.route(RouteIdx::new(0));

        assert_eq!(
            states.activity_state::<f64>(route.start(), StateKey::COSTS),
            Err(StateError::UnindexedActivity)
        );
    }

    #[test]
    fn test_custom_key_and_clear() {
        let (_, mut solution, mut states) = create_states();
        let key = states.create_state_key("visits", StateValueType::Double);
        assert_eq!(states.key_name(key), Some("visits"));

        states.update_solution(&mut solution).unwrap();
        states.put_route_state(RouteIdx::new(0), key, 2.0).unwrap();
        assert_eq!(states.route_state::<f64>(RouteIdx::new(0), key), Ok(&2.0));
        assert!(*states.route_state::<f64>(RouteIdx::new(0), StateKey::COSTS).unwrap() > 0.0);

        states.clear();
        assert_eq!(states.route_state::<f64>(RouteIdx::new(0), key), Ok(&0.0));
        assert_eq!(
            states.route_state::<f64>(RouteIdx::new(0), StateKey::COSTS),
            Ok(&0.0)
        );
    }

    #[test]
    fn test_updaters_run_in_registration_order() {
        let (problem, _, _) = create_states();
        let states = StateManager::with_default_updaters(&problem);

        assert_eq!(
            states.updater_names().collect::<Vec<_>>(),
            vec![
                "loads",
                "latest_operation_starts",
                "skills",
                "violations",
                "activity_times",
                "variable_costs",
                "waiting_times",
            ]
        );
    }
}
