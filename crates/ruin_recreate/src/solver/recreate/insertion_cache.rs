use fxhash::FxHashMap;
use parking_lot::Mutex;

use crate::{
    problem::job::JobIdx,
    solver::{
        insertion::InsertionResult,
        solution::{route::VehicleRoute, route_id::RouteIdx},
    },
};

/// Best insertion of a job into a route, valid while the route keeps its version.
///
/// Shared by the workers of a parallel pass, each entry is written once per
/// route version.
#[derive(Default)]
pub struct InsertionCache {
    cache: Mutex<FxHashMap<(RouteIdx, usize, JobIdx), InsertionResult>>,
}

impl InsertionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, route_id: RouteIdx, version: usize, job_id: JobIdx) -> Option<InsertionResult> {
        self.cache.lock().get(&(route_id, version, job_id)).cloned()
    }

    pub fn insert(&self, route_id: RouteIdx, version: usize, job_id: JobIdx, result: InsertionResult) {
        self.cache.lock().insert((route_id, version, job_id), result);
    }

    /// Drops entries of routes that changed since they were computed.
    pub fn retain_current(&self, routes: &[VehicleRoute]) {
        self.cache.lock().retain(|(route_id, version, _), _| {
            routes
                .get(route_id.get())
                .is_some_and(|route| route.version() == *version)
        });
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
