use std::collections::BTreeSet;

use crate::{
    error::FleetError,
    problem::{
        fleet::FleetSize,
        vehicle::{TypeIdentityIdx, VehicleIdx},
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    utils::enumerate_idx::EnumerateIdx,
};

/// Tracks which vehicles are free to open a new route.
#[derive(Debug, Clone)]
pub enum VehicleFleetManager {
    Finite(FiniteFleetManager),
    Infinite(InfiniteFleetManager),
}

impl VehicleFleetManager {
    pub fn new(problem: &VehicleRoutingProblem) -> Self {
        match problem.fleet_size() {
            FleetSize::Finite => VehicleFleetManager::Finite(FiniteFleetManager::new(problem)),
            FleetSize::Infinite => {
                VehicleFleetManager::Infinite(InfiniteFleetManager::new(problem))
            }
        }
    }

    pub fn lock(&mut self, vehicle_id: VehicleIdx) -> Result<(), FleetError> {
        match self {
            VehicleFleetManager::Finite(fleet) => fleet.lock(vehicle_id),
            VehicleFleetManager::Infinite(fleet) => fleet.check(vehicle_id),
        }
    }

    pub fn unlock(&mut self, vehicle_id: VehicleIdx) -> Result<(), FleetError> {
        match self {
            VehicleFleetManager::Finite(fleet) => fleet.unlock(vehicle_id),
            VehicleFleetManager::Infinite(fleet) => fleet.check(vehicle_id),
        }
    }

    pub fn unlock_all(&mut self) {
        if let VehicleFleetManager::Finite(fleet) = self {
            fleet.unlock_all();
        }
    }

    pub fn is_locked(&self, vehicle_id: VehicleIdx) -> bool {
        match self {
            VehicleFleetManager::Finite(fleet) => fleet.is_locked(vehicle_id),
            VehicleFleetManager::Infinite(_) => false,
        }
    }

    /// One vehicle per type identity that can still open a route.
    pub fn available_vehicles(&self) -> Vec<VehicleIdx> {
        self.available_vehicles_without(None)
    }

    /// Same as [`Self::available_vehicles`], skipping one type identity.
    pub fn available_vehicles_without(&self, excluded: Option<TypeIdentityIdx>) -> Vec<VehicleIdx> {
        match self {
            VehicleFleetManager::Finite(fleet) => fleet.available_vehicles(excluded),
            VehicleFleetManager::Infinite(fleet) => fleet.available_vehicles(excluded),
        }
    }

    /// Locks exactly the vehicles used by `route_vehicles`.
    pub fn sync<I>(&mut self, route_vehicles: I) -> Result<(), FleetError>
    where
        I: IntoIterator<Item = VehicleIdx>,
    {
        self.unlock_all();
        for vehicle_id in route_vehicles {
            self.lock(vehicle_id)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
struct IdentityPool {
    available: BTreeSet<VehicleIdx>,
    penalty: Option<VehicleIdx>,
}

/// Each vehicle serves at most one route. Once every vehicle of an identity is
/// locked, its penalty vehicle (if the problem has one) is offered instead.
#[derive(Debug, Clone)]
pub struct FiniteFleetManager {
    pools: Vec<IdentityPool>,
    identities: Vec<TypeIdentityIdx>,
    penalty: Vec<bool>,
    locked: Vec<bool>,
}

impl FiniteFleetManager {
    pub fn new(problem: &VehicleRoutingProblem) -> Self {
        let mut pools = vec![IdentityPool::default(); problem.num_type_identities()];
        for (vehicle_id, vehicle) in problem.vehicles().iter().enumerate_idx() {
            let pool = &mut pools[vehicle.type_identity().get()];
            if vehicle.is_penalty() {
                pool.penalty.get_or_insert(vehicle_id);
            } else {
                pool.available.insert(vehicle_id);
            }
        }

        FiniteFleetManager {
            pools,
            identities: problem.vehicles().iter().map(|v| v.type_identity()).collect(),
            penalty: problem.vehicles().iter().map(|v| v.is_penalty()).collect(),
            locked: vec![false; problem.num_vehicles()],
        }
    }

    fn check(&self, vehicle_id: VehicleIdx) -> Result<(), FleetError> {
        if vehicle_id.get() >= self.locked.len() {
            Err(FleetError::UnknownVehicle(vehicle_id))
        } else {
            Ok(())
        }
    }

    /// Penalty vehicles are never locked.
    pub fn lock(&mut self, vehicle_id: VehicleIdx) -> Result<(), FleetError> {
        self.check(vehicle_id)?;
        if self.penalty[vehicle_id.get()] {
            return Ok(());
        }
        if self.locked[vehicle_id.get()] {
            return Err(FleetError::AlreadyLocked(vehicle_id));
        }

        self.locked[vehicle_id.get()] = true;
        self.pools[self.identities[vehicle_id.get()].get()]
            .available
            .remove(&vehicle_id);
        Ok(())
    }

    pub fn unlock(&mut self, vehicle_id: VehicleIdx) -> Result<(), FleetError> {
        self.check(vehicle_id)?;
        if self.penalty[vehicle_id.get()] || !self.locked[vehicle_id.get()] {
            return Ok(());
        }

        self.locked[vehicle_id.get()] = false;
        self.pools[self.identities[vehicle_id.get()].get()]
            .available
            .insert(vehicle_id);
        Ok(())
    }

    pub fn unlock_all(&mut self) {
        for index in 0..self.locked.len() {
            if self.locked[index] {
                self.locked[index] = false;
                self.pools[self.identities[index].get()]
                    .available
                    .insert(VehicleIdx::new(index));
            }
        }
    }

    pub fn is_locked(&self, vehicle_id: VehicleIdx) -> bool {
        self.locked.get(vehicle_id.get()).copied().unwrap_or(false)
    }

    fn available_vehicles(&self, excluded: Option<TypeIdentityIdx>) -> Vec<VehicleIdx> {
        self.pools
            .iter()
            .enumerate_idx()
            .filter(|(identity, _): &(TypeIdentityIdx, &IdentityPool)| Some(*identity) != excluded)
            .filter_map(|(_, pool)| pool.available.first().copied().or(pool.penalty))
            .collect()
    }
}

/// Any number of routes may use the same vehicle.
#[derive(Debug, Clone)]
pub struct InfiniteFleetManager {
    representatives: Vec<VehicleIdx>,
    num_vehicles: usize,
}

impl InfiniteFleetManager {
    pub fn new(problem: &VehicleRoutingProblem) -> Self {
        let mut representatives: Vec<Option<VehicleIdx>> = vec![None; problem.num_type_identities()];
        for (vehicle_id, vehicle) in problem.vehicles().iter().enumerate_idx() {
            representatives[vehicle.type_identity().get()].get_or_insert(vehicle_id);
        }

        InfiniteFleetManager {
            representatives: representatives.into_iter().flatten().collect(),
            num_vehicles: problem.num_vehicles(),
        }
    }

    fn check(&self, vehicle_id: VehicleIdx) -> Result<(), FleetError> {
        if vehicle_id.get() >= self.num_vehicles {
            Err(FleetError::UnknownVehicle(vehicle_id))
        } else {
            Ok(())
        }
    }

    fn available_vehicles(&self, excluded: Option<TypeIdentityIdx>) -> Vec<VehicleIdx> {
        self.representatives
            .iter()
            .enumerate()
            .filter(|(identity, _)| Some(TypeIdentityIdx::new(*identity)) != excluded)
            .map(|(_, vehicle_id)| *vehicle_id)
            .collect()
    }
}
