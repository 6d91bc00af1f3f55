use std::sync::Arc;

use fxhash::FxHashSet;
use serde::Serialize;

use crate::{
    define_index_newtype,
    error::ConfigError,
    problem::{
        capacity::Capacity, job::JobIdx, location::LocationIdx, skill::Skill,
        vehicle_break::VehicleBreak, vehicle_type::VehicleType,
    },
};

define_index_newtype!(VehicleIdx, Vehicle);

// Index of a type identity, shared by all interchangeable vehicles.
define_index_newtype!(TypeIdentityIdx, VehicleTypeKey);

#[derive(Serialize, Debug, Clone)]
pub struct Vehicle {
    external_id: String,
    vehicle_type: Arc<VehicleType>,
    start_location_id: LocationIdx,
    end_location_id: LocationIdx,
    earliest_start: f64,
    latest_arrival: f64,
    return_to_depot: bool,
    skills: FxHashSet<Skill>,
    vehicle_break: Option<VehicleBreak>,
    break_job: Option<JobIdx>,
    is_penalty: bool,
    type_identity: TypeIdentityIdx,
}

impl Vehicle {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn vehicle_type(&self) -> &VehicleType {
        &self.vehicle_type
    }

    pub fn capacity(&self) -> &Capacity {
        self.vehicle_type.capacity()
    }

    pub fn start_location_id(&self) -> LocationIdx {
        self.start_location_id
    }

    pub fn end_location_id(&self) -> LocationIdx {
        self.end_location_id
    }

    pub fn earliest_start(&self) -> f64 {
        self.earliest_start
    }

    pub fn latest_arrival(&self) -> f64 {
        self.latest_arrival
    }

    pub fn return_to_depot(&self) -> bool {
        self.return_to_depot
    }

    pub fn skills(&self) -> &FxHashSet<Skill> {
        &self.skills
    }

    pub fn vehicle_break(&self) -> Option<&VehicleBreak> {
        self.vehicle_break.as_ref()
    }

    pub fn break_job(&self) -> Option<JobIdx> {
        self.break_job
    }

    pub fn is_penalty(&self) -> bool {
        self.is_penalty
    }

    pub fn type_identity(&self) -> TypeIdentityIdx {
        self.type_identity
    }

    pub fn type_key(&self) -> VehicleTypeKey {
        VehicleTypeKey::new(self)
    }

    pub fn has_skills(&self, skills: &FxHashSet<Skill>) -> bool {
        skills.is_subset(&self.skills)
    }

    pub(crate) fn set_break_job(&mut self, job: JobIdx) {
        self.break_job = Some(job);
    }

    pub(crate) fn set_type_identity(&mut self, type_identity: TypeIdentityIdx) {
        self.type_identity = type_identity;
    }

    /// Copy of this vehicle flagged as a penalty vehicle, with costs scaled by `factor`.
    pub(crate) fn to_penalty_vehicle(&self, factor: f64) -> Vehicle {
        Vehicle {
            external_id: format!("{}_penalty", self.external_id),
            vehicle_type: Arc::new(self.vehicle_type.penalty_type(factor)),
            vehicle_break: None,
            break_job: None,
            is_penalty: true,
            ..self.clone()
        }
    }
}

/// Interchangeability key: two vehicles with equal keys are equivalent for fleet management.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VehicleTypeKey {
    type_id: String,
    start_location_id: LocationIdx,
    end_location_id: LocationIdx,
    earliest_start: u64,
    latest_arrival: u64,
    skills: Vec<Skill>,
    return_to_depot: bool,
}

impl VehicleTypeKey {
    fn new(vehicle: &Vehicle) -> Self {
        let mut skills: Vec<Skill> = vehicle.skills.iter().cloned().collect();
        skills.sort();

        let type_id = vehicle.vehicle_type.type_id();
        VehicleTypeKey {
            type_id: type_id
                .strip_suffix("_penalty")
                .filter(|_| vehicle.is_penalty)
                .unwrap_or(type_id)
                .to_owned(),
            start_location_id: vehicle.start_location_id,
            end_location_id: vehicle.end_location_id,
            earliest_start: vehicle.earliest_start.to_bits(),
            latest_arrival: vehicle.latest_arrival.to_bits(),
            skills,
            return_to_depot: vehicle.return_to_depot,
        }
    }
}

#[derive(Default)]
pub struct VehicleBuilder {
    external_id: Option<String>,
    vehicle_type: Option<Arc<VehicleType>>,
    start_location_id: Option<usize>,
    end_location_id: Option<usize>,
    earliest_start: Option<f64>,
    latest_arrival: Option<f64>,
    return_to_depot: Option<bool>,
    skills: Option<Vec<Skill>>,
    vehicle_break: Option<VehicleBreak>,
}

impl VehicleBuilder {
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut VehicleBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_vehicle_type(&mut self, vehicle_type: Arc<VehicleType>) -> &mut VehicleBuilder {
        self.vehicle_type = Some(vehicle_type);
        self
    }

    pub fn set_start_location_id(&mut self, location_id: usize) -> &mut VehicleBuilder {
        self.start_location_id = Some(location_id);
        self
    }

    /// Defaults to the start location.
    pub fn set_end_location_id(&mut self, location_id: usize) -> &mut VehicleBuilder {
        self.end_location_id = Some(location_id);
        self
    }

    pub fn set_earliest_start(&mut self, earliest_start: f64) -> &mut VehicleBuilder {
        self.earliest_start = Some(earliest_start);
        self
    }

    pub fn set_latest_arrival(&mut self, latest_arrival: f64) -> &mut VehicleBuilder {
        self.latest_arrival = Some(latest_arrival);
        self
    }

    pub fn set_return_to_depot(&mut self, return_to_depot: bool) -> &mut VehicleBuilder {
        self.return_to_depot = Some(return_to_depot);
        self
    }

    pub fn set_skills(&mut self, skills: Vec<Skill>) -> &mut VehicleBuilder {
        self.skills = Some(skills);
        self
    }

    pub fn set_break(&mut self, vehicle_break: VehicleBreak) -> &mut VehicleBuilder {
        self.vehicle_break = Some(vehicle_break);
        self
    }

    pub fn build(self) -> Result<Vehicle, ConfigError> {
        let start_location_id = self
            .start_location_id
            .ok_or(ConfigError::MissingField("start_location_id"))?;
        let earliest_start = self.earliest_start.unwrap_or(0.0);
        let latest_arrival = self.latest_arrival.unwrap_or(f64::MAX);

        if earliest_start.is_nan() || latest_arrival.is_nan() || earliest_start > latest_arrival {
            return Err(ConfigError::InvalidTimeWindow {
                start: earliest_start,
                end: latest_arrival,
            });
        }

        Ok(Vehicle {
            external_id: self.external_id.ok_or(ConfigError::MissingField("external_id"))?,
            vehicle_type: self
                .vehicle_type
                .ok_or(ConfigError::MissingField("vehicle_type"))?,
            start_location_id: LocationIdx::new(start_location_id),
            end_location_id: LocationIdx::new(self.end_location_id.unwrap_or(start_location_id)),
            earliest_start,
            latest_arrival,
            return_to_depot: self.return_to_depot.unwrap_or(true),
            skills: self.skills.unwrap_or_default().into_iter().collect(),
            vehicle_break: self.vehicle_break,
            break_job: None,
            is_penalty: false,
            type_identity: TypeIdentityIdx::default(),
        })
    }
}
