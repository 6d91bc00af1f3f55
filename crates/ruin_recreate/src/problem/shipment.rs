use fxhash::FxHashSet;
use serde::Serialize;

use crate::{
    error::ConfigError,
    problem::{
        capacity::Capacity,
        location::LocationIdx,
        service::{DEFAULT_PRIORITY, validate_priority},
        skill::Skill,
        time_window::{TimeWindow, TimeWindows},
    },
};

#[derive(Serialize, Debug, Clone)]
pub struct ShipmentLocation {
    location_id: LocationIdx,
    duration: f64,
    time_windows: TimeWindows,
}

impl ShipmentLocation {
    pub fn new(location_id: usize, duration: f64, time_windows: Vec<TimeWindow>) -> Self {
        ShipmentLocation {
            location_id: LocationIdx::new(location_id),
            duration,
            time_windows: time_windows.into_iter().collect(),
        }
    }

    pub fn location_id(&self) -> LocationIdx {
        self.location_id
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn time_windows(&self) -> &TimeWindows {
        &self.time_windows
    }
}

/// Paired pickup and delivery carried by the same vehicle.
#[derive(Serialize, Debug, Clone)]
pub struct Shipment {
    external_id: String,
    demand: Capacity,
    pickup: ShipmentLocation,
    delivery: ShipmentLocation,
    skills: FxHashSet<Skill>,
    priority: u8,
}

impl Shipment {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn demand(&self) -> &Capacity {
        &self.demand
    }

    pub fn pickup(&self) -> &ShipmentLocation {
        &self.pickup
    }

    pub fn delivery(&self) -> &ShipmentLocation {
        &self.delivery
    }

    pub fn skills(&self) -> &FxHashSet<Skill> {
        &self.skills
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }
}

#[derive(Default)]
pub struct ShipmentBuilder {
    external_id: Option<String>,
    demand: Option<Capacity>,
    pickup: Option<ShipmentLocation>,
    delivery: Option<ShipmentLocation>,
    skills: Option<Vec<Skill>>,
    priority: Option<u8>,
}

impl ShipmentBuilder {
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut ShipmentBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_demand(&mut self, demand: Capacity) -> &mut ShipmentBuilder {
        self.demand = Some(demand);
        self
    }

    pub fn set_pickup(&mut self, pickup: ShipmentLocation) -> &mut ShipmentBuilder {
        self.pickup = Some(pickup);
        self
    }

    pub fn set_delivery(&mut self, delivery: ShipmentLocation) -> &mut ShipmentBuilder {
        self.delivery = Some(delivery);
        self
    }

    pub fn set_skills(&mut self, skills: Vec<Skill>) -> &mut ShipmentBuilder {
        self.skills = Some(skills);
        self
    }

    pub fn set_priority(&mut self, priority: u8) -> &mut ShipmentBuilder {
        self.priority = Some(priority);
        self
    }

    pub fn build(self) -> Result<Shipment, ConfigError> {
        let pickup = self.pickup.ok_or(ConfigError::MissingField("pickup"))?;
        let delivery = self.delivery.ok_or(ConfigError::MissingField("delivery"))?;

        for duration in [pickup.duration, delivery.duration] {
            if duration < 0.0 || duration.is_nan() {
                return Err(ConfigError::InvalidParameter {
                    name: "duration",
                    reason: format!("shipment duration must be non-negative, got {duration}"),
                });
            }
        }

        Ok(Shipment {
            external_id: self.external_id.ok_or(ConfigError::MissingField("external_id"))?,
            demand: self.demand.unwrap_or_default(),
            pickup,
            delivery,
            skills: self.skills.unwrap_or_default().into_iter().collect(),
            priority: validate_priority(self.priority.unwrap_or(DEFAULT_PRIORITY))?,
        })
    }
}
