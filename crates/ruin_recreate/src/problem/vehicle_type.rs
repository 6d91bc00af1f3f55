use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, problem::capacity::Capacity};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct VehicleCosts {
    pub fixed: f64,
    pub per_distance: f64,
    pub per_transport_time: f64,
    pub per_waiting_time: f64,
    pub per_service_time: f64,
}

impl Default for VehicleCosts {
    fn default() -> Self {
        VehicleCosts {
            fixed: 0.0,
            per_distance: 1.0,
            per_transport_time: 0.0,
            per_waiting_time: 0.0,
            per_service_time: 0.0,
        }
    }
}

impl VehicleCosts {
    pub fn scale(&self, factor: f64) -> VehicleCosts {
        VehicleCosts {
            fixed: self.fixed * factor,
            per_distance: self.per_distance * factor,
            per_transport_time: self.per_transport_time * factor,
            per_waiting_time: self.per_waiting_time * factor,
            per_service_time: self.per_service_time * factor,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VehicleType {
    type_id: String,
    capacity: Capacity,
    costs: VehicleCosts,
    max_velocity: f64,
}

impl VehicleType {
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn capacity(&self) -> &Capacity {
        &self.capacity
    }

    pub fn costs(&self) -> &VehicleCosts {
        &self.costs
    }

    pub fn max_velocity(&self) -> f64 {
        self.max_velocity
    }

    /// Same type with every cost multiplied by `factor`.
    pub fn penalty_type(&self, factor: f64) -> VehicleType {
        VehicleType {
            type_id: format!("{}_penalty", self.type_id),
            capacity: self.capacity.clone(),
            costs: self.costs.scale(factor),
            max_velocity: self.max_velocity,
        }
    }
}

#[derive(Default)]
pub struct VehicleTypeBuilder {
    type_id: Option<String>,
    capacity: Option<Capacity>,
    costs: Option<VehicleCosts>,
    max_velocity: Option<f64>,
}

impl VehicleTypeBuilder {
    pub fn set_type_id(&mut self, type_id: impl Into<String>) -> &mut VehicleTypeBuilder {
        self.type_id = Some(type_id.into());
        self
    }

    pub fn set_capacity(&mut self, capacity: Capacity) -> &mut VehicleTypeBuilder {
        self.capacity = Some(capacity);
        self
    }

    pub fn set_costs(&mut self, costs: VehicleCosts) -> &mut VehicleTypeBuilder {
        self.costs = Some(costs);
        self
    }

    pub fn set_max_velocity(&mut self, max_velocity: f64) -> &mut VehicleTypeBuilder {
        self.max_velocity = Some(max_velocity);
        self
    }

    pub fn build(self) -> Result<VehicleType, ConfigError> {
        let costs = self.costs.unwrap_or_default();
        let all_costs = [
            costs.fixed,
            costs.per_distance,
            costs.per_transport_time,
            costs.per_waiting_time,
            costs.per_service_time,
        ];
        if all_costs.iter().any(|cost| *cost < 0.0 || cost.is_nan()) {
            return Err(ConfigError::InvalidParameter {
                name: "costs",
                reason: "vehicle costs must be non-negative".to_owned(),
            });
        }

        let max_velocity = self.max_velocity.unwrap_or(f64::MAX);
        if max_velocity <= 0.0 || max_velocity.is_nan() {
            return Err(ConfigError::InvalidParameter {
                name: "max_velocity",
                reason: format!("must be positive, got {max_velocity}"),
            });
        }

        Ok(VehicleType {
            type_id: self.type_id.ok_or(ConfigError::MissingField("type_id"))?,
            capacity: self.capacity.unwrap_or_default(),
            costs,
            max_velocity,
        })
    }
}
