use fxhash::FxHashSet;
use smallvec::{SmallVec, smallvec};

use crate::{
    define_index_newtype,
    problem::{
        capacity::Capacity, location::LocationIdx, service::Service, shipment::Shipment,
        skill::Skill, vehicle::VehicleIdx, vehicle_break::VehicleBreak,
    },
};

define_index_newtype!(JobIdx, Job);

// Stable index of a job activity, used to address activity states.
define_index_newtype!(ActivityIdx);

static NO_DEMAND: Capacity = Capacity::ZERO;

#[derive(Debug, Clone)]
pub enum Job {
    Service(Service),
    Pickup(Service),
    Delivery(Service),
    Shipment(Shipment),
    Break {
        vehicle_id: VehicleIdx,
        vehicle_break: VehicleBreak,
    },
}

impl Job {
    pub fn external_id(&self) -> &str {
        match self {
            Job::Service(service) | Job::Pickup(service) | Job::Delivery(service) => {
                service.external_id()
            }
            Job::Shipment(shipment) => shipment.external_id(),
            Job::Break { vehicle_break, .. } => vehicle_break.external_id(),
        }
    }

    pub fn demand(&self) -> &Capacity {
        match self {
            Job::Service(service) | Job::Pickup(service) | Job::Delivery(service) => {
                service.demand()
            }
            Job::Shipment(shipment) => shipment.demand(),
            Job::Break { .. } => &NO_DEMAND,
        }
    }

    pub fn skills(&self) -> Option<&FxHashSet<Skill>> {
        match self {
            Job::Service(service) | Job::Pickup(service) | Job::Delivery(service) => {
                Some(service.skills())
            }
            Job::Shipment(shipment) => Some(shipment.skills()),
            Job::Break { .. } => None,
        }
    }

    /// 1 is the most important, 10 the least.
    pub fn priority(&self) -> u8 {
        match self {
            Job::Service(service) | Job::Pickup(service) | Job::Delivery(service) => {
                service.priority()
            }
            Job::Shipment(shipment) => shipment.priority(),
            Job::Break { .. } => 1,
        }
    }

    pub fn location_ids(&self) -> SmallVec<[LocationIdx; 2]> {
        match self {
            Job::Service(service) | Job::Pickup(service) | Job::Delivery(service) => {
                smallvec![service.location_id()]
            }
            Job::Shipment(shipment) => smallvec![
                shipment.pickup().location_id(),
                shipment.delivery().location_id()
            ],
            Job::Break { vehicle_break, .. } => vehicle_break.location_id().into_iter().collect(),
        }
    }

    pub fn is_shipment(&self) -> bool {
        matches!(self, Job::Shipment(_))
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Job::Break { .. })
    }

    /// Vehicle a break job is bound to.
    pub fn break_vehicle(&self) -> Option<VehicleIdx> {
        match self {
            Job::Break { vehicle_id, .. } => Some(*vehicle_id),
            _ => None,
        }
    }

    pub fn num_activities(&self) -> usize {
        if self.is_shipment() { 2 } else { 1 }
    }
}
