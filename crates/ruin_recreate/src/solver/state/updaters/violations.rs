use fxhash::FxHashSet;

use crate::{
    error::StateError,
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        solution::{activity::ActivityKind, route::VehicleRoute, route_id::RouteIdx},
        state::{state_key::StateKey, state_manager::StateManager},
    },
};

/// Flags a service delivery after a pickup (backhaul) and a shipment whose
/// legs are missing or out of order.
pub fn update_violations(
    _problem: &VehicleRoutingProblem,
    route_id: RouteIdx,
    route: &mut VehicleRoute,
    states: &mut StateManager,
) -> Result<(), StateError> {
    let mut picked_up = false;
    let mut backhaul_violated = false;
    let mut open_shipments = FxHashSet::default();
    let mut shipment_violated = false;

    for activity in route.activities() {
        match activity.kind() {
            ActivityKind::PickupService | ActivityKind::Service => picked_up = true,
            ActivityKind::DeliverService if picked_up => backhaul_violated = true,
            ActivityKind::PickupShipment => {
                open_shipments.insert(activity.job());
            }
            ActivityKind::DeliverShipment => {
                if !open_shipments.remove(&activity.job()) {
                    shipment_violated = true;
                }
            }
            _ => {}
        }
    }

    if !open_shipments.is_empty() {
        shipment_violated = true;
    }

    states.put_route_state(route_id, StateKey::BACKHAUL_VIOLATED, backhaul_violated)?;
    states.put_route_state(route_id, StateKey::SHIPMENT_VIOLATED, shipment_violated)
}
