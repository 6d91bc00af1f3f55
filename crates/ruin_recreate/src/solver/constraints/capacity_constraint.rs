use crate::{
    error::StateError,
    problem::{capacity::Capacity, job::Job},
    solver::{
        insertion_context::{ActivityContext, JobInsertionContext},
        solution::activity::{ActivityKind, TourActivity},
        state::state_key::StateKey,
    },
};

use super::constraint::{
    ConstraintStatus, HardActivityConstraint, HardRouteConstraint, InfeasibilityReason,
};

const NOT_FULFILLED: ConstraintStatus = ConstraintStatus::NotFulfilled(InfeasibilityReason::Capacity);
const NOT_FULFILLED_BREAK: ConstraintStatus =
    ConstraintStatus::NotFulfilledBreak(InfeasibilityReason::Capacity);

/// Whole-route load check: what the vehicle carries when leaving or coming
/// back must still fit once the job is added.
pub struct CapacityRouteConstraint;

impl HardRouteConstraint for CapacityRouteConstraint {
    fn name(&self) -> &'static str {
        "capacity"
    }

    fn fulfilled(&self, context: &JobInsertionContext) -> Result<ConstraintStatus, StateError> {
        let capacity = context.new_vehicle.capacity();

        if context.is_vehicle_switch() {
            let max_load = context.route_state::<Capacity>(StateKey::MAX_LOAD)?;
            if !capacity.satisfies_demand(max_load) {
                return Ok(NOT_FULFILLED);
            }
        }

        let fits = match context.problem.job(context.job_id) {
            Job::Delivery(service) => {
                let load = context.route_state::<Capacity>(StateKey::LOAD_AT_BEGINNING)?;
                capacity.satisfies_demand(&(load + service.demand()))
            }
            Job::Pickup(service) | Job::Service(service) => {
                let load = context.route_state::<Capacity>(StateKey::LOAD_AT_END)?;
                capacity.satisfies_demand(&(load + service.demand()))
            }
            Job::Shipment(shipment) => capacity.satisfies_demand(shipment.demand()),
            Job::Break { .. } => true,
        };

        Ok(if fits {
            ConstraintStatus::Fulfilled
        } else {
            NOT_FULFILLED
        })
    }
}

/// Load check at the insertion position.
pub struct CapacityActivityConstraint;

impl CapacityActivityConstraint {
    fn load_after<'a>(
        context: &JobInsertionContext<'a>,
        activity: &TourActivity,
    ) -> Result<&'a Capacity, StateError> {
        if activity.is_start() {
            context.route_state(StateKey::LOAD_AT_BEGINNING)
        } else {
            context.activity_state(activity, StateKey::LOAD)
        }
    }
}

impl HardActivityConstraint for CapacityActivityConstraint {
    fn name(&self) -> &'static str {
        "capacity"
    }

    fn fulfilled(
        &self,
        context: &JobInsertionContext,
        activity_context: &ActivityContext,
    ) -> Result<ConstraintStatus, StateError> {
        let capacity = context.new_vehicle.capacity();
        let previous = activity_context.previous;
        let new = activity_context.new;

        match new.kind() {
            ActivityKind::PickupService | ActivityKind::Service => {
                let future_max_load = if previous.is_start() {
                    context.route_state::<Capacity>(StateKey::MAX_LOAD)?
                } else {
                    context.activity_state::<Capacity>(previous, StateKey::FUTURE_MAX_LOAD)?
                };

                if !capacity.satisfies_demand(&(future_max_load + new.size())) {
                    return Ok(NOT_FULFILLED);
                }
            }
            ActivityKind::DeliverService => {
                let past_max_load = if previous.is_start() {
                    context.route_state::<Capacity>(StateKey::LOAD_AT_BEGINNING)?
                } else {
                    context.activity_state::<Capacity>(previous, StateKey::PAST_MAX_LOAD)?
                };

                if !capacity.satisfies_demand(&(past_max_load + &new.size().abs())) {
                    return Ok(NOT_FULFILLED_BREAK);
                }
            }
            ActivityKind::PickupShipment => {
                let load = Self::load_after(context, previous)?;
                if !capacity.satisfies_demand(&(load + new.size())) {
                    return Ok(NOT_FULFILLED);
                }
            }
            ActivityKind::DeliverShipment => {
                // Every activity between the pickup and this delivery carries the shipment.
                let base = activity_context.pickup_previous.unwrap_or(previous);
                let load = Self::load_after(context, base)?;
                if !capacity.satisfies_demand(&(load + &new.size().abs())) {
                    return Ok(NOT_FULFILLED_BREAK);
                }
            }
            ActivityKind::Break | ActivityKind::Start | ActivityKind::End => {}
        }

        Ok(ConstraintStatus::Fulfilled)
    }
}
