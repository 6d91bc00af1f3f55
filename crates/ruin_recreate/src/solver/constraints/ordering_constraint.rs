use crate::{
    error::StateError,
    solver::{
        insertion_context::{ActivityContext, JobInsertionContext},
        solution::activity::ActivityKind,
    },
};

use super::constraint::{ConstraintStatus, HardActivityConstraint, InfeasibilityReason};

const NOT_FULFILLED: ConstraintStatus =
    ConstraintStatus::NotFulfilled(InfeasibilityReason::Ordering);
const NOT_FULFILLED_BREAK: ConstraintStatus =
    ConstraintStatus::NotFulfilledBreak(InfeasibilityReason::Ordering);

/// Pickup before delivery for shipments, and optionally every service
/// delivery before any pickup (backhauls).
pub struct OrderingConstraint {
    deliveries_first: bool,
}

impl OrderingConstraint {
    pub fn new(deliveries_first: bool) -> Self {
        OrderingConstraint { deliveries_first }
    }

    fn deliveries_first_status(
        previous: ActivityKind,
        new: ActivityKind,
        next: ActivityKind,
    ) -> ConstraintStatus {
        match (new, previous, next) {
            (
                ActivityKind::DeliverService,
                ActivityKind::PickupService
                | ActivityKind::Service
                | ActivityKind::PickupShipment
                | ActivityKind::DeliverShipment,
                _,
            ) => NOT_FULFILLED_BREAK,
            (
                ActivityKind::PickupService
                | ActivityKind::Service
                | ActivityKind::PickupShipment
                | ActivityKind::DeliverShipment,
                _,
                ActivityKind::DeliverService,
            ) => NOT_FULFILLED,
            _ => ConstraintStatus::Fulfilled,
        }
    }
}

impl HardActivityConstraint for OrderingConstraint {
    fn name(&self) -> &'static str {
        "ordering"
    }

    fn fulfilled(
        &self,
        _context: &JobInsertionContext,
        activity_context: &ActivityContext,
    ) -> Result<ConstraintStatus, StateError> {
        let new = activity_context.new;

        if new.kind() == ActivityKind::DeliverShipment
            && activity_context
                .pickup_position
                .is_none_or(|pickup| pickup > activity_context.position)
        {
            return Ok(NOT_FULFILLED_BREAK);
        }

        if self.deliveries_first {
            return Ok(Self::deliveries_first_status(
                activity_context.previous.kind(),
                new.kind(),
                activity_context.next.kind(),
            ));
        }

        Ok(ConstraintStatus::Fulfilled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deliveries_first() {
        assert_eq!(
            OrderingConstraint::deliveries_first_status(
                ActivityKind::Service,
                ActivityKind::DeliverService,
                ActivityKind::End
            ),
            NOT_FULFILLED_BREAK
        );
        assert_eq!(
            OrderingConstraint::deliveries_first_status(
                ActivityKind::Start,
                ActivityKind::PickupService,
                ActivityKind::DeliverService
            ),
            NOT_FULFILLED
        );
        assert_eq!(
            OrderingConstraint::deliveries_first_status(
                ActivityKind::DeliverService,
                ActivityKind::DeliverService,
                ActivityKind::PickupService
            ),
            ConstraintStatus::Fulfilled
        );
    }
}
