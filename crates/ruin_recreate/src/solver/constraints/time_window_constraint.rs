use crate::{
    error::StateError,
    solver::insertion_context::{ActivityContext, JobInsertionContext},
};

use super::constraint::{ConstraintStatus, HardActivityConstraint, InfeasibilityReason};

const NOT_FULFILLED: ConstraintStatus =
    ConstraintStatus::NotFulfilled(InfeasibilityReason::TimeWindow);
const NOT_FULFILLED_BREAK: ConstraintStatus =
    ConstraintStatus::NotFulfilledBreak(InfeasibilityReason::TimeWindow);

/// Checks the new activity and the activity after it against their latest
/// operation starts, which already account for everything later in the route.
pub struct TimeWindowConstraint;

impl HardActivityConstraint for TimeWindowConstraint {
    fn name(&self) -> &'static str {
        "time_window"
    }

    fn fulfilled(
        &self,
        context: &JobInsertionContext,
        activity_context: &ActivityContext,
    ) -> Result<ConstraintStatus, StateError> {
        let vehicle = context.new_vehicle;
        let driver = context.new_driver;
        let transport_costs = context.problem.transport_costs();
        let activity_costs = context.problem.activity_costs();

        let ActivityContext {
            previous,
            new,
            next,
            previous_end_time,
            ..
        } = *activity_context;

        let latest_at_next = match activity_context.next_position {
            Some(position) => context.latest_operation_start(position)?,
            None if vehicle.return_to_depot() => vehicle.latest_arrival(),
            None => f64::MAX,
        };

        if previous_end_time > latest_at_next {
            return Ok(NOT_FULFILLED_BREAK);
        }
        if new.earliest_start() > latest_at_next {
            return Ok(NOT_FULFILLED_BREAK);
        }
        if new.latest_start() < previous.earliest_start() {
            return Ok(NOT_FULFILLED_BREAK);
        }

        let arrival_at_new = previous_end_time
            + transport_costs.transport_time(
                previous.location_id(),
                new.location_id(),
                previous_end_time,
                driver,
                Some(vehicle),
            );
        let duration = activity_costs.activity_duration(previous, new, arrival_at_new, driver, Some(vehicle));

        let latest_arrival_at_new = new.latest_start().min(
            latest_at_next
                - transport_costs.backward_transport_time(
                    new.location_id(),
                    next.location_id(),
                    latest_at_next,
                    driver,
                    Some(vehicle),
                )
                - duration,
        );
        if arrival_at_new > latest_arrival_at_new {
            return Ok(NOT_FULFILLED);
        }

        if next.is_end() && !vehicle.return_to_depot() {
            return Ok(ConstraintStatus::Fulfilled);
        }

        let end_at_new = arrival_at_new.max(new.earliest_start()) + duration;
        let arrival_at_next = end_at_new
            + transport_costs.transport_time(
                new.location_id(),
                next.location_id(),
                end_at_new,
                driver,
                Some(vehicle),
            );
        if arrival_at_next > latest_at_next {
            return Ok(NOT_FULFILLED);
        }

        Ok(ConstraintStatus::Fulfilled)
    }
}
