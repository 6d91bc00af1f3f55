use smallvec::{SmallVec, smallvec};

use crate::{
    error::StateError,
    problem::{
        job::JobIdx,
        transport_costs::Cost,
        vehicle::VehicleIdx,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        constraints::{
            constraint::{ConstraintStatus, FailureReasons, InfeasibilityReason},
            constraint_manager::ConstraintManager,
        },
        insertion::{InsertionData, InsertionResult, InsertionRoute},
        insertion_context::{ActivityContext, JobInsertionContext},
        noise::NoiseGenerator,
        solution::{
            activity::TourActivity, route::VehicleRoute, route_id::RouteIdx,
            working_solution::WorkingSolution,
        },
        state::{
            state_key::StateKey, state_manager::StateManager,
            updaters::{is_floating_break, time_windows::compute_latest_starts},
        },
    },
};

/// Finds the cheapest feasible position of one job in one route for one vehicle.
///
/// Reads the route and the state manager only, so any number of calculations
/// may run in parallel between two state updates.
pub struct JobInsertionCalculator<'a> {
    pub problem: &'a VehicleRoutingProblem,
    pub states: &'a StateManager,
    pub constraints: &'a ConstraintManager,
    pub noise: Option<&'a NoiseGenerator>,
    pub completeness: f64,
}

struct Candidate {
    cost: Cost,
    activities: SmallVec<[(usize, TourActivity); 2]>,
}

impl<'a> JobInsertionCalculator<'a> {
    pub fn calculate(
        &self,
        route_id: Option<RouteIdx>,
        route: &VehicleRoute,
        job_id: JobIdx,
        vehicle_id: VehicleIdx,
    ) -> Result<InsertionResult, StateError> {
        let vehicle = self.problem.vehicle(vehicle_id);
        let route_vehicle_id = route.vehicle_id();
        let is_switch = !route.is_empty() && vehicle_id != route_vehicle_id;

        let switched;
        let route = if is_switch {
            switched = route.with_vehicle(self.problem, vehicle_id);
            &switched
        } else {
            route
        };
        let latest_starts =
            is_switch.then(|| compute_latest_starts(self.problem, route, vehicle));

        let context = JobInsertionContext {
            problem: self.problem,
            states: self.states,
            route_id,
            route,
            route_vehicle_id,
            job_id,
            new_vehicle_id: vehicle_id,
            new_vehicle: vehicle,
            new_driver: route.driver(),
            departure_time: vehicle.earliest_start(),
            vehicle_latest_starts: latest_starts.as_deref(),
            noise: self.noise,
            completeness: self.completeness,
        };

        if let Some(reason) = self.constraints.fulfilled_route(&context)?.reason() {
            return Ok(InsertionResult::failed_with(reason));
        }

        let mut route_cost = self.constraints.soft_route_cost(&context)?;
        if is_switch && let Some(route_id) = route_id {
            let Some(switched_cost) = scheduled_route_cost(self.problem, route) else {
                return Ok(InsertionResult::failed_with(InfeasibilityReason::TimeWindow));
            };
            let current = *self.states.route_state::<f64>(route_id, StateKey::COSTS)?;
            route_cost += switched_cost - current;
        }

        let mut reasons = FailureReasons::default();
        let candidate = match self.problem.job_activities(job_id) {
            [activity] => self.best_single_position(&context, activity, &mut reasons)?,
            [pickup, delivery] => {
                self.best_shipment_positions(&context, pickup, delivery, &mut reasons)?
            }
            _ => None,
        };

        Ok(match candidate {
            Some(candidate) => InsertionResult::Success(InsertionData {
                job_id,
                route: route_id.map_or(InsertionRoute::New, InsertionRoute::Existing),
                vehicle_id,
                cost: route_cost + candidate.cost,
                activities: candidate.activities,
            }),
            None => InsertionResult::Failure(reasons),
        })
    }

    /// Same as [`Self::calculate`] for a route of `solution`, or a new route when `route_id` is `None`.
    pub fn calculate_in(
        &self,
        solution: &WorkingSolution,
        route_id: Option<RouteIdx>,
        job_id: JobIdx,
        vehicle_id: VehicleIdx,
    ) -> Result<InsertionResult, StateError> {
        match route_id {
            Some(route_id) => self.calculate(Some(route_id), solution.route(route_id), job_id, vehicle_id),
            None => {
                let route = VehicleRoute::empty(self.problem, vehicle_id);
                self.calculate(None, &route, job_id, vehicle_id)
            }
        }
    }

    fn best_single_position(
        &self,
        context: &JobInsertionContext,
        template: &TourActivity,
        reasons: &mut FailureReasons,
    ) -> Result<Option<Candidate>, StateError> {
        let route = context.route;
        let time_windows = self.problem.activity_time_windows(template);
        let mut best: Option<Candidate> = None;
        let mut previous_end_time = context.departure_time;

        for position in 0..=route.len() {
            let previous = route.previous(position);
            let next = route.next(position);
            let mut candidate = template.clone();
            if is_floating_break(self.problem, &candidate) {
                candidate.set_location_id(previous.location_id());
            }

            let mut all_break = true;
            for time_window in time_windows {
                candidate.set_time_window(*time_window);
                let activity_context = ActivityContext {
                    previous,
                    new: &candidate,
                    next,
                    next_position: (position < route.len()).then_some(position),
                    position,
                    previous_end_time,
                    pickup_position: None,
                    pickup_previous: None,
                };

                match self.constraints.fulfilled_activity(context, &activity_context)? {
                    ConstraintStatus::Fulfilled => {
                        all_break = false;
                        let cost = activity_insertion_cost(context, &activity_context)
                            + self.constraints.soft_activity_cost(context, &activity_context)?;
                        if best.as_ref().is_none_or(|best| cost < best.cost) {
                            best = Some(Candidate {
                                cost,
                                activities: smallvec![(position, candidate.clone())],
                            });
                        }
                    }
                    ConstraintStatus::NotFulfilled(reason) => {
                        all_break = false;
                        reasons.insert(reason);
                    }
                    ConstraintStatus::NotFulfilledBreak(reason) => reasons.insert(reason),
                }
            }

            if all_break || position == route.len() {
                break;
            }

            previous_end_time = end_time_after(context, previous, next, previous_end_time).1;
        }

        Ok(best)
    }

    fn best_shipment_positions(
        &self,
        context: &JobInsertionContext,
        pickup_template: &TourActivity,
        delivery_template: &TourActivity,
        reasons: &mut FailureReasons,
    ) -> Result<Option<Candidate>, StateError> {
        let route = context.route;
        let pickup_windows = self.problem.activity_time_windows(pickup_template);
        let delivery_windows = self.problem.activity_time_windows(delivery_template);
        let mut best: Option<Candidate> = None;
        let mut previous_end_time = context.departure_time;

        for pickup_position in 0..=route.len() {
            let previous = route.previous(pickup_position);
            let next = route.next(pickup_position);
            let mut pickup = pickup_template.clone();

            let mut all_break = true;
            for pickup_window in pickup_windows {
                pickup.set_time_window(*pickup_window);
                let pickup_context = ActivityContext {
                    previous,
                    new: &pickup,
                    next,
                    next_position: (pickup_position < route.len()).then_some(pickup_position),
                    position: pickup_position,
                    previous_end_time,
                    pickup_position: None,
                    pickup_previous: None,
                };

                match self.constraints.fulfilled_activity(context, &pickup_context)? {
                    ConstraintStatus::Fulfilled => all_break = false,
                    ConstraintStatus::NotFulfilled(reason) => {
                        all_break = false;
                        reasons.insert(reason);
                        continue;
                    }
                    ConstraintStatus::NotFulfilledBreak(reason) => {
                        reasons.insert(reason);
                        continue;
                    }
                }

                let pickup_cost = activity_insertion_cost(context, &pickup_context)
                    + self.constraints.soft_activity_cost(context, &pickup_context)?;
                let (_, pickup_end_time) = end_time_after(context, previous, &pickup, previous_end_time);

                let mut delivery_previous: &TourActivity = &pickup;
                let mut delivery_previous_end_time = pickup_end_time;
                for delivery_position in pickup_position..=route.len() {
                    let delivery_next = route.next(delivery_position);
                    let mut delivery = delivery_template.clone();

                    let mut delivery_all_break = true;
                    for delivery_window in delivery_windows {
                        delivery.set_time_window(*delivery_window);
                        let delivery_context = ActivityContext {
                            previous: delivery_previous,
                            new: &delivery,
                            next: delivery_next,
                            next_position: (delivery_position < route.len())
                                .then_some(delivery_position),
                            position: delivery_position,
                            previous_end_time: delivery_previous_end_time,
                            pickup_position: Some(pickup_position),
                            pickup_previous: (delivery_position == pickup_position)
                                .then_some(previous),
                        };

                        match self.constraints.fulfilled_activity(context, &delivery_context)? {
                            ConstraintStatus::Fulfilled => {
                                delivery_all_break = false;
                                let cost = pickup_cost
                                    + activity_insertion_cost(context, &delivery_context)
                                    + self
                                        .constraints
                                        .soft_activity_cost(context, &delivery_context)?;
                                if best.as_ref().is_none_or(|best| cost < best.cost) {
                                    best = Some(Candidate {
                                        cost,
                                        activities: smallvec![
                                            (pickup_position, pickup.clone()),
                                            (delivery_position, delivery.clone())
                                        ],
                                    });
                                }
                            }
                            ConstraintStatus::NotFulfilled(reason) => {
                                delivery_all_break = false;
                                reasons.insert(reason);
                            }
                            ConstraintStatus::NotFulfilledBreak(reason) => reasons.insert(reason),
                        }
                    }

                    if delivery_all_break || delivery_position == route.len() {
                        break;
                    }

                    // The activity now carries the shipment and starts later.
                    let (arrival, end) = end_time_after(
                        context,
                        delivery_previous,
                        delivery_next,
                        delivery_previous_end_time,
                    );
                    if arrival > context.latest_operation_start(delivery_position)? {
                        reasons.insert(InfeasibilityReason::TimeWindow);
                        break;
                    }
                    delivery_previous = delivery_next;
                    delivery_previous_end_time = end;
                }
            }

            if all_break || pickup_position == route.len() {
                break;
            }

            previous_end_time = end_time_after(context, previous, next, previous_end_time).1;
        }

        Ok(best)
    }
}

/// Arrival at and departure from `activity` when leaving `previous` at `departure`.
fn end_time_after(
    context: &JobInsertionContext,
    previous: &TourActivity,
    activity: &TourActivity,
    departure: f64,
) -> (f64, f64) {
    let arrival = departure
        + context.problem.transport_costs().transport_time(
            previous.location_id(),
            activity.location_id(),
            departure,
            context.new_driver,
            Some(context.new_vehicle),
        );
    let duration = context.problem.activity_costs().activity_duration(
        previous,
        activity,
        arrival,
        context.new_driver,
        Some(context.new_vehicle),
    );

    (arrival, arrival.max(activity.earliest_start()) + duration)
}

/// Change of transport and activity costs when `new` goes between `previous` and `next`.
pub fn activity_insertion_cost(
    context: &JobInsertionContext,
    activity_context: &ActivityContext,
) -> Cost {
    let transport_costs = context.problem.transport_costs();
    let activity_costs = context.problem.activity_costs();
    let vehicle = Some(context.new_vehicle);
    let driver = context.new_driver;
    let ActivityContext {
        previous,
        new,
        next,
        previous_end_time,
        ..
    } = *activity_context;

    let previous_to_new = transport_costs.transport_cost(
        previous.location_id(),
        new.location_id(),
        previous_end_time,
        driver,
        vehicle,
    );
    let (new_arrival, new_end) = end_time_after(context, previous, new, previous_end_time);
    let new_activity_cost = activity_costs.activity_cost(new, new_arrival, driver, vehicle);

    if next.is_end() && !context.new_vehicle.return_to_depot() {
        return previous_to_new + new_activity_cost;
    }

    let new_to_next =
        transport_costs.transport_cost(new.location_id(), next.location_id(), new_end, driver, vehicle);
    let (next_arrival, _) = end_time_after(context, new, next, new_end);
    let next_activity_cost = activity_costs.activity_cost(next, next_arrival, driver, vehicle);

    let previous_to_next = transport_costs.transport_cost(
        previous.location_id(),
        next.location_id(),
        previous_end_time,
        driver,
        vehicle,
    );
    let (old_next_arrival, _) = end_time_after(context, previous, next, previous_end_time);
    let old_next_activity_cost = activity_costs.activity_cost(next, old_next_arrival, driver, vehicle);

    previous_to_new + new_to_next + new_activity_cost + next_activity_cost
        - previous_to_next
        - old_next_activity_cost
}

/// Variable cost of `route` scheduled from scratch from its vehicle's earliest
/// start, or `None` when an activity, or the return to the depot, is reached too late.
pub fn scheduled_route_cost(problem: &VehicleRoutingProblem, route: &VehicleRoute) -> Option<Cost> {
    let transport_costs = problem.transport_costs();
    let activity_costs = problem.activity_costs();
    let vehicle = route.vehicle(problem);
    let driver = route.driver();

    let mut total = 0.0;
    let mut previous = route.start();
    let mut departure = vehicle.earliest_start();
    for activity in route.activities() {
        let arrival = departure
            + transport_costs.transport_time(
                previous.location_id(),
                activity.location_id(),
                departure,
                driver,
                Some(vehicle),
            );
        if arrival > activity.latest_start() {
            return None;
        }

        total += transport_costs.transport_cost(
            previous.location_id(),
            activity.location_id(),
            departure,
            driver,
            Some(vehicle),
        ) + activity_costs.activity_cost(activity, arrival, driver, Some(vehicle));

        departure = arrival.max(activity.earliest_start())
            + activity_costs.activity_duration(previous, activity, arrival, driver, Some(vehicle));
        previous = activity;
    }

    if vehicle.return_to_depot() {
        let arrival = departure
            + transport_costs.transport_time(
                previous.location_id(),
                vehicle.end_location_id(),
                departure,
                driver,
                Some(vehicle),
            );
        if arrival > vehicle.latest_arrival() {
            return None;
        }

        total += transport_costs.transport_cost(
            previous.location_id(),
            vehicle.end_location_id(),
            departure,
            driver,
            Some(vehicle),
        );
    }

    Some(total)
}
