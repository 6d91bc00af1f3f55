use crate::{
    problem::{
        driver::Driver,
        transport_costs::{Cost, Time},
        vehicle::Vehicle,
    },
    solver::solution::activity::TourActivity,
};

/// Activity cost/duration oracle.
pub trait ActivityCosts: Send + Sync {
    fn activity_cost(
        &self,
        activity: &TourActivity,
        arrival_time: Time,
        driver: &Driver,
        vehicle: Option<&Vehicle>,
    ) -> Cost;

    fn activity_duration(
        &self,
        previous: &TourActivity,
        activity: &TourActivity,
        arrival_time: Time,
        driver: &Driver,
        vehicle: Option<&Vehicle>,
    ) -> Time;
}

/// Charges waiting before the window opens and time spent serving.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitingTimeCosts;

impl ActivityCosts for WaitingTimeCosts {
    fn activity_cost(
        &self,
        activity: &TourActivity,
        arrival_time: Time,
        _driver: &Driver,
        vehicle: Option<&Vehicle>,
    ) -> Cost {
        let Some(vehicle) = vehicle else {
            return 0.0;
        };

        let costs = vehicle.vehicle_type().costs();
        let waiting = (activity.earliest_start() - arrival_time).max(0.0);

        costs.per_waiting_time * waiting + costs.per_service_time * activity.operation_time()
    }

    fn activity_duration(
        &self,
        _previous: &TourActivity,
        activity: &TourActivity,
        _arrival_time: Time,
        _driver: &Driver,
        _vehicle: Option<&Vehicle>,
    ) -> Time {
        activity.operation_time()
    }
}
