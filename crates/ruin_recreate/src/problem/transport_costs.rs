use crate::problem::{driver::Driver, location::LocationIdx, vehicle::Vehicle};

pub type Distance = f64;
pub type Time = f64;
pub type Cost = f64;

/// Transport cost/time oracle. Implementations must return the same value for
/// the same arguments during a search run, but need not be metric.
pub trait TransportCosts: Send + Sync {
    fn transport_cost(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        departure_time: Time,
        driver: &Driver,
        vehicle: Option<&Vehicle>,
    ) -> Cost;

    fn transport_time(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        departure_time: Time,
        driver: &Driver,
        vehicle: Option<&Vehicle>,
    ) -> Time;

    /// Cost of a trip that must arrive at `to` at `arrival_time`.
    fn backward_transport_cost(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        arrival_time: Time,
        driver: &Driver,
        vehicle: Option<&Vehicle>,
    ) -> Cost {
        self.transport_cost(from, to, arrival_time, driver, vehicle)
    }

    /// Time of a trip that must arrive at `to` at `arrival_time`.
    fn backward_transport_time(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        arrival_time: Time,
        driver: &Driver,
        vehicle: Option<&Vehicle>,
    ) -> Time {
        self.transport_time(from, to, arrival_time, driver, vehicle)
    }

    /// Vehicle independent distance, used for neighborhoods and scoring.
    fn distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        self.transport_cost(from, to, 0.0, &Driver::NoDriver, None)
    }
}
