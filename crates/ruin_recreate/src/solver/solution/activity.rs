use serde::Serialize;

use crate::problem::{
    capacity::Capacity,
    job::{ActivityIdx, JobIdx},
    location::LocationIdx,
    time_window::TimeWindow,
    vehicle::Vehicle,
};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Start,
    End,
    PickupService,
    DeliverService,
    Service,
    PickupShipment,
    DeliverShipment,
    Break,
}

impl ActivityKind {
    /// Activities loading goods onto the vehicle.
    pub fn is_pickup(&self) -> bool {
        matches!(
            self,
            ActivityKind::PickupService | ActivityKind::Service | ActivityKind::PickupShipment
        )
    }

    pub fn is_delivery(&self) -> bool {
        matches!(
            self,
            ActivityKind::DeliverService | ActivityKind::DeliverShipment
        )
    }

    pub fn is_shipment(&self) -> bool {
        matches!(
            self,
            ActivityKind::PickupShipment | ActivityKind::DeliverShipment
        )
    }
}

/// Stop of a route. `arrival_time` and `end_time` are derived and only valid
/// after the state updaters ran on the route.
#[derive(Debug, Clone)]
pub struct TourActivity {
    kind: ActivityKind,
    job: Option<JobIdx>,
    index: Option<ActivityIdx>,
    location_id: LocationIdx,
    size: Capacity,
    operation_time: f64,
    time_window: TimeWindow,
    arrival_time: f64,
    end_time: f64,
}

impl PartialEq for TourActivity {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.job == other.job
    }
}

impl TourActivity {
    pub fn start(vehicle: &Vehicle) -> Self {
        TourActivity {
            kind: ActivityKind::Start,
            job: None,
            index: None,
            location_id: vehicle.start_location_id(),
            size: Capacity::ZERO,
            operation_time: 0.0,
            time_window: TimeWindow::new_unchecked(vehicle.earliest_start(), f64::MAX),
            arrival_time: vehicle.earliest_start(),
            end_time: vehicle.earliest_start(),
        }
    }

    pub fn end(vehicle: &Vehicle) -> Self {
        TourActivity {
            kind: ActivityKind::End,
            job: None,
            index: None,
            location_id: vehicle.end_location_id(),
            size: Capacity::ZERO,
            operation_time: 0.0,
            time_window: TimeWindow::new_unchecked(0.0, vehicle.latest_arrival()),
            arrival_time: 0.0,
            end_time: 0.0,
        }
    }

    pub(crate) fn job_activity(
        kind: ActivityKind,
        job: JobIdx,
        index: ActivityIdx,
        location_id: LocationIdx,
        size: Capacity,
        operation_time: f64,
    ) -> Self {
        TourActivity {
            kind,
            job: Some(job),
            index: Some(index),
            location_id,
            size,
            operation_time,
            time_window: TimeWindow::default(),
            arrival_time: 0.0,
            end_time: 0.0,
        }
    }

    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn job(&self) -> Option<JobIdx> {
        self.job
    }

    pub fn index(&self) -> Option<ActivityIdx> {
        self.index
    }

    pub fn location_id(&self) -> LocationIdx {
        self.location_id
    }

    /// Signed load delta: positive when loading, negative when unloading.
    pub fn size(&self) -> &Capacity {
        &self.size
    }

    pub fn operation_time(&self) -> f64 {
        self.operation_time
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    pub fn earliest_start(&self) -> f64 {
        self.time_window.start()
    }

    pub fn latest_start(&self) -> f64 {
        self.time_window.end()
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn is_start(&self) -> bool {
        self.kind == ActivityKind::Start
    }

    pub fn is_end(&self) -> bool {
        self.kind == ActivityKind::End
    }

    pub(crate) fn set_arrival_time(&mut self, arrival_time: f64) {
        self.arrival_time = arrival_time;
    }

    pub(crate) fn set_end_time(&mut self, end_time: f64) {
        self.end_time = end_time;
    }

    pub(crate) fn set_location_id(&mut self, location_id: LocationIdx) {
        self.location_id = location_id;
    }

    pub(crate) fn with_time_window(mut self, time_window: TimeWindow) -> Self {
        self.time_window = time_window;
        self
    }

    pub(crate) fn set_time_window(&mut self, time_window: TimeWindow) {
        self.time_window = time_window;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_job_identity() {
        let a = TourActivity::job_activity(
            ActivityKind::Service,
            JobIdx::new(3),
            ActivityIdx::new(3),
            LocationIdx::new(1),
            Capacity::from_vec(vec![1.0]),
            5.0,
        );
        let mut b = a.clone().with_time_window(TimeWindow::new(10.0, 20.0).unwrap());
        b.set_arrival_time(12.0);

        assert_eq!(a, b);

        let pickup = TourActivity::job_activity(
            ActivityKind::PickupShipment,
            JobIdx::new(3),
            ActivityIdx::new(4),
            LocationIdx::new(1),
            Capacity::from_vec(vec![1.0]),
            5.0,
        );
        assert_ne!(a, pickup);
    }

    #[test]
    fn test_kind_classification() {
        assert!(ActivityKind::Service.is_pickup());
        assert!(ActivityKind::PickupShipment.is_shipment());
        assert!(ActivityKind::DeliverService.is_delivery());
        assert!(!ActivityKind::Break.is_pickup());
        assert!(!ActivityKind::Break.is_delivery());
    }
}
