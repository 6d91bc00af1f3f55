use serde::Serialize;

use crate::{
    error::ConfigError,
    problem::{
        location::LocationIdx,
        time_window::{TimeWindow, TimeWindows},
    },
};

/// Driver break bound to one vehicle. Without a location the break is taken
/// wherever the vehicle is when it starts.
#[derive(Serialize, Debug, Clone)]
pub struct VehicleBreak {
    external_id: String,
    location_id: Option<LocationIdx>,
    duration: f64,
    time_windows: TimeWindows,
}

impl VehicleBreak {
    pub fn new(
        external_id: impl Into<String>,
        location_id: Option<usize>,
        duration: f64,
        time_windows: Vec<TimeWindow>,
    ) -> Result<Self, ConfigError> {
        if duration < 0.0 || duration.is_nan() {
            return Err(ConfigError::InvalidParameter {
                name: "duration",
                reason: format!("break duration must be non-negative, got {duration}"),
            });
        }

        Ok(VehicleBreak {
            external_id: external_id.into(),
            location_id: location_id.map(LocationIdx::new),
            duration,
            time_windows: time_windows.into_iter().collect(),
        })
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn location_id(&self) -> Option<LocationIdx> {
        self.location_id
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn time_windows(&self) -> &TimeWindows {
        &self.time_windows
    }
}
