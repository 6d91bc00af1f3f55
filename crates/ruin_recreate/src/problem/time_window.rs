use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::ConfigError;

/// Closed interval `[start, end]` in which an operation may start.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    start: f64,
    end: f64,
}

pub type TimeWindows = SmallVec<[TimeWindow; 1]>;

impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow {
            start: 0.0,
            end: f64::MAX,
        }
    }
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Result<Self, ConfigError> {
        if start.is_nan() || end.is_nan() || start < 0.0 || start > end {
            return Err(ConfigError::InvalidTimeWindow { start, end });
        }

        Ok(TimeWindow { start, end })
    }

    /// Bounds already validated elsewhere, e.g. a vehicle shift.
    pub(crate) const fn new_unchecked(start: f64, end: f64) -> Self {
        TimeWindow { start, end }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_satisfied(&self, time: f64) -> bool {
        time <= self.end
    }

    pub fn overtime(&self, time: f64) -> f64 {
        (time - self.end).max(0.0)
    }
}

#[derive(Default)]
pub struct TimeWindowBuilder {
    start: Option<f64>,
    end: Option<f64>,
}

impl TimeWindowBuilder {
    pub fn with_start(mut self, start: f64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: f64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn build(self) -> Result<TimeWindow, ConfigError> {
        TimeWindow::new(self.start.unwrap_or(0.0), self.end.unwrap_or(f64::MAX))
    }
}
