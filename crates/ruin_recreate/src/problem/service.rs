use fxhash::FxHashSet;
use serde::Serialize;

use crate::{
    error::ConfigError,
    problem::{
        capacity::Capacity,
        location::LocationIdx,
        skill::Skill,
        time_window::{TimeWindow, TimeWindows},
    },
};

pub const DEFAULT_PRIORITY: u8 = 2;

/// Single-stop job. Used for plain services as well as standalone pickups and deliveries.
#[derive(Serialize, Debug, Clone)]
pub struct Service {
    external_id: String,
    location_id: LocationIdx,
    demand: Capacity,
    duration: f64,
    time_windows: TimeWindows,
    skills: FxHashSet<Skill>,
    priority: u8,
}

impl Service {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn location_id(&self) -> LocationIdx {
        self.location_id
    }

    pub fn demand(&self) -> &Capacity {
        &self.demand
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn time_windows(&self) -> &TimeWindows {
        &self.time_windows
    }

    pub fn has_time_windows(&self) -> bool {
        !self.time_windows.is_empty()
    }

    pub fn skills(&self) -> &FxHashSet<Skill> {
        &self.skills
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }
}

pub(crate) fn validate_priority(priority: u8) -> Result<u8, ConfigError> {
    if (1..=10).contains(&priority) {
        Ok(priority)
    } else {
        Err(ConfigError::InvalidPriority(priority))
    }
}

#[derive(Default)]
pub struct ServiceBuilder {
    external_id: Option<String>,
    location_id: Option<usize>,
    demand: Option<Capacity>,
    duration: Option<f64>,
    time_windows: Option<Vec<TimeWindow>>,
    skills: Option<Vec<Skill>>,
    priority: Option<u8>,
}

impl ServiceBuilder {
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut ServiceBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_location_id(&mut self, location_id: usize) -> &mut ServiceBuilder {
        self.location_id = Some(location_id);
        self
    }

    pub fn set_demand(&mut self, demand: Capacity) -> &mut ServiceBuilder {
        self.demand = Some(demand);
        self
    }

    pub fn set_duration(&mut self, duration: f64) -> &mut ServiceBuilder {
        self.duration = Some(duration);
        self
    }

    pub fn set_time_windows(&mut self, time_windows: Vec<TimeWindow>) -> &mut ServiceBuilder {
        self.time_windows = Some(time_windows);
        self
    }

    pub fn set_skills(&mut self, skills: Vec<Skill>) -> &mut ServiceBuilder {
        self.skills = Some(skills);
        self
    }

    pub fn set_priority(&mut self, priority: u8) -> &mut ServiceBuilder {
        self.priority = Some(priority);
        self
    }

    pub fn build(self) -> Result<Service, ConfigError> {
        let duration = self.duration.unwrap_or(0.0);
        if duration < 0.0 || duration.is_nan() {
            return Err(ConfigError::InvalidParameter {
                name: "duration",
                reason: format!("service duration must be non-negative, got {duration}"),
            });
        }

        Ok(Service {
            external_id: self.external_id.ok_or(ConfigError::MissingField("external_id"))?,
            location_id: LocationIdx::new(
                self.location_id
                    .ok_or(ConfigError::MissingField("location_id"))?,
            ),
            demand: self.demand.unwrap_or_default(),
            duration,
            time_windows: self.time_windows.unwrap_or_default().into_iter().collect(),
            skills: self.skills.unwrap_or_default().into_iter().collect(),
            priority: validate_priority(self.priority.unwrap_or(DEFAULT_PRIORITY))?,
        })
    }
}
