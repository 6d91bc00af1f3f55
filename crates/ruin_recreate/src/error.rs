use thiserror::Error;

use crate::{
    problem::{job::JobIdx, vehicle::VehicleIdx},
    solver::state::state_key::{StateKey, StateValueType},
};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid time window [{start}, {end}]")]
    InvalidTimeWindow { start: f64, end: f64 },

    #[error("priority {0} is outside of 1..=10")]
    InvalidPriority(u8),

    #[error("ruin share bounds must satisfy 0 <= min <= max, got min={min} max={max}")]
    InvalidRuinShare { min: f64, max: f64 },

    #[error("duplicate search strategy id '{0}'")]
    DuplicateStrategy(String),

    #[error("search strategy '{0}' must have a positive weight")]
    InvalidStrategyWeight(String),

    #[error("no search strategy has been configured")]
    NoStrategies,

    #[error("duplicate job id '{0}'")]
    DuplicateJob(String),

    #[error("duplicate vehicle id '{0}'")]
    DuplicateVehicle(String),

    #[error("location {0} does not exist")]
    UnknownLocation(usize),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("problem has no vehicles")]
    NoVehicles,

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("initial route references unknown {0}")]
    InvalidInitialRoute(String),

    #[error("failed to build insertion thread pool: {0}")]
    ThreadPool(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("state key {key:?} is declared as {declared:?} but was accessed as {requested:?}")]
    TypeMismatch {
        key: StateKey,
        declared: StateValueType,
        requested: StateValueType,
    },

    #[error("state key {0:?} is not registered")]
    UnknownKey(StateKey),

    #[error("activity has no state index")]
    UnindexedActivity,
}

#[derive(Debug, Error, PartialEq)]
pub enum FleetError {
    #[error("vehicle {0} is already locked")]
    AlreadyLocked(VehicleIdx),

    #[error("vehicle {0} is not registered with the fleet")]
    UnknownVehicle(VehicleIdx),
}

#[derive(Debug, Error)]
pub enum SolverError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error("invalid initial solution: {0}")]
    InvalidInitialSolution(String),

    #[error("job {0} is both routed and unassigned, or routed twice")]
    DuplicatedJob(JobIdx),

    #[error("selector of strategy '{strategy}' returned nothing from a pool of {pool_size}")]
    EmptySelection { strategy: String, pool_size: usize },
}
