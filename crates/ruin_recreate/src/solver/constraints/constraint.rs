use std::{fmt, sync::Arc};

use crate::{
    error::StateError,
    solver::insertion_context::{ActivityContext, JobInsertionContext},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfeasibilityReason {
    Capacity,
    TimeWindow,
    Skill,
    Ordering,
}

impl InfeasibilityReason {
    pub const ALL: [InfeasibilityReason; 4] = [
        InfeasibilityReason::Capacity,
        InfeasibilityReason::TimeWindow,
        InfeasibilityReason::Skill,
        InfeasibilityReason::Ordering,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            InfeasibilityReason::Capacity => "HARD_CAPACITY",
            InfeasibilityReason::TimeWindow => "HARD_TIMEWINDOW",
            InfeasibilityReason::Skill => "HARD_SKILL",
            InfeasibilityReason::Ordering => "HARD_ORDERING",
        }
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

impl fmt::Display for InfeasibilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Set of reasons collected while a job failed to find a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureReasons(u8);

impl FailureReasons {
    pub fn insert(&mut self, reason: InfeasibilityReason) {
        self.0 |= reason.bit();
    }

    pub fn contains(&self, reason: InfeasibilityReason) -> bool {
        self.0 & reason.bit() != 0
    }

    pub fn extend(&mut self, other: FailureReasons) {
        self.0 |= other.0;
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = InfeasibilityReason> + '_ {
        InfeasibilityReason::ALL
            .into_iter()
            .filter(|reason| self.contains(*reason))
    }
}

impl fmt::Display for FailureReasons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.iter().map(|reason| reason.code()).collect();
        write!(f, "[{}]", codes.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintStatus {
    Fulfilled,

    /// Infeasible at this position, later positions may work.
    NotFulfilled(InfeasibilityReason),

    /// Infeasible here and at every later position of the route.
    NotFulfilledBreak(InfeasibilityReason),
}

impl ConstraintStatus {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, ConstraintStatus::Fulfilled)
    }

    pub fn reason(&self) -> Option<InfeasibilityReason> {
        match self {
            ConstraintStatus::Fulfilled => None,
            ConstraintStatus::NotFulfilled(reason) | ConstraintStatus::NotFulfilledBreak(reason) => {
                Some(*reason)
            }
        }
    }
}

/// Cheaper constraints are checked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConstraintPriority {
    Critical,
    High,
    Low,
}

/// Checked once per route before any position is evaluated.
pub trait HardRouteConstraint: Send + Sync {
    fn name(&self) -> &'static str;

    fn fulfilled(&self, context: &JobInsertionContext) -> Result<ConstraintStatus, StateError>;
}

/// Checked at every candidate position.
pub trait HardActivityConstraint: Send + Sync {
    fn name(&self) -> &'static str;

    fn fulfilled(
        &self,
        context: &JobInsertionContext,
        activity_context: &ActivityContext,
    ) -> Result<ConstraintStatus, StateError>;
}

pub trait SoftRouteConstraint: Send + Sync {
    fn name(&self) -> &'static str;

    fn cost(&self, context: &JobInsertionContext) -> Result<f64, StateError>;

    /// True when the cost changes with the progress of the pass, so results
    /// computed earlier in the pass cannot be reused.
    fn depends_on_completeness(&self) -> bool {
        false
    }
}

pub trait SoftActivityConstraint: Send + Sync {
    fn name(&self) -> &'static str;

    fn cost(
        &self,
        context: &JobInsertionContext,
        activity_context: &ActivityContext,
    ) -> Result<f64, StateError>;
}

#[derive(Clone)]
pub enum Constraint {
    HardRoute(Arc<dyn HardRouteConstraint>),
    HardActivity(Arc<dyn HardActivityConstraint>),
    SoftRoute(Arc<dyn SoftRouteConstraint>),
    SoftActivity(Arc<dyn SoftActivityConstraint>),
}

impl Constraint {
    pub fn constraint_name(&self) -> &'static str {
        match self {
            Constraint::HardRoute(c) => c.name(),
            Constraint::HardActivity(c) => c.name(),
            Constraint::SoftRoute(c) => c.name(),
            Constraint::SoftActivity(c) => c.name(),
        }
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, Constraint::HardRoute(_) | Constraint::HardActivity(_))
    }
}
