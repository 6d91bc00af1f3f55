use crate::{
    error::StateError,
    solver::insertion_context::JobInsertionContext,
};

use super::constraint::{ConstraintStatus, HardRouteConstraint, InfeasibilityReason};

/// The new vehicle must cover the job's skills, and those of every job already
/// on the route when the vehicle changes.
pub struct SkillConstraint;

impl HardRouteConstraint for SkillConstraint {
    fn name(&self) -> &'static str {
        "skill"
    }

    fn fulfilled(&self, context: &JobInsertionContext) -> Result<ConstraintStatus, StateError> {
        let problem = context.problem;
        let vehicle_id = context.new_vehicle_id;

        if !problem.is_job_compatible_with_vehicle(context.job_id, vehicle_id) {
            return Ok(ConstraintStatus::NotFulfilled(InfeasibilityReason::Skill));
        }

        if context.is_vehicle_switch()
            && context
                .route
                .jobs()
                .any(|job_id| !problem.is_job_compatible_with_vehicle(job_id, vehicle_id))
        {
            return Ok(ConstraintStatus::NotFulfilled(InfeasibilityReason::Skill));
        }

        Ok(ConstraintStatus::Fulfilled)
    }
}
