use crate::{
    error::StateError,
    solver::insertion_context::{ActivityContext, JobInsertionContext},
};

use super::constraint::SoftActivityConstraint;

/// Adds the pass noise, when one is active, to every candidate position.
pub struct NoiseConstraint;

impl SoftActivityConstraint for NoiseConstraint {
    fn name(&self) -> &'static str {
        "noise"
    }

    fn cost(
        &self,
        context: &JobInsertionContext,
        activity_context: &ActivityContext,
    ) -> Result<f64, StateError> {
        Ok(context.noise.map_or(0.0, |noise| {
            noise.create_noise(
                context.job_id,
                context.new_vehicle_id,
                context.route_key(),
                activity_context.position,
            )
        }))
    }
}
