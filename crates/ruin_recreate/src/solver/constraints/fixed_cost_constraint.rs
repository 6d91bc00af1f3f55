use crate::{error::StateError, solver::insertion_context::JobInsertionContext};

use super::constraint::SoftRouteConstraint;

/// Charges the fixed cost difference of the new vehicle, weighted by how far
/// the pass has progressed, so that opening vehicles gets dearer late in a pass.
pub struct IncreasingFixedCostConstraint {
    weight: f64,
}

impl IncreasingFixedCostConstraint {
    pub fn new(weight: f64) -> Self {
        IncreasingFixedCostConstraint { weight }
    }
}

impl SoftRouteConstraint for IncreasingFixedCostConstraint {
    fn name(&self) -> &'static str {
        "increasing_fixed_cost"
    }

    fn cost(&self, context: &JobInsertionContext) -> Result<f64, StateError> {
        let new_fixed = context.new_vehicle.vehicle_type().costs().fixed;
        let current_fixed = if context.is_new_route() {
            0.0
        } else {
            context
                .problem
                .vehicle(context.route_vehicle_id)
                .vehicle_type()
                .costs()
                .fixed
        };

        Ok(self.weight * context.completeness * (new_fixed - current_fixed))
    }

    fn depends_on_completeness(&self) -> bool {
        true
    }
}
