use std::sync::Arc;

use crate::{
    error::StateError,
    solver::insertion_context::{ActivityContext, JobInsertionContext},
};

use super::{
    capacity_constraint::{CapacityActivityConstraint, CapacityRouteConstraint},
    constraint::{
        Constraint, ConstraintPriority, ConstraintStatus, HardActivityConstraint,
        HardRouteConstraint, SoftActivityConstraint, SoftRouteConstraint,
    },
    fixed_cost_constraint::IncreasingFixedCostConstraint,
    noise_constraint::NoiseConstraint,
    ordering_constraint::OrderingConstraint,
    skill_constraint::SkillConstraint,
    time_window_constraint::TimeWindowConstraint,
};

/// Ordered hard and soft constraints consulted for every candidate insertion.
#[derive(Clone, Default)]
pub struct ConstraintManager {
    hard_route: Vec<(ConstraintPriority, Arc<dyn HardRouteConstraint>)>,
    hard_activity: Vec<(ConstraintPriority, Arc<dyn HardActivityConstraint>)>,
    soft_route: Vec<Arc<dyn SoftRouteConstraint>>,
    soft_activity: Vec<Arc<dyn SoftActivityConstraint>>,
}

impl ConstraintManager {
    /// Capacity, skills, ordering and time windows as hard constraints, insertion
    /// noise and, when `fixed_cost_weight` is positive, escalating fixed costs as soft ones.
    pub fn with_default_constraints(deliveries_first: bool, fixed_cost_weight: f64) -> Self {
        let mut manager = ConstraintManager::default();
        manager
            .add_constraint(
                Constraint::HardRoute(Arc::new(SkillConstraint)),
                ConstraintPriority::Critical,
            )
            .add_constraint(
                Constraint::HardRoute(Arc::new(CapacityRouteConstraint)),
                ConstraintPriority::Critical,
            )
            .add_constraint(
                Constraint::HardActivity(Arc::new(OrderingConstraint::new(deliveries_first))),
                ConstraintPriority::Critical,
            )
            .add_constraint(
                Constraint::HardActivity(Arc::new(CapacityActivityConstraint)),
                ConstraintPriority::Critical,
            )
            .add_constraint(
                Constraint::HardActivity(Arc::new(TimeWindowConstraint)),
                ConstraintPriority::High,
            )
            .add_constraint(
                Constraint::SoftActivity(Arc::new(NoiseConstraint)),
                ConstraintPriority::Low,
            );

        if fixed_cost_weight > 0.0 {
            manager.add_constraint(
                Constraint::SoftRoute(Arc::new(IncreasingFixedCostConstraint::new(
                    fixed_cost_weight,
                ))),
                ConstraintPriority::Low,
            );
        }

        manager
    }

    /// Hard constraints are kept sorted by priority, ties in registration order.
    /// Soft constraints are summed, so their priority is ignored.
    pub fn add_constraint(
        &mut self,
        constraint: Constraint,
        priority: ConstraintPriority,
    ) -> &mut ConstraintManager {
        match constraint {
            Constraint::HardRoute(constraint) => {
                self.hard_route.push((priority, constraint));
                self.hard_route.sort_by_key(|(priority, _)| *priority);
            }
            Constraint::HardActivity(constraint) => {
                self.hard_activity.push((priority, constraint));
                self.hard_activity.sort_by_key(|(priority, _)| *priority);
            }
            Constraint::SoftRoute(constraint) => self.soft_route.push(constraint),
            Constraint::SoftActivity(constraint) => self.soft_activity.push(constraint),
        }
        self
    }

    pub fn constraint_names(&self) -> Vec<&'static str> {
        self.hard_route
            .iter()
            .map(|(_, c)| c.name())
            .chain(self.hard_activity.iter().map(|(_, c)| c.name()))
            .chain(self.soft_route.iter().map(|c| c.name()))
            .chain(self.soft_activity.iter().map(|c| c.name()))
            .collect()
    }

    pub fn depends_on_completeness(&self) -> bool {
        self.soft_route
            .iter()
            .any(|constraint| constraint.depends_on_completeness())
    }

    /// First failing hard route constraint, if any.
    pub fn fulfilled_route(
        &self,
        context: &JobInsertionContext,
    ) -> Result<ConstraintStatus, StateError> {
        for (_, constraint) in &self.hard_route {
            let status = constraint.fulfilled(context)?;
            if !status.is_fulfilled() {
                return Ok(status);
            }
        }

        Ok(ConstraintStatus::Fulfilled)
    }

    /// First failing hard activity constraint, if any.
    pub fn fulfilled_activity(
        &self,
        context: &JobInsertionContext,
        activity_context: &ActivityContext,
    ) -> Result<ConstraintStatus, StateError> {
        for (_, constraint) in &self.hard_activity {
            let status = constraint.fulfilled(context, activity_context)?;
            if !status.is_fulfilled() {
                return Ok(status);
            }
        }

        Ok(ConstraintStatus::Fulfilled)
    }

    pub fn soft_route_cost(&self, context: &JobInsertionContext) -> Result<f64, StateError> {
        let mut cost = 0.0;
        for constraint in &self.soft_route {
            cost += constraint.cost(context)?;
        }

        Ok(cost)
    }

    pub fn soft_activity_cost(
        &self,
        context: &JobInsertionContext,
        activity_context: &ActivityContext,
    ) -> Result<f64, StateError> {
        let mut cost = 0.0;
        for constraint in &self.soft_activity {
            cost += constraint.cost(context, activity_context)?;
        }

        Ok(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl HardRouteConstraint for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn fulfilled(&self, _: &JobInsertionContext) -> Result<ConstraintStatus, StateError> {
            Ok(ConstraintStatus::Fulfilled)
        }
    }

    #[test]
    fn test_hard_constraints_sorted_by_priority() {
        let mut manager = ConstraintManager::default();
        manager
            .add_constraint(Constraint::HardRoute(Arc::new(Named("low"))), ConstraintPriority::Low)
            .add_constraint(
                Constraint::HardRoute(Arc::new(Named("critical"))),
                ConstraintPriority::Critical,
            )
            .add_constraint(Constraint::HardRoute(Arc::new(Named("high"))), ConstraintPriority::High)
            .add_constraint(
                Constraint::HardRoute(Arc::new(Named("critical_2"))),
                ConstraintPriority::Critical,
            );

        assert_eq!(
            manager.constraint_names(),
            vec!["critical", "critical_2", "high", "low"]
        );
    }

    #[test]
    fn test_default_constraints() {
        let manager = ConstraintManager::with_default_constraints(false, 0.0);
        assert_eq!(
            manager.constraint_names(),
            vec!["skill", "capacity", "ordering", "capacity", "time_window", "noise"]
        );
        assert!(!manager.depends_on_completeness());

        let manager = ConstraintManager::with_default_constraints(true, 0.5);
        assert!(manager.constraint_names().contains(&"increasing_fixed_cost"));
        assert!(manager.depends_on_completeness());
    }
}
